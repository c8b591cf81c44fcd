//! Exit code constants for the pycheck CLI.
//!
//! - 0: Success (code is valid, command completed)
//! - 1: User error (bad args, invalid config)
//! - 2: Validation failure (the checker reported findings)
//! - 3: Environment failure (checker missing, crashed, timed out)
//! - 4: Conversion attempts exhausted
//! - 5: Agent failure (drafting command failed)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid config, malformed input files.
pub const USER_ERROR: i32 = 1;

/// Validation failure: the candidate code has syntax or lint findings.
pub const VALIDATION_FAILURE: i32 = 2;

/// Environment failure: the checker could not be run or misbehaved.
pub const ENVIRONMENT_FAILURE: i32 = 3;

/// The correction loop spent its attempt budget without producing valid code.
pub const ATTEMPTS_EXHAUSTED: i32 = 4;

/// The drafting agent command failed, timed out, or produced unreadable output.
pub const AGENT_FAILURE: i32 = 5;
