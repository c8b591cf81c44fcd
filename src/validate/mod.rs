//! Python source validation for pycheck.
//!
//! This module provides the Code Validator and the pieces built on it:
//! - Validator: writes candidate source to a scratch file and runs the checker
//! - ValidationResult / EnvironmentFailure: "your code is wrong" versus
//!   "the tool is broken"
//! - Diagnostics: best-effort parse of checker output for display
//! - Scorer: reduces a verdict to a 0/1 score

mod diagnostics;
mod failure;
mod result;
pub mod scorer;
mod validator;


pub use diagnostics::{Diagnostic, parse_diagnostics};
pub use failure::EnvironmentFailure;
pub use result::ValidationResult;
pub use scorer::{SCORER_NAME, Score, is_valid_python};
pub use validator::{CodeChecker, ValidationObserver, Validator, validate};
