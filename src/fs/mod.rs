//! Filesystem utilities for pycheck.
//!
//! Config files and evaluation reports are written atomically so a crash
//! never leaves a half-written file behind.

mod atomic;

pub use atomic::{atomic_write, atomic_write_file};
