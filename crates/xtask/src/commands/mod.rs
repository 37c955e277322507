//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod diff;
mod dump;
mod lint;
mod register;

pub use diff::Diff;
pub use dump::Dump;
pub use lint::Lint;
pub use register::Register;
