//! Output handling for the CLI.
//!
//! This module provides:
//! - The JSON envelope used by `--json`
//! - Process exit codes
//! - Text/JSON format selection

pub mod envelope;
pub mod exit_code;
pub mod format;

pub use envelope::{EntityType, Envelope, ErrorDetails, MessageType, Meta, ResultCode, SCHEMA_VERSION, Status};
pub use exit_code::ExitCode;
pub use format::OutputFormat;
