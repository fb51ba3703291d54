//! Process exit codes shared by every command.

/// Exit codes returned by the `symdex` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Unexpected failure
    GeneralError = 1,
    /// Index definition is malformed
    ParseError = 2,
    /// Lookup found nothing
    NotFound = 3,
    /// A source file could not be read
    IoError = 4,
    /// Settings could not be loaded or written
    ConfigError = 5,
}

impl ExitCode {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.code())
    }
}
