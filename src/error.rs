//! Process-level error type.
//!
//! Every fallible path in the crate returns `AppError`, and `main` maps it to
//! an exit code:
//!
//! - 2: unusable input (missing data file, malformed CSV, bad CLI selection)
//! - 3: dataset/registry drift (a column with no display-registry entry)
//! - 4: terminal or rendering failure

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Unusable input: missing files, malformed CSV, invalid selections.
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Configuration defect: the dataset and the display registries disagree.
    pub fn drift(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Terminal setup/draw failure in the TUI.
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
