//! Error types for nvprobe

use std::path::Path;

use thiserror::Error;

/// Result type alias using NvprobeError
pub type Result<T> = std::result::Result<T, NvprobeError>;

/// Main error type for nvprobe operations
#[derive(Debug, Error)]
pub enum NvprobeError {
    /// Executable could not be located on this host
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Executable ran but exited unsuccessfully
    #[error("'{}' returned code {}{}", .program, code_label(.code), stderr_label(.stderr))]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Executable could not be started at all
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Vendor tool output did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Driver predates the first release with usable NVENC support
    #[error("Unsupported NVIDIA driver {major}.{minor:02}: driver must be 450.xx or newer")]
    UnsupportedDriver { major: u32, minor: u32 },

    /// Reference dataset is unreadable or inconsistent
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<NvprobeError>,
    },
}

fn code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "<signal>".to_string(),
    }
}

fn stderr_label(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(" ({})", stderr)
    }
}

impl NvprobeError {
    /// Create a command-not-found error
    pub fn not_found(program: impl Into<String>) -> Self {
        Self::CommandNotFound(program.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a dataset error naming the offending file
    pub fn dataset_file(path: &Path, msg: impl std::fmt::Display) -> Self {
        Self::Dataset(format!("{}: {}", path.display(), msg))
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Suggestion for the operator, if one applies
    pub fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::CommandNotFound(_) | Self::Spawn { .. } => {
                Some("Install the NVIDIA driver so that nvidia-smi is on PATH")
            }
            Self::CommandFailed { .. } => {
                Some("Run nvidia-smi manually; the NVIDIA kernel module may not be loaded")
            }
            Self::UnsupportedDriver { .. } => Some(
                "Update the NVIDIA driver: https://www.nvidia.com/Download/index.aspx",
            ),
            Self::Dataset(_) => {
                Some("Check the dataset TOML, or drop [dataset] path to use the bundled table")
            }
            Self::Config(_) => Some("Check ~/.config/nvprobe/config.toml for syntax errors"),
            Self::WithContext { source, .. } => source.user_hint(),
            Self::Io(_) => Some("Check that the file exists and is readable by this user"),
            Self::Parse(_) => None,
        }
    }

    /// Whether the operator can fix this without a code change
    pub fn is_user_recoverable(&self) -> bool {
        match self {
            Self::CommandNotFound(_)
            | Self::CommandFailed { .. }
            | Self::Spawn { .. }
            | Self::UnsupportedDriver { .. }
            | Self::Dataset(_)
            | Self::Config(_)
            | Self::Io(_) => true,
            Self::Parse(_) => false,
            Self::WithContext { source, .. } => source.is_user_recoverable(),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
