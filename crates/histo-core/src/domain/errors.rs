pub type HistoResult<T> = Result<T, HistoError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoErrorCategory {
    InvalidArgument,
    LogicError,
    OutOfRange,
    NotFound,
    Io,
}

impl HistoErrorCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "InvalidArgument",
            Self::LogicError => "LogicError",
            Self::OutOfRange => "OutOfRange",
            Self::NotFound => "NotFound",
            Self::Io => "Io",
        }
    }

    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InvalidArgument => 2,
            Self::Io => 3,
            Self::LogicError => 4,
            Self::OutOfRange | Self::NotFound => 5,
        }
    }
}

/// Error raised by the data model.
///
/// `code` is a stable dotted identifier (`HISTOGRAM.SIZE_MISMATCH`) that callers
/// may match on; `message` carries the human readable context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} [{}] {}", .category.as_str(), .code, .message)]
pub struct HistoError {
    category: HistoErrorCategory,
    code: &'static str,
    message: String,
}

impl HistoError {
    pub fn new(category: HistoErrorCategory, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            category,
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(HistoErrorCategory::InvalidArgument, code, message)
    }

    pub fn logic(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(HistoErrorCategory::LogicError, code, message)
    }

    pub fn out_of_range(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(HistoErrorCategory::OutOfRange, code, message)
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(HistoErrorCategory::NotFound, code, message)
    }

    pub fn io(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(HistoErrorCategory::Io, code, message)
    }

    pub const fn category(&self) -> HistoErrorCategory {
        self.category
    }

    pub const fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.code, self.message)
    }

    /// Builds an `OutOfRange` error for an index checked against `[0, len)`.
    pub(crate) fn index(code: &'static str, index: usize, len: usize) -> Self {
        Self::out_of_range(
            code,
            format!("index {index} is outside the valid range [0, {len})"),
        )
    }
}
