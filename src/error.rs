use std::fmt::{Display, Formatter};

use fintable_core::ExtractError;

/// A failed DOM access reported by the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError(pub String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl Display for HostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for HostError {}

#[derive(Debug)]
pub enum CollectError {
    InvalidTableIndex { index: usize, available: usize },
    Cancelled { rows_collected: usize },
    Host(String),
    Extract(String),
}

impl CollectError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTableIndex { .. } => "invalid_index",
            Self::Cancelled { .. } => "cancelled",
            Self::Host(_) => "host_error",
            Self::Extract(_) => "extract_error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::InvalidTableIndex { index, available } => format!(
                "table {index} does not match any classified table ({available} available)"
            ),
            Self::Cancelled { rows_collected } => {
                format!("collection cancelled after {rows_collected} row(s)")
            }
            Self::Host(message) | Self::Extract(message) => message.clone(),
        }
    }

    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

impl Display for CollectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for CollectError {}

impl From<HostError> for CollectError {
    fn from(error: HostError) -> Self {
        Self::Host(error.0)
    }
}

impl From<ExtractError> for CollectError {
    fn from(error: ExtractError) -> Self {
        Self::Extract(error.to_string())
    }
}
