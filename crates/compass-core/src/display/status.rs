//! Status and confirmation messages.

use std::fmt;

use crate::wizard::{Notice, NoticeLevel};

/// A one-line outcome message for commands without a richer result.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", if self.success { "Success:" } else { "Error:" }, self.message)
    }
}

impl NoticeLevel {
    pub fn label(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "Info:",
            NoticeLevel::Success => "Success:",
            NoticeLevel::Warning => "Warning:",
            NoticeLevel::Error => "Error:",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level.label(), self.message)
    }
}

/// Notices drained from a wizard, one per line.
pub struct Notices<'a>(pub &'a [Notice]);

impl fmt::Display for Notices<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for notice in self.0 {
            writeln!(f, "> {notice}")?;
        }
        if !self.0.is_empty() {
            writeln!(f)?;
        }
        Ok(())
    }
}
