use std::fmt;

/// Category of a user-visible message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
    Warning,
}

/// A one-shot message shown to the user after a command
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, message)
    }

    /// Print the notice (errors and warnings to stderr) and mirror it to the log
    pub fn emit(&self) {
        match self.kind {
            NoticeKind::Success | NoticeKind::Info => {
                tracing::info!(kind = ?self.kind, "{}", self.message);
                println!("{self}");
            }
            NoticeKind::Warning => {
                tracing::warn!("{}", self.message);
                eprintln!("{self}");
            }
            NoticeKind::Error => {
                tracing::error!("{}", self.message);
                eprintln!("{self}");
            }
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NoticeKind::Success | NoticeKind::Info => write!(f, "{}", self.message),
            NoticeKind::Warning => write!(f, "Warning: {}", self.message),
            NoticeKind::Error => write!(f, "Error: {}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_follow_the_kind() {
        assert_eq!(Notice::success("Saved").to_string(), "Saved");
        assert_eq!(Notice::info("3 rows").to_string(), "3 rows");
        assert_eq!(Notice::warning("stale").to_string(), "Warning: stale");
        assert_eq!(Notice::error("boom").to_string(), "Error: boom");
    }
}
