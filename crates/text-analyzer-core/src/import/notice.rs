use std::time::{Duration, Instant};

/// How long a notice stays visible unless configured otherwise.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

/// Severity of a transient notification, mapped to a color by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Danger,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

/// A dismissible message describing the last import outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
    pub raised_at: Instant,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            raised_at: Instant::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(Severity::Danger, message)
    }

    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.raised_at) >= ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_ttl() {
        let notice = Notice::warning("File size exceeds 5MB.");
        let raised = notice.raised_at;
        assert!(!notice.is_expired(raised, DEFAULT_NOTICE_TTL));
        assert!(!notice.is_expired(raised + Duration::from_millis(4999), DEFAULT_NOTICE_TTL));
        assert!(notice.is_expired(raised + DEFAULT_NOTICE_TTL, DEFAULT_NOTICE_TTL));
        assert_eq!(notice.severity.label(), "warning");
    }
}
