//! Errors that can occur in the companion runtime.

/// Errors surfaced by adapters and the mission runner.
///
/// Target loss and safety threshold breaches are not errors - they are
/// state transitions inside the core. What lands here is the stuff the
/// mission genuinely cannot recover from: a vehicle link that rejects
/// commands, a broken configuration, I/O failures.
#[derive(Debug, thiserror::Error)]
pub enum CompanionError {
    #[error("vehicle link failed: {0}")]
    Link(String),

    #[error("arming rejected: {0}")]
    Arming(&'static str),

    #[error("mode change rejected: {0}")]
    ModeChange(&'static str),

    #[error("invalid mission config: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CompanionError::Arming("vehicle not armable");
        assert_eq!(err.to_string(), "arming rejected: vehicle not armable");

        let err = CompanionError::Config("frame width must be positive".into());
        assert_eq!(
            err.to_string(),
            "invalid mission config: frame width must be positive"
        );
    }
}
