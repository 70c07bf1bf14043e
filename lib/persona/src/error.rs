//! Error types for persona loading.

use std::fmt;

/// Errors from loading a persona definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonaError {
    /// The persona file could not be read.
    Io { path: String, reason: String },
    /// The persona JSON could not be parsed.
    Parse { reason: String },
}

impl fmt::Display for PersonaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, reason } => {
                write!(f, "failed to read persona file '{path}': {reason}")
            }
            Self::Parse { reason } => {
                write!(f, "failed to parse persona definition: {reason}")
            }
        }
    }
}

impl std::error::Error for PersonaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = PersonaError::Io {
            path: "personas/atendente.json".to_string(),
            reason: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("personas/atendente.json"));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn parse_error_display() {
        let err = PersonaError::Parse {
            reason: "missing field `name`".to_string(),
        };
        assert!(err.to_string().contains("missing field `name`"));
    }
}
