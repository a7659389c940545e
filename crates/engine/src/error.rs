use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// TOML parse / deserialization error in a profile file.
    ProfileParse(String),
    /// Profile validation error (missing anchor role, bad scan window, etc.).
    ProfileValidation(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProfileParse(msg) => write!(f, "profile parse error: {msg}"),
            Self::ProfileValidation(msg) => write!(f, "profile validation error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
