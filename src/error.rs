use std::{fmt, io};

#[derive(Debug)]
pub enum FilterError {
    Io(io::Error),
    Corruption(String),
    InvalidArgument(String),
    Config(config::ConfigError),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::Io(e) => write!(f, "io error: {}", e),
            FilterError::Corruption(msg) => write!(f, "corruption: {}", msg),
            FilterError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            FilterError::Config(e) => write!(f, "config error: {}", e),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilterError::Io(e) => Some(e),
            FilterError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FilterError {
    fn from(e: io::Error) -> Self {
        FilterError::Io(e)
    }
}

impl From<config::ConfigError> for FilterError {
    fn from(e: config::ConfigError) -> Self {
        FilterError::Config(e)
    }
}
