use std::path::PathBuf;

/// Result type alias for the library's boundary operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced at the edges of the tool (input loading, configuration, output).
///
/// Model parsing itself never fails: unresolvable types are skipped, not reported.
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    CatalogError { file: PathBuf, message: String },
    ParseError { file: PathBuf, message: String },
    InvalidArgument(String),
    UnknownRootType(String),
    SerializationError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "I/O error: {}", e),
            Error::CatalogError { file, message } => {
                write!(f, "invalid type catalog {}: {}", file.display(), message)
            }
            Error::ParseError { file, message } => {
                write!(f, "parse error in {}: {}", file.display(), message)
            }
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::UnknownRootType(name) => {
                write!(f, "root type {} is not declared in the inputs", name)
            }
            Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML: {}", err))
    }
}

impl From<syn::Error> for Error {
    fn from(err: syn::Error) -> Self {
        Error::ParseError {
            file: PathBuf::from("<unknown>"),
            message: err.to_string(),
        }
    }
}
