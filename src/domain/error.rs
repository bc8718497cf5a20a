use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum CpeError {
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("malformed yaml in {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unexpected structure in {}: {reason}", .path.display())]
    Shape { path: PathBuf, reason: String },
    #[error("i/o error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("policy engine failure: {0}")]
    Engine(String),
    #[error("{command} failed for {}: {reason}", .policy.display())]
    Execution {
        command: String,
        policy: PathBuf,
        reason: String,
    },
}

impl CpeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            CpeError::NotFound { path }
        } else {
            CpeError::Io { path, source }
        }
    }

    pub fn shape(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CpeError::Shape {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CpeError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, CpeError>;
