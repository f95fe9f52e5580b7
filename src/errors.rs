/// Stackpr error types
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    /// Git-related errors from the embedded library
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A branch referenced by the stack does not exist in the repository
    #[error("Branch '{0}' does not exist")]
    BranchNotFound(String),

    /// A branch argument is not a member of the stack
    #[error("Branch '{0}' is not in the stack")]
    NotInStack(String),

    /// Reorder arguments do not form a permutation of the current stack
    #[error("Reorder error: {0}")]
    Reorder(String),

    /// A version-control operation (checkout, pull, push, rebase, merge,
    /// reset) failed; wraps the underlying message
    #[error("Git operation failed: {0}")]
    Operation(String),

    /// The backend cannot perform this operation; route to the fallback
    #[error("'{0}' is not supported by this backend")]
    Unsupported(&'static str),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config document (de)serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl StackError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        StackError::Config(msg.into())
    }

    pub fn reorder<S: Into<String>>(msg: S) -> Self {
        StackError::Reorder(msg.into())
    }

    pub fn operation<S: Into<String>>(msg: S) -> Self {
        StackError::Operation(msg.into())
    }

    /// Whether this is a capability miss that a fallback backend may satisfy.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, StackError::Unsupported(_))
    }
}

pub type Result<T> = std::result::Result<T, StackError>;
