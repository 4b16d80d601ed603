//! Failure taxonomy shared by every engine crate.
//!
//! All of these are local, recoverable conditions: the failing operation leaves
//! state untouched and hands the error back to the caller. Nothing here is fatal
//! to the process.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("{kind} with identifier '{id}' already exists")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Layer named '{0}' already exists")]
    DuplicateName(String),

    #[error("Layer index {0} is already taken")]
    DuplicateIndex(i32),

    #[error("{kind} '{id}' was not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{0} is not initialized")]
    NotInitialized(&'static str),

    #[error("{0} is already initialized")]
    AlreadyInitialized(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid texture: {0}")]
    InvalidTexture(String),

    #[error("Texture '{id}' is still referenced by '{user}'")]
    TextureInUse { id: String, user: String },

    #[error("Could not load image '{locator}': {reason}")]
    Load { locator: String, reason: String },
}

impl EngineError {
    pub fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn duplicate_id(kind: &'static str, id: &str) -> Self {
        Self::DuplicateId {
            kind,
            id: id.to_string(),
        }
    }

    pub fn load(locator: &str, reason: impl Into<String>) -> Self {
        Self::Load {
            locator: locator.to_string(),
            reason: reason.into(),
        }
    }

    /// Title used when the error is forwarded to an [`ErrorSink`](crate::notify::ErrorSink).
    pub fn title(&self) -> &'static str {
        "Error"
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
