use thiserror::Error;

/// The first field that keeps a draft from being persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DraftIncomplete {
    #[error("no jurisdiction selected")]
    Jurisdiction,
    #[error("no violation type selected")]
    ViolationType,
    #[error("vehicle ownership not answered")]
    VehicleOwnership,
    #[error("first name is required")]
    FirstName,
    #[error("last name is required")]
    LastName,
    #[error("email is required")]
    Email,
    #[error("consent is required")]
    Consent,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {kind}: {value:?}")]
pub struct ParseValueError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseValueError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_string() }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("submission {0} not found")]
    NotFound(String),
    #[error("backend returned no record")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("sign-in required")]
    Unauthenticated,
    #[error("access denied: admin privileges required")]
    Forbidden,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LifecycleError {
    pub fn is_authorization(&self) -> bool {
        matches!(self, LifecycleError::Unauthenticated | LifecycleError::Forbidden)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
