#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} at index {index} not found (collection has {len})")]
    NotFound {
        entity: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
