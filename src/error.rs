// src/error.rs

use thiserror::Error;

/// Errors surfaced by the mapping handlers.
///
/// A `MissingEntity` is an invariant violation, not a recoverable condition:
/// mint/burn/swap handlers only ever run after a pair-creation (and usually a
/// sync) event has persisted the rows they touch, so a missing row means the
/// event stream is corrupt or the store was wiped mid-run. Callers should
/// abort rather than substitute defaults, which would corrupt every
/// downstream aggregate.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("required {entity} `{id}` is missing from the entity store")]
    MissingEntity { entity: &'static str, id: String },
}

impl IndexError {
    pub fn missing(entity: &'static str, id: impl Into<String>) -> Self {
        IndexError::MissingEntity {
            entity,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
