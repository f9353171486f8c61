use thiserror::Error;

use rostra_data::UnknownProjector;

/// Error types for projector coordination.
///
/// Resolution and invariant-violation errors are raised synchronously,
/// before any network effect; transport errors come back from the
/// persistence call and are never retried here.
#[derive(Error, Debug)]
pub enum ProjectionError {
    #[error("slide '{0}' is not registered")]
    UnknownSlide(String),

    #[error("slide '{0}' cannot be mapped to a domain model")]
    SlideNotMappable(String),

    #[error("element '{0}' carries no id, cannot resolve its domain model")]
    MissingElementId(String),

    #[error("no '{collection}' record with id {id} in the datastore")]
    ModelNotFound { collection: String, id: u64 },

    #[error(transparent)]
    UnknownProjector(#[from] UnknownProjector),

    #[error("cannot append to the history and delete its last entry in the same request")]
    HistoryConflict,

    #[error("projector request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server rejected projector update with status {status}: {body}")]
    ServerRejected { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
