use thiserror::Error;

/// All errors produced by lingocast-core.
#[derive(Debug, Error)]
pub enum LingoError {
    #[error("translation request failed: {0}")]
    TranslationRequest(String),

    #[error("translation service returned {status}: {body}")]
    TranslationService { status: u16, body: String },

    #[error("translation request timed out")]
    TranslationTimeout,

    #[error("empty reply from translation service")]
    EmptyReply,

    #[error("session is already live")]
    AlreadyLive,

    #[error("session is not live")]
    NotLive,

    #[error("unknown model: {id}")]
    UnknownModel { id: String },

    #[error("model '{id}' is not in a state that allows this operation")]
    ModelBusy { id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LingoError>;
