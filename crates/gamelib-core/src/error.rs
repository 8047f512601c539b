use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameLibError {
    #[error("not initialized: run 'gamelib init'")]
    NotInitialized,

    #[error("you need to be in a voice channel")]
    NotInVoiceGroup,

    #[error("invalid audience filter '{0}': use 'online' or 'voice'")]
    InvalidMode(String),

    #[error("need more than one person to compare libraries (found {found})")]
    InsufficientAudience { found: usize },

    #[error("integration unavailable: {0}")]
    IntegrationUnavailable(String),

    #[error("could not resolve profile name '{0}'; try the 64-bit id instead")]
    NameResolutionFailed(String),

    #[error("too many options for a poll ({count}, max {max})")]
    TooManyOptions { count: usize, max: usize },

    #[error("poll service error: {0}")]
    AdapterError(String),

    #[error("user {requester} is not allowed to {action}")]
    Unauthorized { requester: u64, action: String },

    #[error("user {0} is not linked to an external profile")]
    NotLinked(u64),

    #[error("invalid title: {0}")]
    InvalidTitle(String),

    #[error("unknown member: {0}")]
    UnknownMember(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameLibError>;
