#![forbid(unsafe_code)]

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("unknown user")]
    UnknownUser,
    #[error("unknown game")]
    UnknownGame,
    #[error("unknown version")]
    UnknownVersion,
    #[error("unknown mission")]
    UnknownMission,
    #[error("username already exists")]
    UsernameTaken,
    #[error("corrupt row: {0}")]
    CorruptRow(&'static str),
}

impl StoreError {
    /// Stable wire code for the handler layer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(message) if message.starts_with("RESET_REQUIRED") => {
                "RESET_REQUIRED"
            }
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::UnknownUser | Self::UnknownGame | Self::UnknownVersion | Self::UnknownMission => {
                "NOT_FOUND"
            }
            Self::UsernameTaken => "CONFLICT",
            Self::Io(_) | Self::Sql(_) | Self::CorruptRow(_) => "STORE_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == "NOT_FOUND"
    }
}
