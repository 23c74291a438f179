#![forbid(unsafe_code)]

pub mod diff;
pub mod mission;

pub mod ids {
    macro_rules! row_id {
        ($name:ident) => {
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name(i64);

            impl $name {
                pub fn get(self) -> i64 {
                    self.0
                }

                pub fn try_new(value: i64) -> Result<Self, IdError> {
                    if value <= 0 {
                        return Err(IdError::NotPositive);
                    }
                    Ok(Self(value))
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        };
    }

    row_id!(UserId);
    row_id!(GameId);
    row_id!(VersionId);
    row_id!(MissionId);

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum IdError {
        NotPositive,
    }

    impl IdError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::NotPositive => "id must be a positive integer",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Username(String);

    impl Username {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn into_string(self) -> String {
            self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, UsernameError> {
            let value = value.into();
            let trimmed = value.trim();
            if trimmed.chars().count() < 2 {
                return Err(UsernameError::TooShort);
            }
            if trimmed.chars().count() > 80 {
                return Err(UsernameError::TooLong);
            }
            if trimmed.chars().any(|c| c.is_control()) {
                return Err(UsernameError::ContainsControl);
            }
            Ok(Self(trimmed.to_string()))
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum UsernameError {
        TooShort,
        TooLong,
        ContainsControl,
    }

    impl UsernameError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::TooShort => "username must be at least 2 characters",
                Self::TooLong => "username must be at most 80 characters",
                Self::ContainsControl => "username contains control characters",
            }
        }
    }
}

pub mod model {
    pub const PREVIEW_CHARS: usize = 100;
    pub const PREVIEW_ELLIPSIS: &str = "...";

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct User {
        pub id: i64,
        pub username: String,
        pub created_at_ms: i64,
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Game {
        pub id: i64,
        pub name: String,
        pub display_name: String,
        pub description: String,
        pub template_code: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct CodeVersion {
        pub id: i64,
        pub user_id: i64,
        pub game_id: i64,
        pub code: String,
        pub message: Option<String>,
        pub is_checkpoint: bool,
        pub created_at_ms: i64,
    }

    impl CodeVersion {
        pub fn summary(&self) -> VersionSummary {
            VersionSummary {
                id: self.id,
                message: self.message.clone(),
                is_checkpoint: self.is_checkpoint,
                created_at_ms: self.created_at_ms,
                preview: code_preview(&self.code),
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct SaveOutcome {
        pub created: bool,
        pub version: CodeVersion,
    }

    /// Code shown in the editor: the latest snapshot, or the game template
    /// when nothing was saved yet (`version_id` is `None` in that case).
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct LoadedCode {
        pub code: String,
        pub version_id: Option<i64>,
        pub created_at_ms: Option<i64>,
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct VersionSummary {
        pub id: i64,
        pub message: Option<String>,
        pub is_checkpoint: bool,
        pub created_at_ms: i64,
        pub preview: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct HistoryPage {
        pub versions: Vec<VersionSummary>,
        pub total: usize,
        pub limit: usize,
        pub offset: usize,
        pub has_more: bool,
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct CodeDiff {
        pub lines: Vec<String>,
        pub from_version: i64,
        pub to_version: i64,
    }

    pub fn code_preview(code: &str) -> String {
        match code.char_indices().nth(PREVIEW_CHARS) {
            Some((cut, _)) => format!("{}{PREVIEW_ELLIPSIS}", &code[..cut]),
            None => code.to_string(),
        }
    }

    pub fn has_more(offset: usize, limit: usize, total: usize) -> bool {
        offset.saturating_add(limit) < total
    }

}
