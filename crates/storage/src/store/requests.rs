#![forbid(unsafe_code)]

use gl_core::ids::{GameId, MissionId, UserId, VersionId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveCodeRequest {
    pub user_id: UserId,
    pub game_id: GameId,
    pub code: String,
    pub message: Option<String>,
    pub is_checkpoint: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRequest {
    pub user_id: UserId,
    pub game_id: GameId,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffRequest {
    pub from_version: VersionId,
    pub to_version: VersionId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestoreRequest {
    pub version_id: VersionId,
    pub user_id: UserId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidateMissionRequest {
    pub user_id: UserId,
    pub mission_id: MissionId,
    pub code: String,
}
