#![forbid(unsafe_code)]

use super::evaluate::ValidationOutcome;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissionStatus {
    NotStarted,
    InProgress,
    Completed,
    Failed,
}

impl MissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Result<Self, MissionStatusError> {
        match value {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(MissionStatusError::Unknown),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissionStatusError {
    Unknown,
}

impl MissionStatusError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown mission status",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissionProgress {
    pub user_id: i64,
    pub mission_id: i64,
    pub status: MissionStatus,
    pub started_at_ms: Option<i64>,
    pub completed_at_ms: Option<i64>,
    pub attempts: i64,
    pub last_result: Option<ValidationOutcome>,
}

impl MissionProgress {
    pub fn not_started(user_id: i64, mission_id: i64) -> Self {
        Self {
            user_id,
            mission_id,
            status: MissionStatus::NotStarted,
            started_at_ms: None,
            completed_at_ms: None,
            attempts: 0,
            last_result: None,
        }
    }

    /// Applies one validation attempt.
    ///
    /// Every attempt counts. `Completed` is terminal and `completed_at_ms`
    /// keeps the first completion time.
    pub fn record_attempt(&mut self, outcome: ValidationOutcome, now_ms: i64) {
        if self.status != MissionStatus::Completed {
            self.status = MissionStatus::InProgress;
        }
        self.started_at_ms.get_or_insert(now_ms);
        self.attempts = self.attempts.saturating_add(1);

        if outcome.success {
            self.status = MissionStatus::Completed;
            self.completed_at_ms.get_or_insert(now_ms);
        }
        self.last_result = Some(outcome);
    }
}
