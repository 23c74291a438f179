#![forbid(unsafe_code)]

use super::games::game_template_tx;
use super::*;
use gl_core::ids::{GameId, MissionId, UserId};
use gl_core::mission::{
    Mission, MissionProgress, MissionRule, MissionStatus, ValidationOutcome,
};
use rusqlite::TransactionBehavior;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub success: bool,
    pub feedback: String,
    pub attempts: i64,
    pub status: MissionStatus,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredResult {
    success: bool,
    feedback: String,
}

impl SqliteStore {
    /// Missions of a game in play order.
    pub fn list_missions(&mut self, game_id: GameId) -> Result<Vec<Mission>, StoreError> {
        let tx = self.conn.transaction()?;
        game_template_tx(&tx, game_id.get())?;

        let mut out = Vec::new();
        {
            let mut stmt = tx.prepare(
                r#"
                SELECT id, game_id, order_index, title, description, difficulty,
                       validation_type, validation_json, hints_json
                FROM missions
                WHERE game_id=?1
                ORDER BY order_index ASC, id ASC
                "#,
            )?;
            let mut rows = stmt.query(params![game_id.get()])?;
            while let Some(row) = rows.next()? {
                out.push(mission_from_row(row)?);
            }
        }
        tx.commit()?;
        Ok(out)
    }

    /// Stored progress, or a fresh `not_started` record that is not persisted.
    pub fn get_mission_progress(
        &mut self,
        user_id: UserId,
        mission_id: MissionId,
    ) -> Result<MissionProgress, StoreError> {
        let tx = self.conn.transaction()?;
        ensure_user_exists_tx(&tx, user_id.get())?;
        mission_tx(&tx, mission_id.get())?;
        let progress = progress_tx(&tx, user_id.get(), mission_id.get())?;
        tx.commit()?;

        Ok(progress
            .unwrap_or_else(|| MissionProgress::not_started(user_id.get(), mission_id.get())))
    }

    /// Checks `code` against the mission rule and records the attempt.
    ///
    /// Read, evaluate and write happen inside one immediate transaction, so
    /// concurrent attempts from other connections serialize on the lock.
    pub fn validate_mission(
        &mut self,
        request: ValidateMissionRequest,
    ) -> Result<ValidationReport, StoreError> {
        let user_id = request.user_id.get();
        let mission_id = request.mission_id.get();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        ensure_user_exists_tx(&tx, user_id)?;
        let mission = mission_tx(&tx, mission_id)?;
        let template = game_template_tx(&tx, mission.game_id)?;

        let mut progress = progress_tx(&tx, user_id, mission_id)?
            .unwrap_or_else(|| MissionProgress::not_started(user_id, mission_id));
        let outcome = mission.rule.evaluate(&request.code, &template);
        progress.record_attempt(outcome.clone(), now_ms());

        let last_result_json = serde_json::to_string(&StoredResult {
            success: outcome.success,
            feedback: outcome.feedback.clone(),
        })
        .map_err(|_| StoreError::CorruptRow("validation result"))?;

        tx.execute(
            r#"
            INSERT INTO mission_progress(
              user_id, mission_id, status, started_at_ms, completed_at_ms, attempts, last_result_json
            )
            VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)
            ON CONFLICT(user_id, mission_id) DO UPDATE SET
              status=excluded.status,
              started_at_ms=excluded.started_at_ms,
              completed_at_ms=excluded.completed_at_ms,
              attempts=mission_progress.attempts + 1,
              last_result_json=excluded.last_result_json
            "#,
            params![
                user_id,
                mission_id,
                progress.status.as_str(),
                progress.started_at_ms,
                progress.completed_at_ms,
                last_result_json
            ],
        )?;
        tx.commit()?;

        tracing::info!(
            user_id,
            mission_id,
            success = outcome.success,
            attempts = progress.attempts,
            status = progress.status.as_str(),
            "mission validated"
        );
        Ok(ValidationReport {
            success: outcome.success,
            feedback: outcome.feedback,
            attempts: progress.attempts,
            status: progress.status,
        })
    }
}

fn mission_from_row(row: &rusqlite::Row<'_>) -> Result<Mission, StoreError> {
    let validation_type: String = row.get(6)?;
    let validation_json: String = row.get(7)?;
    let hints_json: String = row.get(8)?;

    let rule = MissionRule::decode(&validation_type, &validation_json)
        .map_err(|_| StoreError::CorruptRow("mission rule"))?;
    let hints: Vec<String> = serde_json::from_str(&hints_json)
        .map_err(|_| StoreError::CorruptRow("mission hints"))?;

    Ok(Mission {
        id: row.get(0)?,
        game_id: row.get(1)?,
        order_index: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        difficulty: row.get(5)?,
        rule,
        hints,
    })
}

fn mission_tx(tx: &Transaction<'_>, mission_id: i64) -> Result<Mission, StoreError> {
    let mut stmt = tx.prepare(
        r#"
        SELECT id, game_id, order_index, title, description, difficulty,
               validation_type, validation_json, hints_json
        FROM missions
        WHERE id=?1
        "#,
    )?;
    let mut rows = stmt.query(params![mission_id])?;
    match rows.next()? {
        Some(row) => mission_from_row(row),
        None => Err(StoreError::UnknownMission),
    }
}

fn progress_tx(
    tx: &Transaction<'_>,
    user_id: i64,
    mission_id: i64,
) -> Result<Option<MissionProgress>, StoreError> {
    let row = tx
        .query_row(
            r#"
            SELECT status, started_at_ms, completed_at_ms, attempts, last_result_json
            FROM mission_progress
            WHERE user_id=?1 AND mission_id=?2
            "#,
            params![user_id, mission_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<i64>>(1)?,
                    row.get::<_, Option<i64>>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            },
        )
        .optional()?;

    let Some((status, started_at_ms, completed_at_ms, attempts, last_result_json)) = row else {
        return Ok(None);
    };

    let status =
        MissionStatus::parse(&status).map_err(|err| StoreError::CorruptRow(err.message()))?;
    let last_result = match last_result_json {
        Some(raw) => {
            let stored: StoredResult = serde_json::from_str(&raw)
                .map_err(|_| StoreError::CorruptRow("validation result"))?;
            Some(ValidationOutcome {
                success: stored.success,
                feedback: stored.feedback,
            })
        }
        None => None,
    };

    Ok(Some(MissionProgress {
        user_id,
        mission_id,
        status,
        started_at_ms,
        completed_at_ms,
        attempts,
        last_result,
    }))
}
