#![forbid(unsafe_code)]

use crate::*;
use gl_core::ids::{GameId, MissionId, UserId};
use gl_core::mission::{Mission, MissionProgress};
use gl_storage::ValidateMissionRequest;
use serde_json::{Value, json};

fn mission_to_json(mission: &Mission) -> Value {
    json!({
        "id": mission.id,
        "title": mission.title,
        "description": mission.description,
        "order": mission.order_index,
        "difficulty": mission.difficulty,
        "hints": mission.hints
    })
}

// Optional fields are omitted rather than sent as null.
fn progress_to_json(progress: &MissionProgress) -> Value {
    let mut out = serde_json::Map::new();
    out.insert(
        "status".to_string(),
        Value::String(progress.status.as_str().to_string()),
    );
    out.insert("attempts".to_string(), Value::from(progress.attempts));
    if let Some(ts) = progress.started_at_ms {
        out.insert("started_at".to_string(), Value::String(ts_ms_to_rfc3339(ts)));
    }
    if let Some(ts) = progress.completed_at_ms {
        out.insert(
            "completed_at".to_string(),
            Value::String(ts_ms_to_rfc3339(ts)),
        );
    }
    if let Some(result) = progress.last_result.as_ref() {
        out.insert(
            "validation_result".to_string(),
            json!({ "success": result.success, "feedback": result.feedback }),
        );
    }
    Value::Object(out)
}

impl McpServer {
    pub(crate) fn tool_get_missions(&mut self, args: Value) -> Value {
        let args_obj = match require_object(&args) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let game_id = match require_id(args_obj, "game_id", GameId::try_new) {
            Ok(v) => v,
            Err(resp) => return resp,
        };

        match self.store.list_missions(game_id) {
            Ok(missions) => ai_ok(
                "missions.list",
                json!({ "missions": missions.iter().map(mission_to_json).collect::<Vec<_>>() }),
            ),
            Err(err) => store_error(err),
        }
    }

    pub(crate) fn tool_get_mission_progress(&mut self, args: Value) -> Value {
        let args_obj = match require_object(&args) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let user_id = match require_id(args_obj, "user_id", UserId::try_new) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let mission_id = match require_id(args_obj, "mission_id", MissionId::try_new) {
            Ok(v) => v,
            Err(resp) => return resp,
        };

        match self.store.get_mission_progress(user_id, mission_id) {
            Ok(progress) => ai_ok("missions.progress", progress_to_json(&progress)),
            Err(err) => store_error(err),
        }
    }

    pub(crate) fn tool_validate_mission(&mut self, args: Value) -> Value {
        let args_obj = match require_object(&args) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let user_id = match require_id(args_obj, "user_id", UserId::try_new) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let mission_id = match require_id(args_obj, "mission_id", MissionId::try_new) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let code = match require_string(args_obj, "code") {
            Ok(v) => v,
            Err(resp) => return resp,
        };

        match self.store.validate_mission(ValidateMissionRequest {
            user_id,
            mission_id,
            code,
        }) {
            Ok(report) => ai_ok(
                "missions.validate",
                json!({
                    "success": report.success,
                    "feedback": report.feedback,
                    "attempts": report.attempts,
                    "status": report.status.as_str()
                }),
            ),
            Err(err) => store_error(err),
        }
    }
}
