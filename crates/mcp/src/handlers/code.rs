#![forbid(unsafe_code)]

use crate::*;
use gl_core::ids::{GameId, UserId, VersionId};
use gl_core::model::{CodeVersion, VersionSummary};
use gl_storage::{DiffRequest, HistoryRequest, RestoreRequest, SaveCodeRequest};
use serde_json::{Value, json};

fn version_to_json(version: &CodeVersion) -> Value {
    json!({
        "id": version.id,
        "code": version.code,
        "message": version.message,
        "is_checkpoint": version.is_checkpoint,
        "created_at": ts_ms_to_rfc3339(version.created_at_ms)
    })
}

fn summary_to_json(summary: &VersionSummary) -> Value {
    json!({
        "id": summary.id,
        "message": summary.message,
        "is_checkpoint": summary.is_checkpoint,
        "created_at": ts_ms_to_rfc3339(summary.created_at_ms),
        "preview": summary.preview
    })
}

impl McpServer {
    pub(crate) fn tool_save_code(&mut self, args: Value) -> Value {
        let args_obj = match require_object(&args) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let user_id = match require_id(args_obj, "user_id", UserId::try_new) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let game_id = match require_id(args_obj, "game_id", GameId::try_new) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let code = match require_string(args_obj, "code") {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let message = match optional_string(args_obj, "message") {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let is_checkpoint = match optional_bool(args_obj, "is_checkpoint") {
            Ok(v) => v.unwrap_or(false),
            Err(resp) => return resp,
        };

        match self.store.save_code(SaveCodeRequest {
            user_id,
            game_id,
            code,
            message,
            is_checkpoint,
        }) {
            Ok(outcome) if outcome.created => ai_ok(
                "code.save",
                json!({
                    "created": true,
                    "message": "Code saved successfully",
                    "version_id": outcome.version.id,
                    "created_at": ts_ms_to_rfc3339(outcome.version.created_at_ms)
                }),
            ),
            Ok(outcome) => ai_ok(
                "code.save",
                json!({
                    "created": false,
                    "message": "No changes detected",
                    "version_id": outcome.version.id
                }),
            ),
            Err(err) => store_error(err),
        }
    }

    pub(crate) fn tool_load_code(&mut self, args: Value) -> Value {
        let args_obj = match require_object(&args) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let user_id = match require_id(args_obj, "user_id", UserId::try_new) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let game_id = match require_id(args_obj, "game_id", GameId::try_new) {
            Ok(v) => v,
            Err(resp) => return resp,
        };

        match self.store.load_code(user_id, game_id) {
            Ok(loaded) => ai_ok(
                "code.load",
                json!({
                    "code": loaded.code,
                    "version_id": loaded.version_id,
                    "created_at": optional_ts(loaded.created_at_ms)
                }),
            ),
            Err(err) => store_error(err),
        }
    }

    pub(crate) fn tool_get_history(&mut self, args: Value) -> Value {
        let args_obj = match require_object(&args) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let user_id = match require_id(args_obj, "user_id", UserId::try_new) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let game_id = match require_id(args_obj, "game_id", GameId::try_new) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let limit = match optional_usize(args_obj, "limit") {
            Ok(v) => v.unwrap_or(self.history_limit),
            Err(resp) => return resp,
        };
        let offset = match optional_usize(args_obj, "offset") {
            Ok(v) => v.unwrap_or(0),
            Err(resp) => return resp,
        };

        match self.store.get_history(HistoryRequest {
            user_id,
            game_id,
            limit,
            offset,
        }) {
            Ok(page) => ai_ok(
                "history.list",
                json!({
                    "versions": page.versions.iter().map(summary_to_json).collect::<Vec<_>>(),
                    "total": page.total,
                    "limit": page.limit,
                    "offset": page.offset,
                    "has_more": page.has_more
                }),
            ),
            Err(err) => store_error(err),
        }
    }

    pub(crate) fn tool_get_version(&mut self, args: Value) -> Value {
        let args_obj = match require_object(&args) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let version_id = match require_id(args_obj, "version_id", VersionId::try_new) {
            Ok(v) => v,
            Err(resp) => return resp,
        };

        match self.store.get_version(version_id) {
            Ok(version) => ai_ok("version.get", version_to_json(&version)),
            Err(err) => store_error(err),
        }
    }

    pub(crate) fn tool_get_diff(&mut self, args: Value) -> Value {
        let args_obj = match require_object(&args) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let from_version = match require_id(args_obj, "version1_id", VersionId::try_new) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let to_version = match require_id(args_obj, "version2_id", VersionId::try_new) {
            Ok(v) => v,
            Err(resp) => return resp,
        };

        match self.store.get_diff(DiffRequest {
            from_version,
            to_version,
        }) {
            Ok(diff) => ai_ok(
                "version.diff",
                json!({
                    "diff": diff.lines,
                    "from_version": diff.from_version,
                    "to_version": diff.to_version
                }),
            ),
            Err(err) => store_error(err),
        }
    }

    pub(crate) fn tool_restore_version(&mut self, args: Value) -> Value {
        let args_obj = match require_object(&args) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let version_id = match require_id(args_obj, "version_id", VersionId::try_new) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let user_id = match require_id(args_obj, "user_id", UserId::try_new) {
            Ok(v) => v,
            Err(resp) => return resp,
        };

        match self.store.restore_version(RestoreRequest {
            version_id,
            user_id,
        }) {
            Ok(restored) => ai_ok(
                "version.restore",
                json!({
                    "message": "Version restored successfully",
                    "version_id": restored.id,
                    "code": restored.code
                }),
            ),
            Err(err) => store_error(err),
        }
    }
}
