#![forbid(unsafe_code)]

use gl_storage::StoreError;
use serde_json::{Value, json};

pub(crate) fn ai_ok(intent: &str, result: Value) -> Value {
    json!({
        "success": true,
        "intent": intent,
        "result": result,
        "warnings": [],
        "refs": [],
        "error": null
    })
}

pub(crate) fn ai_error(code: &str, message: &str) -> Value {
    ai_error_with(code, message, None)
}

pub(crate) fn ai_error_with(code: &str, message: &str, recovery: Option<&str>) -> Value {
    let mut error_obj = serde_json::Map::new();
    error_obj.insert("code".to_string(), Value::String(code.to_string()));
    error_obj.insert(
        "message".to_string(),
        Value::String(message.trim().to_string()),
    );
    if let Some(recovery) = recovery {
        error_obj.insert(
            "recovery".to_string(),
            Value::String(recovery.trim().to_string()),
        );
    }

    json!({
        "success": false,
        "intent": "error",
        "result": {},
        "warnings": [],
        "refs": [],
        "error": Value::Object(error_obj)
    })
}

/// Short client-facing message. Storage internals stay in the logs.
pub(crate) fn format_store_error(err: &StoreError) -> String {
    match err {
        StoreError::Io(_) | StoreError::Sql(_) | StoreError::CorruptRow(_) => {
            "Storage failure".to_string()
        }
        StoreError::InvalidInput(msg) => format!("Invalid input: {msg}"),
        StoreError::UnknownUser => "User not found".to_string(),
        StoreError::UnknownGame => "Game not found".to_string(),
        StoreError::UnknownVersion => "Version not found".to_string(),
        StoreError::UnknownMission => "Mission not found".to_string(),
        StoreError::UsernameTaken => "Username already exists".to_string(),
    }
}

fn store_error_recovery(err: &StoreError) -> Option<&'static str> {
    match err {
        StoreError::UnknownUser => Some("Use list_users or create_user to get a valid user_id."),
        StoreError::UnknownGame => Some("Use list_games to get a valid game_id."),
        StoreError::UnknownVersion => Some("Use get_history to list existing version ids."),
        StoreError::UnknownMission => Some("Use get_missions to list mission ids for a game."),
        StoreError::UsernameTaken => Some("Pick a different username."),
        _ => None,
    }
}

pub(crate) fn store_error(err: StoreError) -> Value {
    if err.is_not_found() || err.code() == "INVALID_INPUT" || err.code() == "CONFLICT" {
        tracing::debug!(code = err.code(), error = %err, "store rejected request");
    } else {
        tracing::warn!(code = err.code(), error = %err, "store failure");
    }
    ai_error_with(
        err.code(),
        &format_store_error(&err),
        store_error_recovery(&err),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_stable_codes_without_internals() {
        let resp = store_error(StoreError::UnknownVersion);
        assert_eq!(resp["success"], false);
        assert_eq!(resp["error"]["code"], "NOT_FOUND");
        assert_eq!(resp["error"]["message"], "Version not found");
        assert!(resp["error"]["recovery"].is_string());

        let resp = store_error(StoreError::CorruptRow("mission rule"));
        assert_eq!(resp["error"]["code"], "STORE_ERROR");
        assert_eq!(resp["error"]["message"], "Storage failure");
        assert!(resp["error"].get("recovery").is_none());

        assert_eq!(
            store_error(StoreError::UsernameTaken)["error"]["code"],
            "CONFLICT"
        );
    }
}
