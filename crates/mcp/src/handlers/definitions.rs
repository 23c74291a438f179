#![forbid(unsafe_code)]

use serde_json::{Value, json};

fn id_prop(description: &str) -> Value {
    json!({ "type": "integer", "minimum": 1, "description": description })
}

pub(crate) fn tool_definitions() -> Vec<Value> {
    let mut tools = vec![
        json!({
            "name": "save_code",
            "description": "Save a code snapshot for a user and game. Identical code is not saved twice.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user_id": id_prop("User id"),
                    "game_id": id_prop("Game id"),
                    "code": { "type": "string" },
                    "message": { "type": "string" },
                    "is_checkpoint": { "type": "boolean" }
                },
                "required": ["user_id", "game_id", "code"]
            }
        }),
        json!({
            "name": "load_code",
            "description": "Latest saved code for a user and game, or the game template.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user_id": id_prop("User id"),
                    "game_id": id_prop("Game id")
                },
                "required": ["user_id", "game_id"]
            }
        }),
        json!({
            "name": "get_history",
            "description": "Saved versions, newest first, with a short code preview.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user_id": id_prop("User id"),
                    "game_id": id_prop("Game id"),
                    "limit": { "type": "integer", "minimum": 0 },
                    "offset": { "type": "integer", "minimum": 0 }
                },
                "required": ["user_id", "game_id"]
            }
        }),
        json!({
            "name": "get_version",
            "description": "Full code and metadata of one saved version.",
            "inputSchema": {
                "type": "object",
                "properties": { "version_id": id_prop("Version id") },
                "required": ["version_id"]
            }
        }),
        json!({
            "name": "get_diff",
            "description": "Unified line diff from version1 to version2.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "version1_id": id_prop("Older version id"),
                    "version2_id": id_prop("Newer version id")
                },
                "required": ["version1_id", "version2_id"]
            }
        }),
        json!({
            "name": "restore_version",
            "description": "Copy an old version forward as a new checkpoint.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "version_id": id_prop("Version to restore"),
                    "user_id": id_prop("User id")
                },
                "required": ["version_id", "user_id"]
            }
        }),
        json!({
            "name": "get_missions",
            "description": "Missions of a game in play order.",
            "inputSchema": {
                "type": "object",
                "properties": { "game_id": id_prop("Game id") },
                "required": ["game_id"]
            }
        }),
        json!({
            "name": "get_mission_progress",
            "description": "Status and attempt count of a user on a mission.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user_id": id_prop("User id"),
                    "mission_id": id_prop("Mission id")
                },
                "required": ["user_id", "mission_id"]
            }
        }),
        json!({
            "name": "validate_mission",
            "description": "Check code against a mission rule and record the attempt. Code is inspected, never run.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user_id": id_prop("User id"),
                    "mission_id": id_prop("Mission id"),
                    "code": { "type": "string" }
                },
                "required": ["user_id", "mission_id", "code"]
            }
        }),
        json!({
            "name": "create_user",
            "description": "Create a user.",
            "inputSchema": {
                "type": "object",
                "properties": { "username": { "type": "string", "minLength": 2 } },
                "required": ["username"]
            }
        }),
        json!({
            "name": "list_users",
            "description": "All users.",
            "inputSchema": { "type": "object", "properties": {}, "required": [] }
        }),
        json!({
            "name": "list_games",
            "description": "All games with their descriptions.",
            "inputSchema": { "type": "object", "properties": {}, "required": [] }
        }),
    ];
    tools.sort_by_key(|tool| {
        tool.get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    });
    tools
}
