#![forbid(unsafe_code)]

use crate::*;
use gl_core::ids::Username;
use gl_core::model::User;
use serde_json::{Value, json};

fn user_to_json(user: &User) -> Value {
    json!({
        "id": user.id,
        "username": user.username,
        "created_at": ts_ms_to_rfc3339(user.created_at_ms)
    })
}

impl McpServer {
    pub(crate) fn tool_create_user(&mut self, args: Value) -> Value {
        let args_obj = match require_object(&args) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let raw = match require_string(args_obj, "username") {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let username = match Username::try_new(raw) {
            Ok(v) => v,
            Err(err) => return ai_error("INVALID_INPUT", err.message()),
        };

        match self.store.create_user(&username) {
            Ok(user) => ai_ok("users.create", json!({ "user": user_to_json(&user) })),
            Err(err) => store_error(err),
        }
    }

    pub(crate) fn tool_list_users(&mut self, args: Value) -> Value {
        if let Err(resp) = require_object(&args) {
            return resp;
        }
        match self.store.list_users() {
            Ok(users) => ai_ok(
                "users.list",
                json!({ "users": users.iter().map(user_to_json).collect::<Vec<_>>() }),
            ),
            Err(err) => store_error(err),
        }
    }

    pub(crate) fn tool_list_games(&mut self, args: Value) -> Value {
        if let Err(resp) = require_object(&args) {
            return resp;
        }
        match self.store.list_games() {
            Ok(games) => ai_ok(
                "games.list",
                json!({
                    "games": games
                        .iter()
                        .map(|game| json!({
                            "id": game.id,
                            "name": game.name,
                            "display_name": game.display_name,
                            "description": game.description
                        }))
                        .collect::<Vec<_>>()
                }),
            ),
            Err(err) => store_error(err),
        }
    }
}
