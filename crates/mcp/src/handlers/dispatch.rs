#![forbid(unsafe_code)]

use crate::McpServer;
use serde_json::Value;

const TOOL_NAMES: &[&str] = &[
    "save_code",
    "load_code",
    "get_history",
    "get_version",
    "get_diff",
    "restore_version",
    "get_missions",
    "get_mission_progress",
    "validate_mission",
    "create_user",
    "list_users",
    "list_games",
];

pub(crate) fn dispatch_tool_names() -> &'static [&'static str] {
    TOOL_NAMES
}

pub(crate) fn dispatch_tool(server: &mut McpServer, name: &str, args: Value) -> Option<Value> {
    let resp = match name {
        "save_code" => server.tool_save_code(args),
        "load_code" => server.tool_load_code(args),
        "get_history" => server.tool_get_history(args),
        "get_version" => server.tool_get_version(args),
        "get_diff" => server.tool_get_diff(args),
        "restore_version" => server.tool_restore_version(args),
        "get_missions" => server.tool_get_missions(args),
        "get_mission_progress" => server.tool_get_mission_progress(args),
        "validate_mission" => server.tool_validate_mission(args),
        "create_user" => server.tool_create_user(args),
        "list_users" => server.tool_list_users(args),
        "list_games" => server.tool_list_games(args),
        _ => return None,
    };
    Some(resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn tool_definitions_and_dispatch_are_in_sync() {
        let mut defined = BTreeSet::<String>::new();
        for tool in super::super::tool_definitions() {
            let Some(name) = tool.get("name").and_then(|v| v.as_str()) else {
                continue;
            };
            defined.insert(name.to_string());
        }

        let dispatched = dispatch_tool_names()
            .iter()
            .map(|name| (*name).to_string())
            .collect::<BTreeSet<_>>();

        let missing_in_definitions = dispatched.difference(&defined).cloned().collect::<Vec<_>>();
        let missing_in_dispatch = defined.difference(&dispatched).cloned().collect::<Vec<_>>();

        assert!(
            missing_in_definitions.is_empty() && missing_in_dispatch.is_empty(),
            "tool dispatch/definitions mismatch\n  dispatch-only: {missing_in_definitions:?}\n  definitions-only: {missing_in_dispatch:?}"
        );
    }
}
