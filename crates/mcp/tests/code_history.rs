#![forbid(unsafe_code)]

mod support;
use support::*;

use serde_json::{Value, json};

fn setup(test_name: &str) -> (Server, i64, i64) {
    let mut server = Server::start_initialized(test_name);
    let user_id = server.create_user("pixel");
    let game_id = server.game_id("snake");
    (server, user_id, game_id)
}

fn save(server: &mut Server, user_id: i64, game_id: i64, code: &str) -> Value {
    server.call_ok(
        "save_code",
        json!({ "user_id": user_id, "game_id": game_id, "code": code }),
    )
}

#[test]
fn load_starts_from_template_and_follows_saves() {
    let (mut server, user_id, game_id) = setup("load_template");

    let loaded = server.call_ok("load_code", json!({ "user_id": user_id, "game_id": game_id }));
    let template = loaded["code"].as_str().expect("code").to_string();
    assert!(template.contains("self.speed = 5"));
    assert_eq!(loaded["version_id"], Value::Null);
    assert_eq!(loaded["created_at"], Value::Null);

    let edited = template.replace("self.speed = 5", "self.speed = 9");
    let saved = save(&mut server, user_id, game_id, &edited);
    assert_eq!(saved["created"], true);
    assert_eq!(saved["message"], "Code saved successfully");
    assert!(saved["created_at"].as_str().is_some_and(|ts| ts.ends_with('Z')));

    let loaded = server.call_ok("load_code", json!({ "user_id": user_id, "game_id": game_id }));
    assert_eq!(loaded["code"], edited.as_str());
    assert_eq!(loaded["version_id"], saved["version_id"]);
}

#[test]
fn duplicate_save_reports_no_changes() {
    let (mut server, user_id, game_id) = setup("duplicate_save");

    let first = save(&mut server, user_id, game_id, "print('hi')\n");
    let second = save(&mut server, user_id, game_id, "print('hi')\n");
    assert_eq!(second["created"], false);
    assert_eq!(second["message"], "No changes detected");
    assert_eq!(second["version_id"], first["version_id"]);

    let history = server.call_ok(
        "get_history",
        json!({ "user_id": user_id, "game_id": game_id }),
    );
    assert_eq!(history["total"], 1);
    assert_eq!(history["limit"], 100);
    assert_eq!(history["has_more"], false);
}

#[test]
fn history_pages_newest_first() {
    let (mut server, user_id, game_id) = setup("history_pages");
    let mut ids = Vec::new();
    for i in 0..5 {
        let saved = save(&mut server, user_id, game_id, &format!("score = {i}\n"));
        ids.push(saved["version_id"].as_i64().expect("version_id"));
    }
    ids.reverse();

    let mut seen = Vec::new();
    let mut offset = 0;
    loop {
        let page = server.call_ok(
            "get_history",
            json!({ "user_id": user_id, "game_id": game_id, "limit": 2, "offset": offset }),
        );
        assert_eq!(page["total"], 5);
        for version in page["versions"].as_array().expect("versions") {
            seen.push(version["id"].as_i64().expect("id"));
            assert!(version["preview"].as_str().is_some());
            assert!(version["created_at"].as_str().is_some());
        }
        if page["has_more"] == false {
            break;
        }
        offset += 2;
    }
    assert_eq!(seen, ids);

    let bad = server.call(
        "get_history",
        json!({ "user_id": user_id, "game_id": game_id, "limit": -3 }),
    );
    assert_eq!(error_code(&bad), "INVALID_INPUT");
}

#[test]
fn version_diff_and_restore() {
    let (mut server, user_id, game_id) = setup("diff_restore");
    let v1 = save(&mut server, user_id, game_id, "a\nb\n")["version_id"].clone();
    let v2 = save(&mut server, user_id, game_id, "a\nc\n")["version_id"].clone();

    let version = server.call_ok("get_version", json!({ "version_id": v1 }));
    assert_eq!(version["code"], "a\nb\n");
    assert_eq!(version["is_checkpoint"], false);
    assert_eq!(version["message"], Value::Null);

    let diff = server.call_ok(
        "get_diff",
        json!({ "version1_id": v1, "version2_id": v2 }),
    );
    assert_eq!(diff["from_version"], v1);
    assert_eq!(diff["to_version"], v2);
    assert_eq!(
        diff["diff"],
        json!([
            format!("--- Version {v1}"),
            format!("+++ Version {v2}"),
            "@@ -1,2 +1,2 @@",
            " a\n",
            "-b\n",
            "+c\n"
        ])
    );

    let same = server.call_ok(
        "get_diff",
        json!({ "version1_id": v2, "version2_id": v2 }),
    );
    assert_eq!(same["diff"], json!([]));

    let restored = server.call_ok(
        "restore_version",
        json!({ "version_id": v1, "user_id": user_id }),
    );
    assert_eq!(restored["message"], "Version restored successfully");
    assert_eq!(restored["code"], "a\nb\n");

    let latest = server.call_ok(
        "get_version",
        json!({ "version_id": restored["version_id"] }),
    );
    assert_eq!(latest["is_checkpoint"], true);
    assert_eq!(latest["message"], format!("Restored from version {v1}"));

    let history = server.call_ok(
        "get_history",
        json!({ "user_id": user_id, "game_id": game_id }),
    );
    assert_eq!(history["total"], 3);

    let missing = server.call(
        "get_diff",
        json!({ "version1_id": v1, "version2_id": 9999 }),
    );
    assert_eq!(error_code(&missing), "NOT_FOUND");
}

#[test]
fn unknown_ids_and_duplicate_users() {
    let (mut server, user_id, game_id) = setup("unknown_ids");

    let resp = server.call(
        "save_code",
        json!({ "user_id": 4242, "game_id": game_id, "code": "x" }),
    );
    assert_eq!(error_code(&resp), "NOT_FOUND");

    let resp = server.call(
        "save_code",
        json!({ "user_id": user_id, "game_id": 4242, "code": "x" }),
    );
    assert_eq!(error_code(&resp), "NOT_FOUND");

    let resp = server.call("save_code", json!({ "user_id": user_id, "game_id": game_id }));
    assert_eq!(error_code(&resp), "INVALID_INPUT");

    let resp = server.call("create_user", json!({ "username": "pixel" }));
    assert_eq!(error_code(&resp), "CONFLICT");

    let resp = server.call("create_user", json!({ "username": " x " }));
    assert_eq!(error_code(&resp), "INVALID_INPUT");

    let users = server.call_ok("list_users", json!({}));
    assert_eq!(users["users"].as_array().map(Vec::len), Some(1));
}
