#![forbid(unsafe_code)]

use serde_json::json;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

struct ContentLengthClient {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    storage_dir: PathBuf,
}

impl ContentLengthClient {
    fn start(test_name: &str) -> Self {
        let storage_dir = temp_dir(test_name);

        let mut child = Command::new(env!("CARGO_BIN_EXE_gl_mcp"))
            .arg("--storage-dir")
            .arg(&storage_dir)
            .env("GAMELAB_LOG", "warn")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .expect("spawn gl_mcp");

        let stdin = child.stdin.take().expect("stdin");
        let stdout = BufReader::new(child.stdout.take().expect("stdout"));

        Self {
            child,
            stdin,
            stdout,
            storage_dir,
        }
    }

    fn send(&mut self, req: serde_json::Value) {
        let body = serde_json::to_vec(&req).expect("serialize request");
        write!(self.stdin, "Content-Length: {}\r\n\r\n", body.len()).expect("write header");
        self.stdin.write_all(&body).expect("write body");
        self.stdin.flush().expect("flush request");
    }

    fn recv(&mut self) -> serde_json::Value {
        let mut content_length: Option<usize> = None;
        loop {
            let mut line = String::new();
            let read = self.stdout.read_line(&mut line).expect("read header line");
            assert!(read > 0, "unexpected EOF reading response headers");
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                break;
            }
            if let Some((key, value)) = trimmed.split_once(':')
                && key.trim().eq_ignore_ascii_case("content-length")
            {
                content_length = Some(value.trim().parse::<usize>().expect("content-length"));
            }
        }

        let len = content_length.expect("missing Content-Length in response");
        let mut buf = vec![0u8; len];
        self.stdout
            .read_exact(&mut buf)
            .expect("read response body");
        serde_json::from_slice(&buf).expect("parse response json")
    }

    fn request(&mut self, req: serde_json::Value) -> serde_json::Value {
        self.send(req);
        self.recv()
    }
}

impl Drop for ContentLengthClient {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_dir_all(&self.storage_dir);
    }
}

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("gl_mcp_cl_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn content_length_framing_round_trips_tool_calls() {
    let mut client = ContentLengthClient::start("framing");

    let init = client.request(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": { "protocolVersion": "2024-11-05", "capabilities": {}, "clientInfo": { "name": "test", "version": "0" } }
    }));
    assert_eq!(init["id"], 1);
    assert!(init.get("result").is_some());

    client.send(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }));

    let call = client.request(json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/call",
        "params": { "name": "list_games", "arguments": {} }
    }));
    assert_eq!(call["id"], 2);
    assert_eq!(call["result"]["isError"], false);
    let text = call["result"]["content"][0]["text"]
        .as_str()
        .expect("text content");
    let envelope: serde_json::Value = serde_json::from_str(text).expect("envelope json");
    assert_eq!(envelope["result"]["games"].as_array().map(Vec::len), Some(6));
}
