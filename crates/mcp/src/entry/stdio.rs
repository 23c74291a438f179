#![forbid(unsafe_code)]

use super::framing::{
    TransportMode, detect_mode_from_first_line, parse_request, read_content_length_frame,
    write_frame,
};
use crate::McpServer;
use std::io::{BufRead, BufReader, Write};

pub(crate) fn run_stdio(server: &mut McpServer) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout().lock();
    serve(server, &mut reader, &mut stdout)
}

/// Framing is detected once per process and then kept, so responses never
/// mix styles on one transport.
fn serve<R: BufRead, W: Write>(
    server: &mut McpServer,
    reader: &mut R,
    writer: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mode: Option<TransportMode> = None;

    loop {
        // Bytes first: a line that is not UTF-8 still gets a parse error reply.
        let mut raw = Vec::new();
        if reader.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&raw);

        let current = match mode {
            Some(current) => current,
            None => match detect_mode_from_first_line(&line) {
                Some(detected) => {
                    tracing::debug!(mode = detected.as_str(), "transport framing detected");
                    mode = Some(detected);
                    detected
                }
                None => continue,
            },
        };

        let body = match current {
            TransportMode::NewlineJson => {
                let body = raw.trim_ascii();
                if body.is_empty() {
                    continue;
                }
                body.to_vec()
            }
            TransportMode::ContentLength => {
                if line.trim().is_empty() {
                    continue;
                }
                match read_content_length_frame(reader, line.into_owned())? {
                    Some(body) => body,
                    None => break,
                }
            }
        };

        let response = match parse_request(&body) {
            Ok(request) => server.handle(request),
            Err(error) => {
                tracing::warn!("rejected malformed request");
                Some(error)
            }
        };
        if let Some(response) = response {
            write_frame(writer, current, &response)?;
        }
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::McpServerConfig;
    use gl_storage::SqliteStore;
    use serde_json::Value;
    use std::io::Cursor;

    fn server(label: &str) -> McpServer {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "gl-mcp-stdio-{label}-{}-{nanos}",
            std::process::id()
        ));
        let store = SqliteStore::open(dir).expect("store opens");
        McpServer::new(store, McpServerConfig { history_limit: 10 })
    }

    fn replies(output: &[u8]) -> Vec<Value> {
        output
            .split(|b| *b == b'\n')
            .filter(|line| !line.is_empty())
            .map(|line| serde_json::from_slice(line).expect("reply json"))
            .collect()
    }

    #[test]
    fn invalid_utf8_line_gets_parse_error_and_loop_continues() {
        let mut srv = server("utf8");
        let mut input = Vec::new();
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n");
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":\xff\xfe}\n");
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n");
        let mut reader = Cursor::new(input);
        let mut output = Vec::new();

        serve(&mut srv, &mut reader, &mut output).expect("serve ends at eof");

        let replies = replies(&output);
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0]["id"], 1);
        assert_eq!(replies[1]["error"]["code"], -32700);
        assert_eq!(replies[2]["id"], 2);
        assert_eq!(replies[2]["result"], serde_json::json!({}));
    }
}
