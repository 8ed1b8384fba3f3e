#![allow(dead_code)]

use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::UnboundedReceiver;

/// Writes `msg` with LSP base-protocol framing.
pub async fn send_msg<W: AsyncWrite + Unpin>(writer: &mut W, msg: &Value) {
    let body = msg.to_string();
    let header = format!("Content-Length: {}\r\n\r\n", body.len());
    writer.write_all(header.as_bytes()).await.unwrap();
    writer.write_all(body.as_bytes()).await.unwrap();
    writer.flush().await.unwrap();
}

/// Reads one framed message. `None` once the stream ends.
pub async fn recv_msg<R: AsyncBufRead + Unpin>(reader: &mut R) -> Option<Value> {
    let mut content_length = None;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await.ok()? == 0 {
            return None;
        }
        let header = line.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            let length: usize = value
                .trim()
                .parse()
                .unwrap_or_else(|e| panic!("Bad Content-Length header {header:?}: {e}"));
            content_length = Some(length);
        }
    }

    let mut body = vec![0u8; content_length?];
    reader.read_exact(&mut body).await.ok()?;
    Some(serde_json::from_slice(&body).unwrap())
}

/// Receives messages until one matches `predicate`, skipping the rest.
pub async fn wait_for<F>(rx: &mut UnboundedReceiver<Value>, predicate: F) -> Value
where
    F: Fn(&Value) -> bool,
{
    let deadline = tokio::time::sleep(Duration::from_secs(5));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            msg = rx.recv() => {
                let msg = msg.expect("server closed the connection");
                if predicate(&msg) {
                    return msg;
                }
            }
            _ = &mut deadline => panic!("timed out waiting for server message"),
        }
    }
}

/// Matches a `publishDiagnostics` notification for `uri`.
pub fn is_publish_for(msg: &Value, uri: &str) -> bool {
    msg["method"] == "textDocument/publishDiagnostics" && msg["params"]["uri"] == uri
}

/// Matches the response to request `id`.
pub fn is_response(msg: &Value, id: i64) -> bool {
    msg["id"] == id && msg.get("method").is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_through_framing() {
        let msg = serde_json::json!({ "jsonrpc": "2.0", "method": "initialized", "params": {} });
        let mut framed = Vec::new();
        send_msg(&mut framed, &msg).await;

        let mut reader = tokio::io::BufReader::new(framed.as_slice());
        assert_eq!(recv_msg(&mut reader).await, Some(msg));
        assert_eq!(recv_msg(&mut reader).await, None);
    }

    #[tokio::test]
    #[should_panic(expected = "Bad Content-Length header")]
    async fn test_rejects_malformed_length() {
        let data = b"Content-Length: many\r\n\r\n{}";
        let mut reader = tokio::io::BufReader::new(&data[..]);
        let _ = recv_msg(&mut reader).await;
    }
}
