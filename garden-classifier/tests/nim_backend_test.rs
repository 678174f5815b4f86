//! The HTTP backend against a one-shot local server.

use garden_classifier::NimBackend;
use garden_core::config::ClassifierConfig;
use garden_core::errors::ClassifierError;
use garden_core::models::CompletionRequest;
use garden_core::traits::ICompletionBackend;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serve one request with `status` and `body`; the raw request comes back
/// on the channel.
async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/v1", listener.local_addr().unwrap());
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + length || n == 0 {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = tx.send(String::from_utf8_lossy(&buf).to_string());
    });
    (url, rx)
}

fn backend(url: String) -> NimBackend {
    NimBackend::new(&ClassifierConfig {
        api_key: Some("secret-key".into()),
        api_url: url,
        ..Default::default()
    })
    .unwrap()
}

fn request() -> CompletionRequest {
    CompletionRequest {
        prompt: "classify this".into(),
        seed: 1234,
        temperature: 0.0,
        top_p: 0.9,
        max_tokens: 500,
    }
}

#[tokio::test]
async fn success_returns_message_content() {
    let (url, rx) = serve_once(
        "200 OK",
        r#"{"choices":[{"message":{"role":"assistant","content":"{\"action\":\"keep\"}"}}]}"#,
    )
    .await;
    let reply = backend(url).complete(&request()).await.unwrap();
    assert_eq!(reply, r#"{"action":"keep"}"#);

    let raw = rx.await.unwrap();
    assert!(raw.starts_with("POST /v1/chat/completions"));
    assert!(raw.to_ascii_lowercase().contains("authorization: bearer secret-key"));
    assert!(raw.contains("\"seed\":1234"));
    assert!(raw.contains("\"stream\":false"));
}

#[tokio::test]
async fn unauthorized_maps_to_auth_rejected() {
    let (url, _rx) = serve_once("401 Unauthorized", r#"{"error":"bad key"}"#).await;
    let err = backend(url).complete(&request()).await.unwrap_err();
    assert_eq!(err, ClassifierError::AuthRejected { status: 401 });
}

#[tokio::test]
async fn not_found_maps_to_model_not_found() {
    let (url, _rx) = serve_once("404 Not Found", "{}").await;
    let err = backend(url).complete(&request()).await.unwrap_err();
    assert!(matches!(err, ClassifierError::ModelNotFound { .. }));
}

#[tokio::test]
async fn empty_choices_are_malformed() {
    let (url, _rx) = serve_once("200 OK", r#"{"choices":[]}"#).await;
    let err = backend(url).complete(&request()).await.unwrap_err();
    assert!(matches!(err, ClassifierError::MalformedResponse { .. }));
}
