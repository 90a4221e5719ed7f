//! Minimal canned-response HTTP server for exercising the client.
//!
//! Each accepted connection serves exactly one canned response and closes,
//! so every client call lands on a fresh connection in order. Raw request
//! bytes are captured for assertions.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One scripted response.
pub struct CannedResponse {
    status: u16,
    content_type: &'static str,
    body: String,
    delay: Option<Duration>,
}

impl CannedResponse {
    /// JSON response with the given status.
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.into(),
            delay: None,
        }
    }

    /// Plain-text response with the given status.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.into(),
            delay: None,
        }
    }

    /// Delay before the response bytes are written.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn render(&self) -> String {
        format!(
            "HTTP/1.1 {} Canned\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            self.content_type,
            self.body.len(),
            self.body
        )
    }
}

/// Running scripted server plus captured request transcripts.
pub struct TestServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// Bind a loopback listener and serve `responses` in order, one per
    /// connection.
    pub async fn spawn(responses: Vec<CannedResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&requests);
        tokio::spawn(async move {
            for response in responses {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                serve_one(stream, response, &captured).await;
            }
        });
        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Base URL of the listener.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Raw transcripts of every request received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests mutex").clone()
    }
}

async fn serve_one(
    mut stream: TcpStream,
    response: CannedResponse,
    captured: &Arc<Mutex<Vec<String>>>,
) {
    let Some(request) = read_request(&mut stream).await else {
        return;
    };
    captured.lock().expect("requests mutex").push(request);
    if let Some(delay) = response.delay {
        tokio::time::sleep(delay).await;
    }
    let _ = stream.write_all(response.render().as_bytes()).await;
    let _ = stream.flush().await;
}

async fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(end) = header_end(&buffer) {
            break end;
        }
    };

    let body_len = content_length(&buffer[..header_end]);
    while buffer.len() < header_end + body_len {
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }

    Some(String::from_utf8_lossy(&buffer).into_owned())
}

fn header_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|index| index + 4)
}

fn content_length(headers: &[u8]) -> usize {
    String::from_utf8_lossy(headers)
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse().ok())?
        })
        .unwrap_or(0)
}
