use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// One request captured by [`StubServer`]
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request line and headers, lower-cased
    pub head: String,
    pub body: String,
    pub received: Instant,
}

impl RecordedRequest {
    #[allow(dead_code)]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Request body should be JSON")
    }
}

/// Minimal HTTP/1.1 server answering every request with canned responses.
///
/// Responses are used in order; the last one repeats once the list runs out.
pub struct StubServer {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    _handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl StubServer {
    pub async fn start(status: u16, body: &str) -> Self {
        Self::start_with(vec![(status, body.to_string())]).await
    }

    pub async fn start_with(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let url = format!("http://{}/addToNodeV2", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            let mut served = 0usize;
            while let Ok((stream, _)) = listener.accept().await {
                let (status, body) = responses[served.min(responses.len() - 1)].clone();
                served += 1;
                let mut stream = stream;
                if let Some(request) = read_request(&mut stream).await {
                    recorded.lock().unwrap().push(request);
                    respond(&mut stream, status, &body).await;
                }
            }
        });

        Self {
            url,
            requests,
            _handle: handle,
        }
    }

    /// A server that writes `raw` verbatim as every response, then closes the connection
    pub async fn start_raw(raw: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let url = format!("http://{}/addToNodeV2", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        let raw = raw.to_string();
        let handle = tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                if let Some(request) = read_request(&mut stream).await {
                    recorded.lock().unwrap().push(request);
                    let _ = stream.write_all(raw.as_bytes()).await;
                    let _ = stream.shutdown().await;
                }
            }
        });

        Self {
            url,
            requests,
            _handle: handle,
        }
    }

    /// A server that accepts connections but never answers
    pub async fn start_silent() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let url = format!("http://{}/addToNodeV2", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                open.push(stream);
            }
        });

        Self {
            url,
            requests: Arc::new(Mutex::new(Vec::new())),
            _handle: handle,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(pos) = find(&buffer, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buffer.len() < header_end + content_length {
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }
    Some(RecordedRequest {
        head,
        body: String::from_utf8_lossy(&buffer[header_end..]).to_string(),
        received: Instant::now(),
    })
}

async fn respond(stream: &mut TcpStream, status: u16, body: &str) {
    let response = format!(
        "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// A local URL nothing listens on
#[allow(dead_code)]
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/addToNodeV2")
}
