use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// One canned HTTP answer.
#[derive(Debug, Clone)]
pub struct Reply {
    status: String,
    content_type: String,
    body: String,
}

impl Reply {
    pub fn new(status: &str, content_type: &str, body: &str) -> Self {
        Self {
            status: status.to_string(),
            content_type: content_type.to_string(),
            body: body.to_string(),
        }
    }

    pub fn html(body: &str) -> Self {
        Self::new("200 OK", "text/html", body)
    }

    pub fn json(body: &str) -> Self {
        Self::new("200 OK", "application/json", body)
    }

    pub fn status(status: &str) -> Self {
        Self::new(status, "text/plain", "")
    }

    fn to_wire(&self) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            self.content_type,
            self.body.len(),
            self.body
        )
    }
}

/// A running stub server.
pub struct Stub {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    requests: mpsc::UnboundedReceiver<String>,
}

impl Stub {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Connections accepted so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// The next raw request received, in arrival order.
    pub async fn next_request(&mut self) -> String {
        self.requests.recv().await.unwrap()
    }
}

/// Answers by request path. Each path serves its replies in order and then
/// keeps repeating the last one. Unknown paths get a 404.
pub async fn serve(routes: Vec<(&str, Vec<Reply>)>) -> Stub {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let (tx, requests) = mpsc::unbounded_channel();

    let routes: Arc<HashMap<String, Vec<Reply>>> =
        Arc::new(routes.into_iter().map(|(path, replies)| (path.to_string(), replies)).collect());
    let served: Arc<Mutex<HashMap<String, usize>>> = Arc::default();

    let counter = Arc::clone(&hits);
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { return };
            counter.fetch_add(1, Ordering::SeqCst);
            let routes = Arc::clone(&routes);
            let served = Arc::clone(&served);
            let tx = tx.clone();

            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

                let reply = match routes.get(&path).filter(|replies| !replies.is_empty()) {
                    Some(replies) => {
                        let mut served = served.lock().unwrap();
                        let n = served.entry(path).or_insert(0);
                        let reply = replies[(*n).min(replies.len() - 1)].clone();
                        *n += 1;
                        reply
                    }
                    None => Reply::status("404 Not Found"),
                };

                let _ = tx.send(request);
                let _ = socket.write_all(reply.to_wire().as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    Stub { addr, hits, requests }
}

/// Reads one request: headers plus `Content-Length` bytes of body.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&raw).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let body_len = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            if raw.len() >= end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&raw).to_string()
}
