#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hibp_range_check::{
    BreachRecord, CompletionEvent, Error, HashPrefix, ProgressReporter, RangeSource, Sha1Hasher,
    parse_range_body,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Debug, Default, Clone)]
struct MockRange {
    body: String,
    delay: Duration,
    status: Option<u16>,
}

/// In-memory range source keyed by the prefix of each registered password.
#[derive(Debug, Default)]
pub struct MockRangeSource {
    ranges: HashMap<HashPrefix, MockRange>,
    active: AtomicUsize,
    peak: AtomicUsize,
    requested: Mutex<Vec<HashPrefix>>,
}

impl MockRangeSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn range_for(&mut self, password: &str) -> &mut MockRange {
        let prefix = Sha1Hasher::new().hash(password).prefix();
        self.ranges.entry(prefix).or_default()
    }

    /// Appends raw response lines to the range holding `password`.
    pub fn with_lines(mut self, password: &str, lines: &str) -> Self {
        self.range_for(password).body.push_str(lines);
        self
    }

    /// Adds a record for `password`'s own suffix.
    pub fn with_breach(self, password: &str, count: u64) -> Self {
        let suffix = Sha1Hasher::new().hash(password).suffix().to_string();
        self.with_lines(password, &format!("{suffix}:{count}\r\n"))
    }

    pub fn with_delay(mut self, password: &str, delay: Duration) -> Self {
        let range = self.range_for(password);
        range.delay = range.delay.max(delay);
        self
    }

    pub fn with_status(mut self, password: &str, status: u16) -> Self {
        self.range_for(password).status = Some(status);
        self
    }

    /// Most range queries observed in flight at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<HashPrefix> {
        self.requested.lock().unwrap().clone()
    }
}

impl RangeSource for MockRangeSource {
    async fn fetch_range(&self, prefix: &HashPrefix) -> Result<Vec<BreachRecord>, Error> {
        self.requested.lock().unwrap().push(*prefix);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let range = self.ranges.get(prefix).cloned().unwrap_or_default();
        tokio::time::sleep(range.delay).await;
        self.active.fetch_sub(1, Ordering::SeqCst);

        match range.status {
            Some(status) => Err(Error::HttpStatus { prefix: *prefix, status }),
            None => parse_range_body(prefix, &range.body),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub started: Mutex<Option<usize>>,
    pub events: Mutex<Vec<CompletionEvent>>,
    pub groups: Mutex<Vec<usize>>,
    pub finished: AtomicUsize,
}

impl ProgressReporter for RecordingReporter {
    fn on_batch_start(&self, total: usize) {
        *self.started.lock().unwrap() = Some(total);
    }

    fn on_complete(&self, event: &CompletionEvent) {
        self.events.lock().unwrap().push(*event);
    }

    fn on_group_complete(&self, group: usize) {
        self.groups.lock().unwrap().push(group);
    }

    fn on_batch_finish(&self) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

/// A canned HTTP response from the loopback server.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
    pub delay: Duration,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Self::bytes(body.as_bytes())
    }

    pub fn bytes(body: &[u8]) -> Self {
        Self { status: 200, body: body.to_vec(), delay: Duration::ZERO }
    }

    pub fn status(status: u16) -> Self {
        Self { status, body: Vec::new(), delay: Duration::ZERO }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Responder = dyn Fn(usize, &str) -> Reply + Send + Sync;

/// Minimal HTTP/1.1 server on 127.0.0.1 that records each request head.
pub struct FakeRangeApi {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeRangeApi {
    /// `respond` receives the zero-based request number and the request path.
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(usize, &str) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let respond: Arc<Responder> = Arc::new(respond);

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else { break };
                let seen = Arc::clone(&seen);
                let respond = Arc::clone(&respond);
                tokio::spawn(async move {
                    let mut head = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => head.extend_from_slice(&buf[..n]),
                        }
                    }
                    let head = String::from_utf8_lossy(&head).into_owned();
                    let path = head.split_whitespace().nth(1).unwrap_or_default().to_string();
                    let number = {
                        let mut seen = seen.lock().unwrap();
                        seen.push(head);
                        seen.len() - 1
                    };

                    let reply = respond(number, &path);
                    tokio::time::sleep(reply.delay).await;
                    let head = format!(
                        "HTTP/1.1 {} Fake\r\nContent-Type: text/plain\r\n\
                         Content-Length: {}\r\nConnection: close\r\n\r\n",
                        reply.status,
                        reply.body.len(),
                    );
                    let _ = stream.write_all(head.as_bytes()).await;
                    let _ = stream.write_all(&reply.body).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        Self { addr, requests }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}
