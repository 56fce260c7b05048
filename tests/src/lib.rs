//! Fixtures shared by the integration tests: corpus documents and a tiny
//! HTTP server that answers like the MediaWiki search/extracts API.

use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct WikiPage {
    pub pageid: u64,
    pub title: String,
    pub extract: Option<String>,
    /// Extract requests for this page answer 500.
    pub broken: bool,
}

impl WikiPage {
    pub fn new(pageid: u64, title: &str, extract: &str) -> Self {
        Self {
            pageid,
            title: title.to_string(),
            extract: Some(extract.to_string()),
            broken: false,
        }
    }

    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct WikiFixture {
    /// Search hits, in ranking order.
    pub pages: Vec<WikiPage>,
    /// Status for search requests; 0 means 200.
    pub search_status: u16,
    /// Delay before every response.
    pub delay: Duration,
}

#[derive(Default)]
struct Counters {
    search: AtomicUsize,
    extract: AtomicUsize,
}

pub struct MockWiki {
    addr: SocketAddr,
    counters: Arc<Counters>,
    handle: JoinHandle<()>,
}

impl MockWiki {
    pub async fn start(fixture: WikiFixture) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let fixture = Arc::new(fixture);
        let counters = Arc::new(Counters::default());

        let server_counters = Arc::clone(&counters);
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, Arc::clone(&fixture), Arc::clone(&server_counters)));
            }
        });

        Self {
            addr,
            counters,
            handle,
        }
    }

    pub fn api_url(&self) -> String {
        format!("http://{}/w/api.php", self.addr)
    }

    pub fn search_requests(&self) -> usize {
        self.counters.search.load(Ordering::SeqCst)
    }

    pub fn extract_requests(&self) -> usize {
        self.counters.extract.load(Ordering::SeqCst)
    }
}

impl Drop for MockWiki {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(mut stream: TcpStream, fixture: Arc<WikiFixture>, counters: Arc<Counters>) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let head = String::from_utf8_lossy(&request);
    let target = head.split_whitespace().nth(1).unwrap_or("/");
    let params: HashMap<&str, &str> = target
        .split_once('?')
        .map(|(_, query)| query)
        .unwrap_or("")
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .collect();

    let (status, body) = if params.get("list") == Some(&"search") {
        counters.search.fetch_add(1, Ordering::SeqCst);
        search_response(&fixture)
    } else if let Some(id) = params.get("pageids") {
        counters.extract.fetch_add(1, Ordering::SeqCst);
        extract_response(&fixture, id)
    } else {
        (400, json!({"error": {"code": "badrequest"}}).to_string())
    };

    if !fixture.delay.is_zero() {
        tokio::time::sleep(fixture.delay).await;
    }

    let response = format!(
        "HTTP/1.1 {status} {}\r\nContent-Type: application/json; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        if status == 200 { "OK" } else { "Error" },
        body.len(),
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn search_response(fixture: &WikiFixture) -> (u16, String) {
    if fixture.search_status != 0 && fixture.search_status != 200 {
        return (fixture.search_status, "upstream unavailable".to_string());
    }
    let hits: Vec<_> = fixture
        .pages
        .iter()
        .map(|page| json!({"ns": 0, "title": page.title, "pageid": page.pageid, "snippet": ""}))
        .collect();
    let body = json!({
        "batchcomplete": "",
        "query": {"searchinfo": {"totalhits": hits.len()}, "search": hits},
    });
    (200, body.to_string())
}

fn extract_response(fixture: &WikiFixture, id: &str) -> (u16, String) {
    let Some(page) = fixture.pages.iter().find(|p| p.pageid.to_string() == id) else {
        return (200, json!({"query": {"pages": {"-1": {"ns": 0, "missing": ""}}}}).to_string());
    };
    if page.broken {
        return (500, "internal error".to_string());
    }
    let mut entry = json!({"pageid": page.pageid, "ns": 0, "title": page.title});
    if let Some(extract) = &page.extract {
        entry["extract"] = json!(extract);
    }
    let mut pages = serde_json::Map::new();
    pages.insert(id.to_string(), entry);
    let body = json!({"batchcomplete": "", "query": {"pages": pages}});
    (200, body.to_string())
}

pub fn news_corpus_json() -> String {
    json!([
        {
            "title": "Cats",
            "content": "Cats are small mammals",
            "keywords": ["mammals", "small"]
        },
        {
            "title": "Central banks",
            "content": "Central banks raise interest rates to fight inflation",
            "source": {"id": "reuters", "name": "Reuters"}
        },
        {
            "title": "Mars rover",
            "content": "The rover found traces of ancient water on Mars",
            "url": "https://example.org/mars-rover",
            "source": "NASA"
        },
        {
            "title": "Broken record"
        }
    ])
    .to_string()
}
