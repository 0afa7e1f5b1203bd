//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use file_forwarder::config::ServiceConfig;
use file_forwarder::http::HttpServer;
use file_forwarder::lifecycle::Shutdown;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

pub const UPLOAD_PATH: &str = "/api/submissions";

/// One multipart part as the upstream saw it.
#[derive(Debug, Clone)]
pub struct CapturedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[allow(dead_code)]
impl CapturedPart {
    pub fn text(&self) -> String {
        String::from_utf8(self.bytes.clone()).unwrap()
    }
}

/// One upload as the upstream saw it.
#[derive(Debug, Clone)]
pub struct CapturedUpload {
    pub file_name_header: Option<String>,
    pub mime_type_header: Option<String>,
    pub parts: Vec<CapturedPart>,
}

/// Handle to a running mock upstream.
#[allow(dead_code)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicUsize>,
    pub uploads: Arc<Mutex<Vec<CapturedUpload>>>,
}

#[allow(dead_code)]
impl MockUpstream {
    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, UPLOAD_PATH)
    }

    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> Vec<CapturedUpload> {
        self.uploads.lock().unwrap().clone()
    }
}

type Responder = Arc<dyn Fn(usize) -> (u16, String) + Send + Sync>;

#[derive(Clone)]
struct MockState {
    hits: Arc<AtomicUsize>,
    uploads: Arc<Mutex<Vec<CapturedUpload>>>,
    respond: Responder,
}

/// Start a mock upstream that always answers with `status` and `body`.
#[allow(dead_code)]
pub async fn start_mock_upstream(status: u16, body: &'static str) -> MockUpstream {
    start_programmable_upstream(move |_| (status, body.to_string())).await
}

/// Start a mock upstream whose answer depends on the arrival order
/// (0-based) of each upload.
pub async fn start_programmable_upstream<F>(respond: F) -> MockUpstream
where
    F: Fn(usize) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let state = MockState {
        hits: Arc::new(AtomicUsize::new(0)),
        uploads: Arc::new(Mutex::new(Vec::new())),
        respond: Arc::new(respond),
    };
    let upstream = MockUpstream {
        addr,
        hits: state.hits.clone(),
        uploads: state.uploads.clone(),
    };

    let app = Router::new()
        .route(UPLOAD_PATH, post(capture_upload))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    upstream
}

async fn capture_upload(
    State(state): State<MockState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, String) {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.unwrap().to_vec();
        parts.push(CapturedPart {
            name,
            file_name,
            content_type,
            bytes,
        });
    }

    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    state.uploads.lock().unwrap().push(CapturedUpload {
        file_name_header: header("filename"),
        mime_type_header: header("mimetype"),
        parts,
    });

    let seq = state.hits.fetch_add(1, Ordering::SeqCst);
    let (status, body) = (state.respond)(seq);
    (StatusCode::from_u16(status).unwrap(), body)
}

/// Start a backend that answers every connection with bytes that are not HTTP.
#[allow(dead_code)]
pub async fn start_garbage_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let _ = socket.write_all(b"SSH-2.0-OpenSSH_9.6\r\n").await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Config reading `report.xlsx` from `dir` and uploading to `upstream_url`.
pub fn forwarder_config(dir: &Path, upstream_url: &str) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.source.directory = dir.to_string_lossy().into_owned();
    config.source.file_name = "report.xlsx".into();
    config.upstream.url = upstream_url.to_string();
    config
}

/// A running forwarder.
#[allow(dead_code)]
pub struct RunningForwarder {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<ServiceConfig>,
}

impl RunningForwarder {
    pub fn endpoint(&self) -> String {
        format!("http://{}/send-file", self.addr)
    }
}

/// Start the forwarder on an ephemeral port.
pub async fn start_forwarder(config: ServiceConfig) -> RunningForwarder {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    RunningForwarder {
        addr,
        shutdown,
        config_updates,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
