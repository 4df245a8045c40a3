//! Canned HTTP endpoints for exercising the adapters without the public
//! services.
//!
//! Each [`CannedServer`] listens on an ephemeral loopback port and serves a
//! fixed response to every connection, recording the request head it
//! received. Dropping the server stops the listener and joins its threads.
//!
//! # Example
//!
//! ```no_run
//! use civic_map_data::test_support::CannedServer;
//!
//! let server = CannedServer::respond(200, r#"{"elements": []}"#)?;
//! let endpoint = server.url("/api/interpreter");
//! assert!(endpoint.starts_with("http://127.0.0.1:"));
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::warn;

const STALL_POLL: Duration = Duration::from_millis(20);
const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// What the server does with each connection.
#[derive(Debug, Clone)]
enum Reply {
    Respond { status: u16, body: String },
    Stall(Duration),
}

/// Loopback HTTP server with a fixed reply.
#[derive(Debug)]
pub struct CannedServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    stop: Arc<AtomicBool>,
    accept: Option<JoinHandle<()>>,
}

impl CannedServer {
    /// Serve `status` with a JSON `body` to every request.
    ///
    /// # Errors
    ///
    /// Returns an error if no loopback port can be bound.
    pub fn respond(status: u16, body: impl Into<String>) -> io::Result<Self> {
        Self::start(Reply::Respond {
            status,
            body: body.into(),
        })
    }

    /// Accept connections but hold them open for `delay` without replying.
    ///
    /// # Errors
    ///
    /// Returns an error if no loopback port can be bound.
    pub fn stall(delay: Duration) -> io::Result<Self> {
        Self::start(Reply::Stall(delay))
    }

    fn start(reply: Reply) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));
        let log = Arc::clone(&requests);
        let flag = Arc::clone(&stop);
        let accept = thread::spawn(move || accept_loop(&listener, &reply, &log, &flag));
        Ok(Self {
            addr,
            requests,
            stop,
            accept: Some(accept),
        })
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Request heads received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for CannedServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        let Some(accept) = self.accept.take() else {
            return;
        };
        // Wake the blocking accept so the loop observes the flag.
        if let Err(err) = TcpStream::connect(self.addr) {
            warn!("canned server on {} could not be woken: {err}", self.addr);
            return;
        }
        if accept.join().is_err() {
            warn!("canned server on {} panicked", self.addr);
        }
    }
}

/// URL of a loopback port with nothing listening on it.
///
/// # Errors
///
/// Returns an error if no loopback port can be bound.
pub fn refused_url(path: &str) -> io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}{path}"))
}

fn accept_loop(
    listener: &TcpListener,
    reply: &Reply,
    log: &Arc<Mutex<Vec<String>>>,
    stop: &Arc<AtomicBool>,
) {
    let mut workers = Vec::new();
    for incoming in listener.incoming() {
        if stop.load(Ordering::Acquire) {
            break;
        }
        match incoming {
            Ok(stream) => {
                let canned = reply.clone();
                let requests = Arc::clone(log);
                let stopping = Arc::clone(stop);
                workers.push(thread::spawn(move || {
                    serve(stream, &canned, &requests, &stopping);
                }));
            }
            Err(err) => warn!("canned server accept failed: {err}"),
        }
    }
    for worker in workers {
        if worker.join().is_err() {
            warn!("canned server connection handler panicked");
        }
    }
}

fn serve(mut stream: TcpStream, reply: &Reply, log: &Mutex<Vec<String>>, stop: &AtomicBool) {
    if let Err(err) = stream.set_read_timeout(Some(READ_TIMEOUT)) {
        warn!("canned server could not set read timeout: {err}");
    }
    let head = match read_head(&mut stream) {
        Ok(head) => head,
        Err(err) => {
            warn!("canned server could not read request: {err}");
            return;
        }
    };
    log.lock().unwrap_or_else(PoisonError::into_inner).push(head);
    match reply {
        Reply::Respond { status, body } => {
            let response = format!(
                "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                reason(*status),
                body.len()
            );
            if let Err(err) = stream
                .write_all(response.as_bytes())
                .and_then(|()| stream.flush())
            {
                warn!("canned server could not write response: {err}");
            }
        }
        Reply::Stall(delay) => stall(*delay, stop),
    }
}

fn stall(delay: Duration, stop: &AtomicBool) {
    let deadline = Instant::now() + delay;
    while !stop.load(Ordering::Acquire) {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return;
        }
        thread::sleep(remaining.min(STALL_POLL));
    }
}

fn read_head(stream: &mut TcpStream) -> io::Result<String> {
    let mut head = Vec::new();
    let mut buf = [0_u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let read = stream.read(&mut buf)?;
        if read == 0 {
            break;
        }
        head.extend_from_slice(buf.get(..read).unwrap_or_default());
    }
    Ok(String::from_utf8_lossy(&head).into_owned())
}

const fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Status",
    }
}
