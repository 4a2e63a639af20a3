//! Local HTTP endpoints for exercising the fetcher without the real API

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Serves exactly one canned response, then closes
pub struct OneShotServer {
    port: u16,
    target: Arc<Mutex<Option<String>>>,
}

impl OneShotServer {
    pub fn respond(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let target = Arc::new(Mutex::new(None));

        let seen = Arc::clone(&target);
        let body = body.to_string();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let request = read_request_head(&mut stream);
                let request_target = request
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .map(str::to_string);
                *seen.lock().unwrap() = request_target;

                let response = if status == 204 {
                    "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n".to_string()
                } else {
                    format!(
                        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        reason(status),
                        body.len(),
                        body
                    )
                };
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        OneShotServer { port, target }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}/data", self.port)
    }

    /// Path and query of the request the server received
    pub fn request_target(&self) -> String {
        self.target.lock().unwrap().clone().unwrap_or_default()
    }
}

/// Sends the status line and headers of an error response, then stalls
/// before the promised body arrives
pub fn stalled_body_server(status: u16) -> SilentServer {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let accepting = listener.try_clone().unwrap();

    thread::spawn(move || {
        if let Ok((mut stream, _)) = accepting.accept() {
            read_request_head(&mut stream);
            let head = format!(
                "HTTP/1.1 {} {}\r\nContent-Length: 100\r\nConnection: close\r\n\r\npartial",
                status,
                reason(status)
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.flush();
            thread::sleep(Duration::from_secs(3));
        }
    });

    SilentServer {
        port,
        _listener: listener,
    }
}

/// Listening socket kept open for the life of a test
pub struct SilentServer {
    port: u16,
    _listener: TcpListener,
}

impl SilentServer {
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}/data", self.port)
    }
}

/// Accepts connections but never answers
pub fn silent_server() -> SilentServer {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    SilentServer {
        port,
        _listener: listener,
    }
}

/// Base URL on a port nothing is listening on
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/data", port)
}

fn read_request_head(stream: &mut TcpStream) -> String {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();

    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
