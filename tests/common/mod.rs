//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

pub const MANIFEST: &str = r#"{
    "classes": [
        {"className": "bg-accent", "description": "Accent background\nFrom remote", "previewColor": {"r": 1, "g": 2, "b": 3}},
        {"className": "gap-2", "description": "Gap of 2 units"}
    ],
    "props": [
        {"propName": "hy-remote", "description": "Remote prop", "origin": "remote"}
    ]
}"#;

/// Serve `requests` connections on a local port, answering each with the
/// raw HTTP response `handler` builds from the request path.
pub fn serve<F>(requests: usize, handler: F) -> (String, JoinHandle<()>)
where
    F: Fn(&str) -> String + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        for stream in listener.incoming().take(requests) {
            let mut stream = stream.unwrap();
            let path = read_request_path(&mut stream);
            let _ = stream.write_all(handler(&path).as_bytes());
        }
    });

    (base, handle)
}

/// Serve one response with the given status line and body.
pub fn serve_once(status: &'static str, body: &str) -> (String, JoinHandle<()>) {
    let body = body.to_string();
    let (base, handle) = serve(1, move |_| response(status, &body));
    (format!("{}/hywind-meta.json", base), handle)
}

pub fn response(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    )
}

/// A URL nothing listens on.
pub fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/hywind-meta.json", addr)
}

fn read_request_path(stream: &mut TcpStream) -> String {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];

    loop {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }

    String::from_utf8_lossy(&request)
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string()
}
