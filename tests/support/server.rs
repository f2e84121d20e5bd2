//! A capturing server helper for the integration tests.
//!
//! Each transaction accepts one connection, records the raw request that
//! arrived on it, and answers with a canned response.

use std::io::{Read, Write};
use std::net;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub struct Server {
    addr: net::SocketAddr,
    panic_rx: mpsc::Receiver<()>,
    captured_rx: mpsc::Receiver<Captured>,
}

impl Server {
    pub fn addr(&self) -> net::SocketAddr {
        self.addr
    }

    /// Wait for the next request the server received.
    pub fn captured(&self) -> Captured {
        self.captured_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("server should capture a request")
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        if !thread::panicking() {
            self.panic_rx
                .recv_timeout(Duration::from_secs(3))
                .expect("test server should not panic");
        }
    }
}

/// A request as it arrived on the wire.
#[derive(Debug)]
pub struct Captured {
    pub raw: Vec<u8>,
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Captured {
    /// Look up a header value, ignoring the case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
pub struct Txn {
    pub response: Vec<u8>,
}

impl Default for Txn {
    fn default() -> Txn {
        Txn {
            response: b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_vec(),
        }
    }
}

pub fn spawn(txns: Vec<Txn>) -> Server {
    let listener = net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (panic_tx, panic_rx) = mpsc::channel();
    let (captured_tx, captured_rx) = mpsc::channel();
    let tname = format!(
        "test({})-support-server",
        thread::current().name().unwrap_or("<unknown>")
    );
    thread::Builder::new()
        .name(tname)
        .spawn(move || {
            for txn in txns {
                let (mut socket, _addr) = listener.accept().unwrap();
                socket
                    .set_read_timeout(Some(Duration::from_secs(5)))
                    .unwrap();

                let captured = read_request(&mut socket);
                let _ = captured_tx.send(captured);

                socket.write_all(&txn.response).unwrap();
            }
            let _ = panic_tx.send(());
        })
        .expect("server thread spawn");

    Server {
        addr,
        panic_rx,
        captured_rx,
    }
}

/// Spawn a server that answers `n` requests with `200 OK`.
pub fn ok(n: usize) -> Server {
    spawn((0..n).map(|_| Txn::default()).collect())
}

fn read_request(socket: &mut net::TcpStream) -> Captured {
    let mut raw = Vec::new();
    let mut buf = [0; 1024];

    let headers_end = loop {
        if let Some(pos) = find(&raw, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut buf).expect("server read");
        if n == 0 {
            panic!("server unexpected socket closed");
        }
        raw.extend_from_slice(&buf[..n]);
    };

    let head = std::str::from_utf8(&raw[..headers_end - 4]).expect("head is utf-8");
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_owned();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_owned(), v.trim().to_owned()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .map(|(_, v)| v.parse::<usize>().expect("content-length is a number"))
        .unwrap_or(0);

    while raw.len() < headers_end + content_length {
        let n = socket.read(&mut buf).expect("server read");
        if n == 0 {
            panic!("server socket closed before body was read");
        }
        raw.extend_from_slice(&buf[..n]);
    }

    let body = raw[headers_end..headers_end + content_length].to_vec();
    Captured {
        raw,
        request_line,
        headers,
        body,
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
