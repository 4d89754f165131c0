//! Mock OMDb server for testing
//!
//! Serves the same response shapes as the real API on a local port:
//! - `GET /?apikey=test_key&t=Inception` returns a full record
//! - unknown titles return `{"Response": "False", "Error": "Movie not found!"}`
//! - any other key returns HTTP 401 with `"Invalid API key!"`
//! - the title `Broken` returns a non-JSON HTTP 500

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde_json::json;

/// API key the mock accepts
pub const MOCK_API_KEY: &str = "test_key";

/// Mock OMDb server bound to a random local port
pub struct MockOmdbServer {
    port: u16,
    running: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockOmdbServer {
    pub fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        // Non-blocking accept so stop() can end the loop
        listener.set_nonblocking(true)?;

        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        thread::spawn(move || handle_connection(stream));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}/", self.port)
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockOmdbServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(mut stream: TcpStream) {
    // Accepted sockets inherit non-blocking mode on some platforms
    let _ = stream.set_nonblocking(false);
    let mut buffer = [0; 4096];

    let n = match stream.read(&mut buffer) {
        Ok(n) => n,
        Err(_) => return,
    };
    let request = String::from_utf8_lossy(&buffer[..n]);

    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");
    let query = target.split_once('?').map(|(_, q)| q).unwrap_or("");

    let mut api_key = None;
    let mut title = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "apikey" => api_key = Some(value.into_owned()),
            "t" => title = Some(value.into_owned()),
            _ => {}
        }
    }

    if api_key.as_deref() != Some(MOCK_API_KEY) {
        let body = json!({"Response": "False", "Error": "Invalid API key!"});
        send_response(&mut stream, 401, "Unauthorized", &body.to_string());
        return;
    }

    let body = match title.as_deref() {
        Some("Broken") => {
            send_response(&mut stream, 500, "Internal Server Error", "<html>oops</html>");
            return;
        }
        Some("Inception") => json!({
            "Title": "Inception",
            "Year": "2010",
            "imdbRating": "8.8",
            "Poster": "https://posters.example/inception.jpg",
            "Response": "True"
        }),
        Some("Breaking Bad") => json!({
            "Title": "Breaking Bad",
            "Year": "2008–2013",
            "imdbRating": "9.5",
            "Poster": "https://posters.example/breaking-bad.jpg",
            "Response": "True"
        }),
        Some("Obscure Short") => json!({
            "Title": "Obscure Short",
            "Year": "1999",
            "imdbRating": "N/A",
            "Poster": "N/A",
            "Response": "True"
        }),
        _ => json!({"Response": "False", "Error": "Movie not found!"}),
    };

    send_response(&mut stream, 200, "OK", &body.to_string());
}

fn send_response(stream: &mut TcpStream, status: u16, status_text: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
