// Minimal HTTP responder for exercising the client without a real inference server.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::thread;

pub struct Recorded {
	pub method: String,
	pub path: String,
	pub body: String,
}

pub struct MockServer {
	pub url: String,
	requests: Receiver<Recorded>,
}

impl MockServer {
	/// Serve the given `(status, body)` pairs, one per connection, in order.
	pub fn start(responses: Vec<(u16, String)>) -> Self {
		let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
		let url = format!("http://{}", listener.local_addr().unwrap());
		let (tx, rx) = mpsc::channel();

		thread::spawn(move || {
			for (status, body) in responses {
				let Ok((mut stream, _)) = listener.accept() else { return };
				let request = read_request(&mut stream);
				let _ = tx.send(request);

				let reply = format!(
					"HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
					status,
					if status == 200 { "OK" } else { "Error" },
					body.len(),
					body
				);
				let _ = stream.write_all(reply.as_bytes());
				let _ = stream.flush();
			}
		});

		Self { url, requests: rx }
	}

	pub fn next_request(&self) -> Recorded {
		self.requests
			.recv_timeout(std::time::Duration::from_secs(10))
			.expect("mock server received no request")
	}

	pub fn request_count(&self) -> usize {
		self.requests.try_iter().count()
	}
}

fn read_request(stream: &mut TcpStream) -> Recorded {
	let mut data = Vec::new();
	let mut buf = [0u8; 8192];

	let header_end = loop {
		let n = stream.read(&mut buf).unwrap_or(0);
		if n == 0 {
			break data.len();
		}
		data.extend_from_slice(&buf[..n]);
		if let Some(pos) = find(&data, b"\r\n\r\n") {
			break pos + 4;
		}
	};

	let head = String::from_utf8_lossy(&data[..header_end.min(data.len())]).to_string();
	let content_length = head
		.lines()
		.filter_map(|l| l.split_once(':'))
		.find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
		.and_then(|(_, v)| v.trim().parse::<usize>().ok())
		.unwrap_or(0);

	while data.len() < header_end + content_length {
		let n = stream.read(&mut buf).unwrap_or(0);
		if n == 0 {
			break;
		}
		data.extend_from_slice(&buf[..n]);
	}

	let mut request_line = head.lines().next().unwrap_or("").split_whitespace();
	let method = request_line.next().unwrap_or("").to_string();
	let path = request_line.next().unwrap_or("").to_string();
	let body = String::from_utf8_lossy(&data[header_end.min(data.len())..]).to_string();

	Recorded { method, path, body }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
	haystack.windows(needle.len()).position(|w| w == needle)
}

pub fn completion(content: &str) -> String {
	serde_json::json!({
		"id": "chatcmpl-1",
		"object": "chat.completion",
		"choices": [{ "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }]
	})
	.to_string()
}

pub fn model_list(ids: &[&str]) -> String {
	let data: Vec<_> = ids
		.iter()
		.map(|id| serde_json::json!({ "id": id, "object": "model", "owned_by": "local" }))
		.collect();
	serde_json::json!({ "object": "list", "data": data }).to_string()
}

/// A port nothing listens on.
pub fn closed_url() -> String {
	let listener = TcpListener::bind("127.0.0.1:0").unwrap();
	let addr = listener.local_addr().unwrap();
	drop(listener);
	format!("http://{}", addr)
}

pub fn write_png(dir: &Path, name: &str, size: u32) {
	image::RgbImage::from_pixel(size, size, image::Rgb([90, 120, 200]))
		.save(dir.join(name))
		.unwrap();
}
