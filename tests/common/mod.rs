#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

pub const API_PREFIX: &str = "/api/client";

pub const SUMMARY_JSON: &str = r#"{
    "currentBalance": "320.75",
    "totalPaid": 48200,
    "pendingPayments": 320.75,
    "nextPaymentDue": "2025-03-01T00:00:00.000Z"
}"#;

pub const INVOICES_JSON: &str = r#"[
    {
        "id": 11,
        "invoiceNumber": "INV-STAGE-5-1",
        "projectName": "Plataforma E-learning",
        "amount": "1250.50",
        "status": "paid",
        "dueDate": "2025-01-10",
        "paidAt": "2025-01-08T14:22:00.000Z",
        "createdAt": "2024-12-20",
        "stageName": "Anticipo del Proyecto",
        "stagePercentage": 25,
        "type": "stage_payment"
    },
    {
        "id": 12,
        "invoiceNumber": "INV-2025-004",
        "projectName": "Sitio Corporativo",
        "amount": 320.75,
        "status": "pending",
        "dueDate": "2025-03-01",
        "createdAt": "2025-02-01",
        "type": "traditional"
    }
]"#;

/// A canned HTTP response.
#[derive(Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn pdf(body: &[u8]) -> Self {
        Self {
            status: 200,
            content_type: "application/pdf",
            body: body.to_vec(),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: Vec::new(),
        }
    }
}

/// A request as the stub server saw it.
#[derive(Debug, Clone)]
pub struct Seen {
    pub path: String,
    pub authorization: Option<String>,
}

/// Minimal HTTP/1.1 server answering from a fixed route table.
///
/// Paths are relative to [`API_PREFIX`]; anything unknown gets a bare 404.
pub struct StubServer {
    pub base_url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl StubServer {
    pub fn start(routes: &[(&str, Reply)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let routes: HashMap<String, Reply> = routes
            .iter()
            .map(|(path, reply)| (format!("{API_PREFIX}{path}"), reply.clone()))
            .collect();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);

        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let _ = handle(stream, &routes, &log);
            }
        });

        Self {
            base_url: format!("http://{addr}{API_PREFIX}"),
            seen,
        }
    }

    /// Standard backend: summary, invoice list and documents for both invoices.
    pub fn billing() -> Self {
        Self::start(&[
            ("/billing", Reply::json(200, SUMMARY_JSON)),
            ("/invoices", Reply::json(200, INVOICES_JSON)),
            ("/stage-invoices/11/download-resimple", Reply::pdf(b"%PDF-receipt")),
            ("/stage-invoices/11/download", Reply::pdf(b"%PDF-stage")),
            ("/invoices/12/download", Reply::pdf(b"%PDF-invoice")),
        ])
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.seen().into_iter().map(|s| s.path).collect()
    }
}

/// A base URL nothing is listening on.
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}{API_PREFIX}")
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<String, Reply>,
    seen: &Mutex<Vec<Seen>>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();

    let mut authorization = None;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 || line == "\r\n" {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("authorization") {
                authorization = Some(value.trim().to_string());
            }
        }
    }

    seen.lock().unwrap().push(Seen {
        path: path.clone(),
        authorization,
    });

    let reply = routes.get(&path).cloned().unwrap_or_else(|| Reply::empty(404));
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        reason(reply.status),
        reply.content_type,
        reply.body.len()
    );
    stream.write_all(head.as_bytes())?;
    stream.write_all(&reply.body)?;
    stream.flush()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Unknown",
    }
}
