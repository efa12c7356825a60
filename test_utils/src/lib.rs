use std::{
    net::SocketAddr,
    sync::{mpsc, Arc, Mutex},
    thread,
};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct TransactionRow {
    #[serde(rename = "Date (UTC)")]
    date: &'static str,
    #[serde(rename = "Description")]
    description: &'static str,
    #[serde(rename = "Amount")]
    amount: &'static str,
}

// Only used during testing so no need to return result
pub fn create_csv(rows: Vec<[&'static str; 3]>) -> String {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for r in rows {
        wtr.serialize(TransactionRow {
            date: r[0],
            description: r[1],
            amount: r[2],
        })
        .unwrap();
    }
    wtr.flush().unwrap();
    String::from_utf8(wtr.into_inner().unwrap()).unwrap()
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub accept_language: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    content_type: &'static str,
    body: Vec<u8>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Stand-in for the invoice generation API. Every POST to `/` is recorded and answered with
/// the same canned response.
pub struct MockInvoiceApi {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockInvoiceApi {
    pub fn pdf(body: &[u8]) -> Self {
        Self::start(200, "application/pdf", body)
    }

    pub fn json_error(status: u16, body: &str) -> Self {
        Self::start(status, "application/json", body.as_bytes())
    }

    pub fn start(status: u16, content_type: &'static str, body: &[u8]) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status: StatusCode::from_u16(status).unwrap(),
            content_type,
            body: body.to_vec(),
            requests: requests.clone(),
        };
        let app = Router::new().route("/", post(generate)).with_state(state);

        // the server thread lives until the test binary exits
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });

        Self {
            addr: rx.recv().unwrap(),
            requests,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn generate(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(RecordedRequest {
        accept_language: header_text(header::ACCEPT_LANGUAGE),
        authorization: header_text(header::AUTHORIZATION),
        body,
    });
    (
        state.status,
        [(header::CONTENT_TYPE, state.content_type)],
        state.body,
    )
}
