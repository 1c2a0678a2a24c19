use crate::{Relay, Upstream};
use deckpick_core::{Deck, DeckError, DeckId, ErrorBody, FolderId};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Folder(String),
    Deck(String),
    NotFound,
}

impl Route {
    pub fn parse(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["api", "folders", id] => Self::Folder((*id).to_string()),
            ["api", "decks", id] => Self::Deck((*id).to_string()),
            _ => Self::NotFound,
        }
    }
}

#[derive(Debug, Serialize)]
struct FolderResponse<'a> {
    decks: &'a [Deck],
}

/// Status plus JSON body, independent of the HTTP library.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn error(err: DeckError) -> Self {
        let status = err.http_status();
        let body = serde_json::to_value(ErrorBody::from(err))
            .unwrap_or_else(|_| json!({"error": "unserializable error"}));
        Self { status, body }
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            body: json!({"error": "not found"}),
        }
    }
}

/// Answers one GET request for `url`.
pub fn dispatch<U: Upstream>(relay: &Relay<U>, url: &str) -> Reply {
    let result = match Route::parse(url) {
        Route::Folder(raw) => FolderId::parse(&raw)
            .and_then(|folder| relay.fetch_folder(&folder))
            .map(|decks| json!(FolderResponse { decks: &decks })),
        Route::Deck(raw) => DeckId::parse(&raw).and_then(|deck| relay.fetch_deck(&deck)),
        Route::NotFound => return Reply::not_found(),
    };
    match result {
        Ok(body) => Reply::ok(body),
        Err(err) => {
            warn!(url = %url, kind = err.kind().id(), error = %err, "request failed");
            Reply::error(err)
        }
    }
}

/// Serves requests until the listener closes. A fixed pool of worker threads
/// shares the listener, so at most `workers` requests run at once.
pub fn serve<U: Upstream + 'static>(server: Server, relay: Arc<Relay<U>>) {
    let server = Arc::new(server);
    let workers: Vec<_> = (0..relay.workers())
        .map(|_| {
            let server = Arc::clone(&server);
            let relay = Arc::clone(&relay);
            thread::spawn(move || {
                for request in server.incoming_requests() {
                    if let Err(err) = handle_request(request, &relay) {
                        error!("request error: {err}");
                    }
                }
            })
        })
        .collect();
    for worker in workers {
        if worker.join().is_err() {
            error!("relay worker panicked");
        }
    }
}

fn handle_request<U: Upstream>(
    request: Request,
    relay: &Relay<U>,
) -> Result<(), Box<dyn std::error::Error>> {
    let started = Instant::now();
    let method = request.method().clone();
    let url = request.url().to_string();
    let reply = match method {
        Method::Get => dispatch(relay, &url),
        Method::Options => {
            let response = Response::empty(StatusCode(204))
                .with_header(header("Access-Control-Allow-Origin", "*")?)
                .with_header(header("Access-Control-Allow-Methods", "GET, OPTIONS")?);
            request.respond(response)?;
            return Ok(());
        }
        _ => Reply {
            status: 405,
            body: json!({"error": "method not allowed"}),
        },
    };
    let status = reply.status;
    respond_json(request, reply)?;
    info!(
        %method,
        url = %url,
        status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "handled"
    );
    Ok(())
}

fn header(name: &str, value: &str) -> Result<Header, Box<dyn std::error::Error>> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|_| format!("invalid header {name}").into())
}

fn respond_json(request: Request, reply: Reply) -> Result<(), Box<dyn std::error::Error>> {
    let body = serde_json::to_vec(&reply.body)?;
    let response = Response::from_data(body)
        .with_status_code(StatusCode(reply.status))
        .with_header(header("Content-Type", "application/json")?)
        .with_header(header("Access-Control-Allow-Origin", "*")?);
    request.respond(response)?;
    Ok(())
}
