use deckpick_core::{DeckError, FolderId};
use deckpick_relay::{HttpUpstream, Relay, RelayConfig, Upstream, DEFAULT_USER_AGENT};
use std::thread;
use std::time::{Duration, Instant};
use tiny_http::{Request, Response, Server};

/// Local stand-in for the deck site:
/// `/echo-agent` answers with the request's `User-Agent`,
/// `/slow` waits three seconds,
/// `/folders/9` serves a folder page,
/// anything else is a 404.
fn start_site() -> String {
    let server = Server::http("127.0.0.1:0").expect("bind");
    let addr = server.server_addr().to_ip().expect("ip listener");
    thread::spawn(move || {
        for request in server.incoming_requests() {
            thread::spawn(move || answer(request));
        }
    });
    format!("http://{addr}")
}

fn answer(request: Request) {
    let response = match request.url() {
        "/echo-agent" => {
            let agent = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("User-Agent"))
                .map(|h| h.value.as_str().to_string())
                .unwrap_or_default();
            Response::from_string(agent)
        }
        "/slow" => {
            thread::sleep(Duration::from_secs(3));
            Response::from_string("late")
        }
        "/folders/9" => Response::from_string(
            r#"<html><body><script id="__NEXT_DATA__" type="application/json">
            {"props":{"pageProps":{"user":{"decks":[{"id":5,"name":"Omnath","edhBracket":"4"}]}}}}
            </script></body></html>"#,
        ),
        _ => Response::from_string("gone").with_status_code(404),
    };
    let _ = request.respond(response);
}

fn config(base: &str, timeout_secs: u64) -> RelayConfig {
    RelayConfig {
        upstream_base: base.to_string(),
        timeout: Duration::from_secs(timeout_secs),
        ..RelayConfig::default()
    }
}

#[test]
fn sends_browser_user_agent() {
    let base = start_site();
    let upstream = HttpUpstream::new(&config(&base, 5)).expect("client");
    let response = upstream.get(&format!("{base}/echo-agent")).expect("get");
    assert!(response.is_success());
    assert_eq!(response.body, DEFAULT_USER_AGENT);
    assert!(response.body.starts_with("Mozilla/5.0"));
}

#[test]
fn slow_upstream_times_out_without_status() {
    let base = start_site();
    let upstream = HttpUpstream::new(&config(&base, 1)).expect("client");
    let started = Instant::now();
    let result = upstream.get(&format!("{base}/slow"));
    assert!(started.elapsed() < Duration::from_millis(2500));
    match result {
        Err(DeckError::UpstreamUnavailable { status, reason }) => {
            assert_eq!(status, None);
            assert_eq!(reason, "timed out after 1s");
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[test]
fn error_status_is_returned_not_raised() {
    let base = start_site();
    let upstream = HttpUpstream::new(&config(&base, 5)).expect("client");
    let response = upstream.get(&format!("{base}/missing")).expect("get");
    assert_eq!(response.status, 404);
    assert!(!response.is_success());
}

#[test]
fn refused_connection_has_no_status() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let upstream = HttpUpstream::new(&config(&format!("http://{addr}"), 5)).expect("client");
    assert!(matches!(
        upstream.get(&format!("http://{addr}/folders/1")),
        Err(DeckError::UpstreamUnavailable { status: None, .. })
    ));
}

#[test]
fn relay_reads_folder_over_http() {
    let base = start_site();
    let config = config(&base, 5);
    let relay = Relay::new(HttpUpstream::new(&config).expect("client"), config);
    let decks = relay
        .fetch_folder(&FolderId::parse("9").expect("folder"))
        .expect("folder");
    assert_eq!(decks.len(), 1);
    assert_eq!(decks[0].name, "Omnath");
    assert!(decks[0].has_bracket());
}
