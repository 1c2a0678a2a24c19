use anyhow::Context;
use deckpick_relay::{serve, HttpUpstream, Relay, RelayConfig};
use std::sync::Arc;
use tiny_http::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = RelayConfig::from_env()?;
    let upstream = HttpUpstream::new(&config).context("build upstream client")?;
    let addr = config.listen_addr();
    let server = Server::http(&addr)
        .map_err(|err| anyhow::anyhow!(err.to_string()))
        .with_context(|| format!("listen on {addr}"))?;
    info!(
        addr = %addr,
        upstream = %config.upstream_base,
        timeout_secs = config.timeout.as_secs(),
        "relay listening"
    );
    serve(server, Arc::new(Relay::new(upstream, config)));
    Ok(())
}
