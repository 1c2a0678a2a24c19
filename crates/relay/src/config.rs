use anyhow::Context;
use std::time::Duration;

/// Browser-like signature; upstream turns away clients without one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub bind: String,
    pub port: u16,
    pub upstream_base: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// Requests handled at once; further connections queue in the listener.
    pub workers: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            upstream_base: "https://archidekt.com".to_string(),
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            workers: 8,
        }
    }
}

impl RelayConfig {
    /// Defaults overridden by `PORT`, `DECKPICK_BIND`, `DECKPICK_UPSTREAM`,
    /// `DECKPICK_TIMEOUT_SECS` and `DECKPICK_WORKERS`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got {port:?}"))?;
        }
        if let Some(bind) = lookup("DECKPICK_BIND") {
            config.bind = bind.trim().to_string();
        }
        if let Some(base) = lookup("DECKPICK_UPSTREAM") {
            let base = base.trim().trim_end_matches('/');
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                anyhow::bail!("DECKPICK_UPSTREAM must be an http(s) URL, got {base:?}");
            }
            config.upstream_base = base.to_string();
        }
        if let Some(secs) = lookup("DECKPICK_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().with_context(|| {
                format!("DECKPICK_TIMEOUT_SECS must be whole seconds, got {secs:?}")
            })?;
            if secs == 0 {
                anyhow::bail!("DECKPICK_TIMEOUT_SECS must be at least 1");
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(workers) = lookup("DECKPICK_WORKERS") {
            config.workers = workers.trim().parse().with_context(|| {
                format!("DECKPICK_WORKERS must be a thread count, got {workers:?}")
            })?;
            if config.workers == 0 {
                anyhow::bail!("DECKPICK_WORKERS must be at least 1");
            }
        }
        Ok(config)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn folder_url(&self, folder: &str) -> String {
        format!("{}/folders/{folder}", self.upstream_base)
    }

    pub fn deck_api_url(&self, deck: &str) -> String {
        format!("{}/api/decks/{deck}/", self.upstream_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = RelayConfig::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config, RelayConfig::default());
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn env_overrides_apply() {
        let config = RelayConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("DECKPICK_UPSTREAM", "http://127.0.0.1:9000/"),
            ("DECKPICK_TIMEOUT_SECS", "3"),
            ("DECKPICK_WORKERS", "2"),
        ]))
        .expect("config");
        assert_eq!(config.port, 8080);
        assert_eq!(config.folder_url("42"), "http://127.0.0.1:9000/folders/42");
        assert_eq!(config.deck_api_url("7"), "http://127.0.0.1:9000/api/decks/7/");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.workers, 2);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = RelayConfig::from_lookup(lookup(&[("PORT", "http")])).expect_err("bad port");
        assert!(err.to_string().contains("PORT"));
        assert!(RelayConfig::from_lookup(lookup(&[("DECKPICK_TIMEOUT_SECS", "0")])).is_err());
        assert!(RelayConfig::from_lookup(lookup(&[("DECKPICK_UPSTREAM", "ftp://x")])).is_err());
        let err = RelayConfig::from_lookup(lookup(&[("DECKPICK_WORKERS", "0")])).expect_err("zero");
        assert!(err.to_string().contains("DECKPICK_WORKERS"));
    }
}
