use anyhow::{Context, Result};
use grader::GeminiConfig;
use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_MAX_BODY_MB: usize = 25;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Upper bound on a request body. Images arrive base64-encoded inside the
    /// JSON, so this is well above axum's 2 MB default.
    pub max_body_bytes: usize,
    pub gemini: GeminiConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = lookup("GRADER_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .trim()
            .parse()
            .with_context(|| format!("GRADER_BIND_ADDR is not a socket address: {bind_addr:?}"))?;

        let max_body_mb = match lookup("GRADER_MAX_BODY_MB") {
            Some(mb) => mb
                .trim()
                .parse::<usize>()
                .with_context(|| format!("GRADER_MAX_BODY_MB must be a whole number, got {mb:?}"))?,
            None => DEFAULT_MAX_BODY_MB,
        };

        let max_body_bytes = max_body_mb
            .checked_mul(1024 * 1024)
            .with_context(|| format!("GRADER_MAX_BODY_MB is too large: {max_body_mb}"))?;

        Ok(Self {
            bind_addr,
            max_body_bytes,
            gemini: GeminiConfig::from_lookup(&lookup)?,
        })
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
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.max_body_bytes, 25 * 1024 * 1024);
        assert_eq!(config.gemini, GeminiConfig::default());
    }

    #[test]
    fn reads_overrides_including_model_settings() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("GRADER_BIND_ADDR", "127.0.0.1:8080"),
            ("GRADER_MAX_BODY_MB", "4"),
            ("GEMINI_MODEL", "gemini-2.5-flash"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.max_body_bytes, 4 * 1024 * 1024);
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
    }

    #[test]
    fn rejects_body_limit_that_overflows() {
        let huge = usize::MAX.to_string();
        let err = ServerConfig::from_lookup(lookup(&[("GRADER_MAX_BODY_MB", &huge)])).unwrap_err();
        assert!(err.to_string().contains("GRADER_MAX_BODY_MB"));
    }

    #[test]
    fn rejects_bad_address() {
        let err = ServerConfig::from_lookup(lookup(&[("GRADER_BIND_ADDR", "nowhere")])).unwrap_err();
        assert!(err.to_string().contains("GRADER_BIND_ADDR"));
    }
}
