use crate::secret::Secret;

pub const DEFAULT_API_URL: &str = "http://localhost:4000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Admin API host, without the `/admin` prefix.
    /// Set via WARDEN_API_URL. Default: http://localhost:4000.
    pub api_url: String,
    /// Set via WARDEN_API_KEY. Required.
    pub api_key: Secret,
    /// Whole-request timeout in seconds. Set via WARDEN_TIMEOUT_SECS. Default: 100.
    pub timeout_secs: u64,
    /// Set via WARDEN_CONNECT_TIMEOUT_SECS. Default: 5.
    pub connect_timeout_secs: u64,
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();
    from_lookup(|key| std::env::var(key).ok())
}

/// Build a config from an arbitrary variable lookup.
pub fn from_lookup<F>(get: F) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = get("WARDEN_API_KEY")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow::anyhow!("WARDEN_API_KEY is not set"))?;

    let api_url = get("WARDEN_API_URL").unwrap_or_else(|| {
        tracing::warn!("WARDEN_API_URL is not set, using {}", DEFAULT_API_URL);
        DEFAULT_API_URL.to_string()
    });
    let parsed = url::Url::parse(&api_url)
        .map_err(|e| anyhow::anyhow!("WARDEN_API_URL '{}' is not a valid URL: {}", api_url, e))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("WARDEN_API_URL must use http or https, got '{}'", parsed.scheme());
    }

    Ok(Config {
        api_url: api_url.trim_end_matches('/').to_string(),
        api_key: Secret::new(api_key),
        timeout_secs: get("WARDEN_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(100),
        connect_timeout_secs: get("WARDEN_CONNECT_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(5),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = from_lookup(lookup(&[("WARDEN_API_KEY", "sk-1")])).unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.api_key.expose(), "sk-1");
        assert_eq!(cfg.timeout_secs, 100);
        assert_eq!(cfg.connect_timeout_secs, 5);
    }

    #[test]
    fn test_missing_api_key_fails() {
        assert!(from_lookup(lookup(&[])).is_err());
        assert!(from_lookup(lookup(&[("WARDEN_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_invalid_url_fails() {
        let err = from_lookup(lookup(&[("WARDEN_API_KEY", "k"), ("WARDEN_API_URL", "not a url")]));
        assert!(err.is_err());
        let err = from_lookup(lookup(&[("WARDEN_API_KEY", "k"), ("WARDEN_API_URL", "ftp://host")]));
        assert!(err.is_err());
    }

    #[test]
    fn test_overrides_and_bad_numbers() {
        let cfg = from_lookup(lookup(&[
            ("WARDEN_API_KEY", "k"),
            ("WARDEN_API_URL", "https://admin.example.com/"),
            ("WARDEN_TIMEOUT_SECS", "30"),
            ("WARDEN_CONNECT_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_url, "https://admin.example.com");
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.connect_timeout_secs, 5);
    }

    #[test]
    fn test_debug_hides_key() {
        let cfg = from_lookup(lookup(&[("WARDEN_API_KEY", "sk-very-secret")])).unwrap();
        assert!(!format!("{:?}", cfg).contains("sk-very-secret"));
    }
}
