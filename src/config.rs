use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "client-validator-cli";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub geocoder_base_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub backoff_on_no_match: bool,
    pub row_pacing_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoder_base_url: DEFAULT_GEOCODER_BASE_URL.to_string(),
            geocoder_user_agent: DEFAULT_USER_AGENT.to_string(),
            geocoder_timeout_secs: 3,
            max_retries: 3,
            retry_backoff_ms: 1000,
            backoff_on_no_match: false,
            row_pacing_ms: 1000,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds and validates the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_blank = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());

        let config = Self {
            geocoder_base_url: non_blank("GEOCODER_BASE_URL")
                .map(|url| {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("GEOCODER_BASE_URL must start with http:// or https://");
                    }
                    Ok(url.trim_end_matches('/').to_string())
                })
                .transpose()?
                .unwrap_or(defaults.geocoder_base_url),
            geocoder_user_agent: non_blank("GEOCODER_USER_AGENT")
                .unwrap_or(defaults.geocoder_user_agent),
            geocoder_timeout_secs: parse_var(
                &lookup,
                "GEOCODER_TIMEOUT_SECS",
                defaults.geocoder_timeout_secs,
            )
            .and_then(|secs| {
                if secs == 0 {
                    anyhow::bail!("GEOCODER_TIMEOUT_SECS must be greater than zero");
                }
                Ok(secs)
            })?,
            max_retries: parse_var(&lookup, "GEOCODE_MAX_RETRIES", defaults.max_retries)
                .and_then(|retries| {
                    if retries == 0 {
                        anyhow::bail!("GEOCODE_MAX_RETRIES must be at least 1");
                    }
                    Ok(retries)
                })?,
            retry_backoff_ms: parse_var(
                &lookup,
                "GEOCODE_RETRY_BACKOFF_MS",
                defaults.retry_backoff_ms,
            )?,
            backoff_on_no_match: parse_var(
                &lookup,
                "GEOCODE_BACKOFF_ON_NO_MATCH",
                defaults.backoff_on_no_match,
            )?,
            row_pacing_ms: parse_var(&lookup, "ROW_PACING_MS", defaults.row_pacing_ms)?,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Geocoder Base URL: {}", config.geocoder_base_url);
        tracing::debug!(
            "Geocoder timeout: {}s, max retries: {}, backoff: {}ms, row pacing: {}ms",
            config.geocoder_timeout_secs,
            config.max_retries,
            config.retry_backoff_ms,
            config.row_pacing_ms
        );

        Ok(config)
    }

    pub fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoder_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn row_pacing(&self) -> Duration {
        Duration::from_millis(self.row_pacing_ms)
    }
}

/// Reads an optional variable, falling back to `default` when unset or blank.
fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", name, raw)),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_match_provider_policy() {
        let config = Config::default();

        assert_eq!(config.geocoder_base_url, DEFAULT_GEOCODER_BASE_URL);
        assert_eq!(config.geocoder_user_agent, "client-validator-cli");
        assert_eq!(config.geocoder_timeout(), Duration::from_secs(3));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_backoff(), Duration::from_secs(1));
        assert_eq!(config.row_pacing(), Duration::from_secs(1));
        assert!(!config.backoff_on_no_match);
    }

    #[test]
    fn test_unset_and_blank_variables_use_defaults() {
        let config = config_from(&[("GEOCODE_MAX_RETRIES", "  "), ("GEOCODER_USER_AGENT", "")])
            .unwrap();

        assert_eq!(config.max_retries, 3);
        assert_eq!(config.geocoder_user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.geocoder_base_url, DEFAULT_GEOCODER_BASE_URL);
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = config_from(&[
            ("GEOCODER_BASE_URL", "http://localhost:8080/"),
            ("GEOCODE_MAX_RETRIES", "5"),
            ("GEOCODE_BACKOFF_ON_NO_MATCH", "true"),
            ("ROW_PACING_MS", "0"),
        ])
        .unwrap();

        assert_eq!(config.geocoder_base_url, "http://localhost:8080");
        assert_eq!(config.max_retries, 5);
        assert!(config.backoff_on_no_match);
        assert_eq!(config.row_pacing(), Duration::ZERO);
    }

    #[test]
    fn test_zero_max_retries_rejected() {
        let err = config_from(&[("GEOCODE_MAX_RETRIES", "0")]).unwrap_err();
        assert!(err.to_string().contains("GEOCODE_MAX_RETRIES"));
    }

    #[test]
    fn test_base_url_without_scheme_rejected() {
        let err = config_from(&[("GEOCODER_BASE_URL", "nominatim.openstreetmap.org")]).unwrap_err();
        assert!(err.to_string().contains("http:// or https://"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(config_from(&[("GEOCODER_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn test_unparseable_number_rejected() {
        let err = config_from(&[("ROW_PACING_MS", "soon")]).unwrap_err();
        assert_eq!(err.to_string(), "ROW_PACING_MS has an invalid value: soon");
    }
}
