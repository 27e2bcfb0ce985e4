use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;
use post_client::{ClientConfig, DEFAULT_BASE_URL, DisplayLocale, TimeSettings};

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub timezone: Tz,
    pub locale: DisplayLocale,
    pub log_level: String,
    pub http_connect_timeout_secs: u64,
    pub http_request_timeout_secs: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub server: Option<String>,
    pub timezone: Option<String>,
    pub locale: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = normalize_server(
            lookup("POSTS_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        )?;
        let timezone = parse_timezone(
            &lookup("POSTS_TIMEZONE").unwrap_or_else(|| "America/Sao_Paulo".to_string()),
        )?;
        let locale = lookup("POSTS_LOCALE")
            .unwrap_or_else(|| "pt-BR".to_string())
            .parse::<DisplayLocale>()
            .context("Failed to parse POSTS_LOCALE, expecting pt-BR or en-US")?;
        let log_level = lookup("LOG_LEVEL")
            .or_else(|| lookup("RUST_LOG"))
            .unwrap_or_else(|| "warn".to_string());
        let http_connect_timeout_secs =
            parse_u64(&lookup, "HTTP_CONNECT_TIMEOUT_SECS", 5)?;
        let http_request_timeout_secs =
            parse_u64(&lookup, "HTTP_REQUEST_TIMEOUT_SECS", 15)?;

        Ok(Self {
            api_url,
            timezone,
            locale,
            log_level,
            http_connect_timeout_secs,
            http_request_timeout_secs,
        })
    }

    /// Флаги командной строки важнее переменных окружения.
    pub fn apply(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(server) = overrides.server {
            self.api_url = normalize_server(server)?;
        }
        if let Some(timezone) = overrides.timezone {
            self.timezone = parse_timezone(&timezone)?;
        }
        if let Some(locale) = overrides.locale {
            self.locale = locale
                .parse()
                .with_context(|| format!("unsupported locale {locale:?}"))?;
        }
        Ok(self)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            time: TimeSettings::new(self.timezone, self.locale),
            connect_timeout: Duration::from_secs(self.http_connect_timeout_secs),
            request_timeout: Duration::from_secs(self.http_request_timeout_secs),
        }
    }
}

fn normalize_server(server: String) -> Result<String> {
    let server = server.trim().to_string();
    if server.is_empty() {
        return Err(anyhow!("server address must not be empty"));
    }
    if server.starts_with("http://") || server.starts_with("https://") {
        return Ok(server);
    }

    Ok(format!("http://{server}"))
}

fn parse_timezone(raw: &str) -> Result<Tz> {
    raw.trim()
        .parse::<Tz>()
        .map_err(|e| anyhow!("unknown timezone {raw:?}: {e}"))
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64> {
    let value = lookup(key)
        .unwrap_or_else(|| default.to_string())
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
