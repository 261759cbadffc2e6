//! Application configuration loaded from environment variables.

use std::env;

use journey_core::BlogSettings;
use journey_infra::DatabaseConfig;

/// Site identity used in links, the feed and outgoing mail.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub url: String,
    pub title: String,
}

/// Outgoing mail settings. Without an API URL mail is only logged.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub from: String,
    pub api_url: Option<String>,
    pub api_token: Option<String>,
}

impl MailConfig {
    /// Names of the delivery variables that are set.
    pub fn delivery_settings(&self) -> Vec<&'static str> {
        [
            ("MAIL_API_URL", &self.api_url),
            ("MAIL_API_TOKEN", &self.api_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_some())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub site: SiteConfig,
    pub mail: MailConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = BlogSettings::default();

        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parse_var("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parse_var("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            site: SiteConfig {
                url: env::var("SITE_URL").unwrap_or(defaults.site_url),
                title: env::var("SITE_TITLE").unwrap_or_else(|_| "My blog".to_string()),
            },
            mail: MailConfig {
                from: env::var("MAIL_FROM").unwrap_or(defaults.mail_from),
                api_url: env::var("MAIL_API_URL").ok().filter(|v| !v.is_empty()),
                api_token: env::var("MAIL_API_TOKEN").ok().filter(|v| !v.is_empty()),
            },
        }
    }

    pub fn blog_settings(&self) -> BlogSettings {
        BlogSettings {
            site_url: self.site.url.clone(),
            mail_from: self.mail.from.clone(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
