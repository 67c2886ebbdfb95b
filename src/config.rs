use std::env;
use std::time::Duration;

use chrono_tz::Tz;

use crate::errors::AppError;

pub const DEFAULT_TIMEZONE: &str = "Europe/Rome";
pub const BASE_URL_VAR: &str = "APPOINTMENTS_API_BASE_URL";

/// Where the scheduling API base URL comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum BaseUrlSource {
    /// Environment variable, looked up on every call.
    Env(String),
    Fixed(String),
}

impl BaseUrlSource {
    pub fn resolve(&self) -> Option<String> {
        match self {
            BaseUrlSource::Env(var) => env::var(var).ok().filter(|v| !v.trim().is_empty()),
            BaseUrlSource::Fixed(url) => Some(url.clone()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub tool_api_token: String,
    pub appointments_api_base_url: BaseUrlSource,
    pub booking_timezone: String,
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
    pub request_timeout_secs: u64,
    pub verbose_errors: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            tool_api_token: env::var("TOOL_API_TOKEN").unwrap_or_default(),
            appointments_api_base_url: BaseUrlSource::Env(BASE_URL_VAR.to_string()),
            booking_timezone: env::var("BOOKING_TIMEZONE")
                .unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string()),
            max_attempts: env::var("BOOKING_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            retry_backoff_ms: env::var("BOOKING_RETRY_BACKOFF_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            request_timeout_secs: env::var("BOOKING_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            verbose_errors: env::var("BOOKING_VERBOSE_ERRORS")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

/// Typed view of the booking-related part of [`AppConfig`].
#[derive(Clone, Debug)]
pub struct BookingSettings {
    pub base_url: BaseUrlSource,
    pub timezone: Tz,
    pub max_attempts: u32,
    pub backoff: Duration,
    pub request_timeout: Duration,
    pub verbose_errors: bool,
}

impl BookingSettings {
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let timezone: Tz = config.booking_timezone.trim().parse().map_err(|_| {
            AppError::Config(format!(
                "unknown BOOKING_TIMEZONE: {}",
                config.booking_timezone
            ))
        })?;

        Ok(Self {
            base_url: config.appointments_api_base_url.clone(),
            timezone,
            max_attempts: config.max_attempts.max(1),
            backoff: Duration::from_millis(config.retry_backoff_ms),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            verbose_errors: config.verbose_errors,
        })
    }
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            base_url: BaseUrlSource::Env(BASE_URL_VAR.to_string()),
            timezone: chrono_tz::Europe::Rome,
            max_attempts: 2,
            backoff: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
            verbose_errors: false,
        }
    }
}
