//! Service configuration parsed from `STANDIN_*` environment variables.

use axum::{extract::State, Json};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::shared::AppState;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_BACKEND_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_PRESENTATION_TOPIC: &str = "presentation";
pub const DEFAULT_AGENT_READY_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub company_name: String,
    pub page_title: String,
    pub page_description: String,
    pub supports_chat_input: bool,
    pub supports_video_input: bool,
    pub supports_screen_share: bool,
    pub is_pre_connect_buffer_enabled: bool,
    pub start_button_text: String,
    pub agent_name: Option<String>,

    pub bind_addr: String,
    pub backend_base_url: String,
    pub presentation_topic: String,
    pub agent_ready_timeout: Duration,
    pub feed_capacity: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            company_name: "StandIn.ai".to_string(),
            page_title: "StandIn.ai".to_string(),
            page_description: "A voice agent built with LiveKit".to_string(),
            supports_chat_input: true,
            supports_video_input: true,
            supports_screen_share: true,
            is_pre_connect_buffer_enabled: true,
            start_button_text: "Join call".to_string(),
            agent_name: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            backend_base_url: DEFAULT_BACKEND_BASE_URL.to_string(),
            presentation_topic: DEFAULT_PRESENTATION_TOPIC.to_string(),
            agent_ready_timeout: Duration::from_secs(DEFAULT_AGENT_READY_TIMEOUT_SECS),
            feed_capacity: None,
        }
    }
}

impl AppConfig {
    /// Build config from the process environment.
    ///
    /// Every variable is optional:
    /// - `STANDIN_BIND_ADDR`: default `0.0.0.0:3000`
    /// - `STANDIN_BACKEND_URL`: default `http://localhost:8000`
    /// - `STANDIN_PRESENTATION_TOPIC`: default `presentation`
    /// - `STANDIN_AGENT_READY_TIMEOUT_SECS`: default 20
    /// - `STANDIN_FEED_CAPACITY`: unbounded when absent
    /// - `STANDIN_AGENT_NAME`, `STANDIN_COMPANY_NAME`, `STANDIN_PAGE_TITLE`,
    ///   `STANDIN_START_BUTTON_TEXT`
    /// - `STANDIN_SUPPORTS_CHAT_INPUT`, `STANDIN_SUPPORTS_VIDEO_INPUT`,
    ///   `STANDIN_SUPPORTS_SCREEN_SHARE`, `STANDIN_PRE_CONNECT_BUFFER`: `true`/`false`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let string = |key: &str, default: String| lookup(key).unwrap_or(default);
        let flag = |key: &str, default: bool| match lookup(key) {
            Some(raw) => parse_bool(key, &raw),
            None => Ok(default),
        };

        let agent_ready_timeout = match lookup("STANDIN_AGENT_READY_TIMEOUT_SECS") {
            Some(raw) => {
                Duration::from_secs(parse_number("STANDIN_AGENT_READY_TIMEOUT_SECS", &raw)?)
            }
            None => defaults.agent_ready_timeout,
        };
        let feed_capacity = match lookup("STANDIN_FEED_CAPACITY") {
            Some(raw) => match parse_number("STANDIN_FEED_CAPACITY", &raw)? {
                0 => return Err(invalid("STANDIN_FEED_CAPACITY", &raw)),
                n => Some(n as usize),
            },
            None => None,
        };

        Ok(Self {
            company_name: string("STANDIN_COMPANY_NAME", defaults.company_name),
            page_title: string("STANDIN_PAGE_TITLE", defaults.page_title),
            page_description: defaults.page_description,
            supports_chat_input: flag(
                "STANDIN_SUPPORTS_CHAT_INPUT",
                defaults.supports_chat_input,
            )?,
            supports_video_input: flag(
                "STANDIN_SUPPORTS_VIDEO_INPUT",
                defaults.supports_video_input,
            )?,
            supports_screen_share: flag(
                "STANDIN_SUPPORTS_SCREEN_SHARE",
                defaults.supports_screen_share,
            )?,
            is_pre_connect_buffer_enabled: flag(
                "STANDIN_PRE_CONNECT_BUFFER",
                defaults.is_pre_connect_buffer_enabled,
            )?,
            start_button_text: string("STANDIN_START_BUTTON_TEXT", defaults.start_button_text),
            agent_name: lookup("STANDIN_AGENT_NAME").filter(|name| !name.is_empty()),
            bind_addr: string("STANDIN_BIND_ADDR", defaults.bind_addr),
            backend_base_url: string("STANDIN_BACKEND_URL", defaults.backend_base_url)
                .trim_end_matches('/')
                .to_string(),
            presentation_topic: string("STANDIN_PRESENTATION_TOPIC", defaults.presentation_topic),
            agent_ready_timeout,
            feed_capacity,
        })
    }

    /// The part of the config the browser client reads
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            company_name: self.company_name.clone(),
            page_title: self.page_title.clone(),
            page_description: self.page_description.clone(),
            supports_chat_input: self.supports_chat_input,
            supports_video_input: self.supports_video_input,
            supports_screen_share: self.supports_screen_share,
            is_pre_connect_buffer_enabled: self.is_pre_connect_buffer_enabled,
            start_button_text: self.start_button_text.clone(),
            agent_name: self.agent_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub company_name: String,
    pub page_title: String,
    pub page_description: String,
    pub supports_chat_input: bool,
    pub supports_video_input: bool,
    pub supports_screen_share: bool,
    pub is_pre_connect_buffer_enabled: bool,
    pub start_button_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
}

/// GET /config
pub async fn get_client_config(State(state): State<AppState>) -> Json<ClientConfig> {
    Json(state.config.client_config())
}

fn invalid(var: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        var: var.to_string(),
        value: value.to_string(),
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(invalid(var, raw)),
    }
}

fn parse_number(var: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse::<u64>().map_err(|_| invalid(var, raw))
}
