// ABOUTME: Environment configuration for the MindMate server process
// ABOUTME: Parses ports, store location, LLM credentials, chat limits, and sleep windows from env vars
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

//! Environment-based configuration

use crate::constants::{chat, defaults, sleep};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string, falling back to development
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// OpenAI-compatible completion provider settings
#[derive(Clone)]
pub struct LlmConfig {
    /// Bearer credential
    pub api_key: String,
    /// Endpoint root, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Bounded timeout for each completion call
    pub request_timeout: Duration,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Chat pipeline limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatConfig {
    /// Turns of history replayed into the completion prompt
    pub history_window: usize,
    /// Turns of history kept after each exchange
    pub history_retained: usize,
    /// Knowledge base snippets injected on the emotional branch
    pub knowledge_top_k: usize,
    /// Longest accepted user message, in characters
    pub max_message_chars: usize,
    /// Bounded timeout for each completion call
    pub completion_timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: chat::HISTORY_WINDOW,
            history_retained: chat::HISTORY_RETAINED,
            knowledge_top_k: chat::KNOWLEDGE_TOP_K,
            max_message_chars: chat::MAX_MESSAGE_CHARS,
            completion_timeout: Duration::from_secs(chat::COMPLETION_TIMEOUT_SECS),
        }
    }
}

/// Sleep analytics windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepConfig {
    /// Window used when a request names none
    pub default_period_days: u32,
    /// Largest window accepted
    pub max_period_days: u32,
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            default_period_days: sleep::DEFAULT_PERIOD_DAYS,
            max_period_days: sleep::MAX_PERIOD_DAYS,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Entry store location (`sqlite:` URL)
    pub database_url: String,
    /// Knowledge base JSON file
    pub knowledge_base_path: PathBuf,
    /// Completion provider
    pub llm: LlmConfig,
    /// Chat limits
    pub chat: ChatConfig,
    /// Sleep analytics windows
    pub sleep: SleepConfig,
    /// Allowed CORS origins; `["*"]` allows any
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is missing, a numeric variable does
    /// not parse, or the resulting values are inconsistent
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow!("OPENAI_API_KEY must be set"))?;

        let request_timeout = Duration::from_secs(parse_env(
            "LLM_REQUEST_TIMEOUT_SECS",
            chat::COMPLETION_TIMEOUT_SECS,
        )?);

        let config = Self {
            http_port: parse_env("HTTP_PORT", defaults::HTTP_PORT)?,
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            database_url: env_var_or("DATABASE_URL", defaults::DATABASE_URL),
            knowledge_base_path: PathBuf::from(env_var_or(
                "KNOWLEDGE_BASE_PATH",
                defaults::KNOWLEDGE_BASE_PATH,
            )),
            llm: LlmConfig {
                api_key,
                base_url: env_var_or("OPENAI_BASE_URL", defaults::LLM_BASE_URL),
                model: env_var_or("OPENAI_MODEL", defaults::LLM_MODEL),
                request_timeout,
            },
            chat: ChatConfig {
                history_window: parse_env("CHAT_HISTORY_WINDOW", chat::HISTORY_WINDOW)?,
                history_retained: parse_env("CHAT_HISTORY_RETAINED", chat::HISTORY_RETAINED)?,
                knowledge_top_k: parse_env("CHAT_KNOWLEDGE_TOP_K", chat::KNOWLEDGE_TOP_K)?,
                max_message_chars: parse_env("CHAT_MAX_MESSAGE_CHARS", chat::MAX_MESSAGE_CHARS)?,
                completion_timeout: request_timeout,
            },
            sleep: SleepConfig {
                default_period_days: parse_env(
                    "SLEEP_DEFAULT_PERIOD_DAYS",
                    sleep::DEFAULT_PERIOD_DAYS,
                )?,
                max_period_days: parse_env("SLEEP_MAX_PERIOD_DAYS", sleep::MAX_PERIOD_DAYS)?,
            },
            cors_origins: parse_origins(&env_var_or("CORS_ORIGINS", "*")),
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistent value
    pub fn validate(&self) -> Result<()> {
        if self.chat.history_retained < self.chat.history_window {
            return Err(anyhow!(
                "CHAT_HISTORY_RETAINED ({}) must be at least CHAT_HISTORY_WINDOW ({})",
                self.chat.history_retained,
                self.chat.history_window
            ));
        }
        if self.chat.knowledge_top_k == 0 {
            return Err(anyhow!("CHAT_KNOWLEDGE_TOP_K must be at least 1"));
        }
        if self.chat.max_message_chars == 0 {
            return Err(anyhow!("CHAT_MAX_MESSAGE_CHARS must be at least 1"));
        }
        if self.sleep.default_period_days == 0
            || self.sleep.default_period_days > self.sleep.max_period_days
        {
            return Err(anyhow!(
                "SLEEP_DEFAULT_PERIOD_DAYS must be between 1 and SLEEP_MAX_PERIOD_DAYS ({})",
                self.sleep.max_period_days
            ));
        }
        if self.llm.request_timeout.is_zero() {
            return Err(anyhow!("LLM_REQUEST_TIMEOUT_SECS must be at least 1"));
        }
        Ok(())
    }

    /// Configuration summary for startup logs, without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "MindMate Server Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Knowledge Base: {}\n\
             - LLM Endpoint: {}\n\
             - LLM Model: {}\n\
             - LLM Timeout: {}s\n\
             - Chat History: window {} / retained {}\n\
             - Sleep Period: default {}d / max {}d\n\
             - CORS Origins: {}",
            self.http_port,
            self.environment,
            if self.database_url.contains(":memory:") {
                "SQLite (in-memory)"
            } else {
                "SQLite"
            },
            self.knowledge_base_path.display(),
            self.llm.base_url,
            self.llm.model,
            self.llm.request_timeout.as_secs(),
            self.chat.history_window,
            self.chat.history_retained,
            self.sleep.default_period_days,
            self.sleep.max_period_days,
            self.cors_origins.join(", "),
        )
    }
}

/// Read an env var with a default
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an env var, using `default` when it is unset
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value: {raw}")),
        Err(_) => Ok(default),
    }
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
