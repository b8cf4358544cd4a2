// ABOUTME: Integration tests for environment-driven server configuration
// ABOUTME: Serialized because every test mutates process environment variables
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use mindmate_server::config::{Environment, ServerConfig};
use mindmate_server::constants::{chat, defaults, sleep};
use serial_test::serial;
use std::env;
use std::time::Duration;

const CONFIG_VARS: &[&str] = &[
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
    "OPENAI_MODEL",
    "LLM_REQUEST_TIMEOUT_SECS",
    "HTTP_PORT",
    "ENVIRONMENT",
    "DATABASE_URL",
    "KNOWLEDGE_BASE_PATH",
    "CHAT_HISTORY_WINDOW",
    "CHAT_HISTORY_RETAINED",
    "CHAT_KNOWLEDGE_TOP_K",
    "CHAT_MAX_MESSAGE_CHARS",
    "SLEEP_DEFAULT_PERIOD_DAYS",
    "SLEEP_MAX_PERIOD_DAYS",
    "CORS_ORIGINS",
];

fn clear_config_env() {
    for key in CONFIG_VARS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_missing_api_key_is_rejected() {
    clear_config_env();
    let err = ServerConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("OPENAI_API_KEY"));

    env::set_var("OPENAI_API_KEY", "   ");
    assert!(ServerConfig::from_env().is_err());
    clear_config_env();
}

#[test]
#[serial]
fn test_defaults_apply_when_unset() {
    clear_config_env();
    env::set_var("OPENAI_API_KEY", "sk-test");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, defaults::HTTP_PORT);
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.database_url, defaults::DATABASE_URL);
    assert_eq!(config.llm.base_url, defaults::LLM_BASE_URL);
    assert_eq!(config.llm.model, defaults::LLM_MODEL);
    assert_eq!(
        config.llm.request_timeout,
        Duration::from_secs(chat::COMPLETION_TIMEOUT_SECS)
    );
    assert_eq!(config.chat.history_window, chat::HISTORY_WINDOW);
    assert_eq!(config.chat.history_retained, chat::HISTORY_RETAINED);
    assert_eq!(config.chat.knowledge_top_k, chat::KNOWLEDGE_TOP_K);
    assert_eq!(config.sleep.default_period_days, sleep::DEFAULT_PERIOD_DAYS);
    assert_eq!(config.sleep.max_period_days, sleep::MAX_PERIOD_DAYS);
    assert_eq!(config.cors_origins, vec!["*".to_owned()]);
    clear_config_env();
}

#[test]
#[serial]
fn test_overrides_are_read() {
    clear_config_env();
    env::set_var("OPENAI_API_KEY", "sk-test");
    env::set_var("HTTP_PORT", "9090");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("OPENAI_MODEL", "gpt-4o-mini");
    env::set_var("LLM_REQUEST_TIMEOUT_SECS", "12");
    env::set_var("SLEEP_DEFAULT_PERIOD_DAYS", "14");
    env::set_var("CORS_ORIGINS", "http://localhost:3000, https://app.example.com");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 9090);
    assert!(config.environment.is_production());
    assert_eq!(config.llm.model, "gpt-4o-mini");
    assert_eq!(config.chat.completion_timeout, Duration::from_secs(12));
    assert_eq!(config.sleep.default_period_days, 14);
    assert_eq!(
        config.cors_origins,
        vec!["http://localhost:3000", "https://app.example.com"]
    );
    clear_config_env();
}

#[test]
#[serial]
fn test_bad_numeric_values_are_rejected() {
    for (key, value) in [
        ("HTTP_PORT", "eighty"),
        ("HTTP_PORT", "70000"),
        ("CHAT_HISTORY_WINDOW", "-1"),
        ("LLM_REQUEST_TIMEOUT_SECS", "soon"),
    ] {
        clear_config_env();
        env::set_var("OPENAI_API_KEY", "sk-test");
        env::set_var(key, value);
        let err = ServerConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(key), "{key}={value}: {err}");
    }
    clear_config_env();
}

#[test]
#[serial]
fn test_inconsistent_values_are_rejected() {
    for (key, value) in [
        ("CHAT_HISTORY_RETAINED", "4"),
        ("CHAT_KNOWLEDGE_TOP_K", "0"),
        ("SLEEP_DEFAULT_PERIOD_DAYS", "400"),
        ("LLM_REQUEST_TIMEOUT_SECS", "0"),
    ] {
        clear_config_env();
        env::set_var("OPENAI_API_KEY", "sk-test");
        env::set_var(key, value);
        assert!(ServerConfig::from_env().is_err(), "{key}={value} accepted");
    }
    clear_config_env();
}

#[test]
#[serial]
fn test_debug_and_summary_hide_api_key() {
    clear_config_env();
    env::set_var("OPENAI_API_KEY", "sk-very-secret");

    let config = ServerConfig::from_env().unwrap();
    assert!(!format!("{config:?}").contains("sk-very-secret"));
    assert!(!config.summary().contains("sk-very-secret"));
    clear_config_env();
}
