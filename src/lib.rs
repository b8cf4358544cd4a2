// ABOUTME: Main library entry point for the MindMate wellness companion backend
// ABOUTME: Sleep analytics over a SQLite entry store and an emotion-aware chat pipeline over HTTP
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

#![deny(unsafe_code)]

//! # `MindMate` Server
//!
//! Backend for a mental-wellness companion app. Two cores sit behind one
//! axum router:
//!
//! - **Sleep analytics**: entries are read from an [`store::EntryStore`] and
//!   turned into scores, consistency, correlation, and insights by the pure
//!   functions in [`intelligence`].
//! - **Chat pipeline**: each message is classified as emotional or neutral,
//!   optionally enriched with knowledge base guidance, and answered by an
//!   OpenAI-compatible completion endpoint.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use mindmate_server::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("MindMate configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// Structured logging setup
pub mod logging;

/// LLM provider abstraction and prompt templates
pub mod llm;

/// Emotion-aware chat pipeline
pub mod chat;

/// Entry store contract and `SQLite` implementation
pub mod store;

/// Domain services between routes and the store
pub mod services;

/// HTTP middleware
pub mod middleware;

/// HTTP routes
pub mod routes;

/// Error types shared across the workspace
pub use mindmate_core::errors;

/// Application constants
pub use mindmate_core::constants;

/// Shared data models
pub use mindmate_core::models;

/// Sleep analytics engine
pub use mindmate_intelligence as intelligence;
