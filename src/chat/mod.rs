// ABOUTME: Emotion-aware chat response pipeline
// ABOUTME: Emotion classification, knowledge retrieval, and reply composition over an LLM provider
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

/// Emotion classification
pub mod emotion;
/// Static knowledge base and retrieval
pub mod knowledge;
/// Message pipeline
pub mod pipeline;

pub use emotion::{Classification, EmotionClassifier, PromptedEmotionClassifier};
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use pipeline::{truncate_history, ChatOutcome, ChatPipeline, ComposedReply};
