// ABOUTME: Application constants for sleep analytics thresholds and chat pipeline limits
// ABOUTME: Single source of truth for scoring weights, insight thresholds, and prompt budgets
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

/// Service names used in structured logs
pub mod service_names {
    /// HTTP server binary
    pub const MINDMATE_SERVER: &str = "mindmate-server";
}

/// Sleep scoring weights, bands, and insight thresholds
pub mod sleep {
    /// Minutes in a calendar day
    pub const MINUTES_PER_DAY: u16 = 1440;

    /// Lower bound of the optimal duration band (hours)
    pub const OPTIMAL_MIN_HOURS: f64 = 7.0;
    /// Upper bound of the optimal duration band (hours)
    pub const OPTIMAL_MAX_HOURS: f64 = 9.0;
    /// Duration the linear decay is measured from (hours)
    pub const DURATION_TARGET_HOURS: f64 = 8.0;
    /// Points lost per hour outside the optimal band
    pub const DURATION_DECAY_PER_HOUR: f64 = 5.0;

    /// Maximum duration sub-score
    pub const DURATION_WEIGHT: f64 = 40.0;
    /// Maximum quality sub-score
    pub const QUALITY_WEIGHT: f64 = 35.0;
    /// Maximum wake-mood sub-score
    pub const MOOD_WEIGHT: f64 = 25.0;
    /// Mood sub-score for unrecognized labels
    pub const MOOD_DEFAULT_SCORE: f64 = 15.0;

    /// Lowest accepted quality rating
    pub const QUALITY_MIN: u8 = 1;
    /// Highest accepted quality rating
    pub const QUALITY_MAX: u8 = 10;

    /// Quality required for the "good" bucket
    pub const GOOD_QUALITY_MIN: u8 = 7;
    /// Quality required for the "okay" bucket
    pub const OKAY_QUALITY_MIN: u8 = 5;
    /// Duration band for the "okay" bucket (hours)
    pub const OKAY_MIN_HOURS: f64 = 6.0;
    /// Duration band for the "okay" bucket (hours)
    pub const OKAY_MAX_HOURS: f64 = 10.0;

    /// Bedtime standard deviation that maps to a consistency score of zero
    pub const CONSISTENCY_ZERO_STDDEV_MINUTES: f64 = 120.0;
    /// Consistency below this produces an irregular-schedule insight
    pub const IRREGULAR_SCHEDULE_THRESHOLD: u8 = 60;

    /// Average quality below this suggests a bedtime routine
    pub const LOW_QUALITY_THRESHOLD: f64 = 5.0;
    /// Average quality at or above this earns a positive remark
    pub const HIGH_QUALITY_THRESHOLD: f64 = 8.0;
    /// Weekend/weekday average duration gap that flags inconsistency (hours)
    pub const WEEKEND_GAP_HOURS: f64 = 1.0;

    /// Mean mood difference that separates positive/negative from neutral
    pub const CORRELATION_THRESHOLD: f64 = 0.5;
    /// Lowest accepted mood score
    pub const MOOD_SCORE_MIN: f64 = 1.0;
    /// Highest accepted mood score
    pub const MOOD_SCORE_MAX: f64 = 10.0;

    /// Maximum length of free-text notes on an entry
    pub const MAX_NOTES_CHARS: usize = 1000;
    /// Maximum length of the wake-mood label
    pub const MAX_MOOD_LABEL_CHARS: usize = 64;

    /// Default analytics window (days)
    pub const DEFAULT_PERIOD_DAYS: u32 = 7;
    /// Largest analytics window accepted (days)
    pub const MAX_PERIOD_DAYS: u32 = 365;
    /// Default number of entries for recent-entry listings
    pub const DEFAULT_RECENT_LIMIT: u32 = 10;
    /// Largest recent-entry listing accepted
    pub const MAX_RECENT_LIMIT: u32 = 100;
}

/// Chat pipeline prompt budgets and history limits
pub mod chat {
    /// Turns of history replayed into each completion prompt
    pub const HISTORY_WINDOW: usize = 6;
    /// Turns of history retained after each exchange
    pub const HISTORY_RETAINED: usize = 20;
    /// Knowledge base snippets injected into the emotional branch
    pub const KNOWLEDGE_TOP_K: usize = 2;
    /// Longest accepted user message
    pub const MAX_MESSAGE_CHARS: usize = 4000;

    /// Token budget for emotion classification
    pub const CLASSIFICATION_MAX_TOKENS: u32 = 10;
    /// Temperature for emotion classification
    pub const CLASSIFICATION_TEMPERATURE: f32 = 0.1;
    /// Token budget for the reply
    pub const RESPONSE_MAX_TOKENS: u32 = 300;
    /// Temperature for the reply
    pub const RESPONSE_TEMPERATURE: f32 = 0.7;

    /// Bounded timeout for each completion call (seconds)
    pub const COMPLETION_TIMEOUT_SECS: u64 = 30;

    /// Label the classifier looks for
    pub const EMOTIONAL_LABEL: &str = "EMOTIONAL";
    /// Reply returned to the user when the completion provider fails
    pub const FALLBACK_RESPONSE: &str =
        "I'm having trouble responding right now. Please try again in a moment.";
    /// Retrieval result when no knowledge base entry overlaps the query
    pub const NO_RELEVANT_GUIDANCE: &str = "No relevant KB guidance found.";
}

/// Process-level defaults
pub mod defaults {
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8081;
    /// Default entry store location
    pub const DATABASE_URL: &str = "sqlite:./data/mindmate.db";
    /// Default knowledge base file
    pub const KNOWLEDGE_BASE_PATH: &str = "./knowledge_base.json";
    /// Default OpenAI-compatible endpoint
    pub const LLM_BASE_URL: &str = "https://api.openai.com/v1";
    /// Default completion model
    pub const LLM_MODEL: &str = "gpt-4o";
    /// Whole-request timeout applied by the HTTP layer (seconds)
    pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 90;
}
