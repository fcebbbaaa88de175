//! AI health commentary for HeartAlert.
//!
//! [`HealthAdvisor`] is the port the rest of the workspace depends on;
//! [`ChatCompletionsClient`] implements it against any OpenAI-compatible
//! chat-completions endpoint (Together by default).

pub mod advisor;
pub mod client;
pub mod config;
pub mod error;

pub use advisor::{
    CHAT_SYSTEM_PROMPT, HealthAdvisor, TIPS_SYSTEM_PROMPT, TipsRequest, chat_messages,
    strip_emphasis,
};
pub use client::{ChatCompletionsClient, parse_reply};
pub use config::AdvisorConfig;
pub use error::{AdvisorError, Result};
