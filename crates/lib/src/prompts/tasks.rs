//! # Default Task Prompts
//!
//! Hardcoded prompt templates for the restaurant naming task. The server can
//! override both through `config.yml`.

// --- Restaurant Name Inference ---
pub const RESTAURANT_NAME_SYSTEM_PROMPT: &str = r#"You are a helpful assistant that identifies restaurant names from Instagram posts. Respond with only the restaurant name and nothing else. If no restaurant can be identified, respond with exactly "Unknown"."#;

pub const RESTAURANT_NAME_USER_PROMPT: &str = r#"Based on the following Instagram post information, what is the name of the restaurant being featured?

Caption: {caption}
Tagged accounts: {tagged_users}
Location: {location}

Return only the restaurant name, or "Unknown" if it cannot be determined."#;
