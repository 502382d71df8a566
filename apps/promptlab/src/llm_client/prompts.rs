// Shared prompt constants for completion calls.
// Strategy templates live in experiment::prompts alongside the code that builds them.

/// System role sent with every experiment call.
pub const INTERVIEWER_SYSTEM: &str = "You are an expert technical interviewer.";

/// Sampling temperature for every experiment call.
pub const TEMPERATURE: f32 = 0.7;

/// Response length cap (tokens) for every experiment call.
pub const MAX_TOKENS: u32 = 1000;
