//! Upload pipeline: validate → watermark → name → authenticate → store with retry.

pub mod pipeline;
pub mod progress;
pub mod retry;
