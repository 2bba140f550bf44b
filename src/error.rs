//! Caller-facing errors
//!
//! Everything that goes wrong on the model path degrades to a fallback
//! ticket; the only hard failure a caller ever sees is missing credentials,
//! reported before any remote call is attempted.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no API key provided; pass one explicitly or set GROQ_API_KEY")]
    MissingApiKey,
}
