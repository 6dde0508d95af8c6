//! Boundary error types.
//!
//! The element protocol itself never fails: unhandled events are reported
//! through `bool` / `Option` returns. These errors only cover the edges where
//! the toolkit talks to the outside world (theme files, drop payloads) and
//! the arena handles applications hold on to.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid theme: {0}")]
    Theme(#[from] serde_json::Error),

    #[error("stale element handle (slot {index}, generation {generation})")]
    StaleHandle { index: u32, generation: u32 },

    #[error("payload has no entry for {0}")]
    UnknownMime(String),
}

pub type Result<T> = std::result::Result<T, Error>;
