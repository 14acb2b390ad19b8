use serde::Deserialize;
use std::fmt;

/// Wrapper for secrets (JWT signing key, partner API key) that redacts the
/// value in Debug and Display output. Prevents leakage when a config struct
/// ends up in a log line via tracing::info!("{:?}", ...).
#[derive(Clone, Deserialize)]
pub struct Masked<T>(T);

impl<T> Masked<T> {
    pub fn new(value: T) -> Self {
        Masked(value)
    }

    /// Deliberately loud name: call sites that need the raw secret should
    /// be easy to grep for.
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<redacted>")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<redacted>")
    }
}
