//! Bearer credential value object

use super::error::DomainError;

/// API key passed through to the completion provider as a bearer token.
///
/// Held in memory only; never serialized and redacted in `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a key from user input. Blank input is a missing credential.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::MissingCredential);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Pick the first non-blank candidate, in priority order.
    pub fn resolve<I, S>(candidates: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        candidates
            .into_iter()
            .flatten()
            .find_map(|c| Self::new(c).ok())
            .ok_or(DomainError::MissingCredential)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
