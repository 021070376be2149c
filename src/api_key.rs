use std::env;
use std::fmt::{self, Debug, Formatter};

use http::header::HeaderValue;

use crate::error::ApiKeyError;

/// The API key used to authenticate with the Places API.
///
/// The key is kept as a sensitive header value and is never printed by `Debug`.
#[derive(Clone)]
pub struct ApiKey {
    header: HeaderValue,
}

impl ApiKey {
    /// The environment variable read by [`ApiKey::from_env`].
    pub const ENV_VAR: &'static str = "GOOGLE_API_KEY";

    pub fn new(key: &str) -> Result<Self, ApiKeyError> {
        if key.is_empty() {
            return Err(ApiKeyError::Empty);
        }
        let mut header = HeaderValue::from_str(key).map_err(ApiKeyError::Invalid)?;
        header.set_sensitive(true);
        Ok(ApiKey { header })
    }

    /// Reads the key from the `GOOGLE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, ApiKeyError> {
        Self::from_env_var(Self::ENV_VAR)
    }

    pub fn from_env_var(var: &'static str) -> Result<Self, ApiKeyError> {
        let key = env::var(var).map_err(|e| ApiKeyError::Missing(var, e))?;
        Self::new(key.trim())
    }

    pub(crate) fn header(&self) -> &HeaderValue {
        &self.header
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&"<redacted>").finish()
    }
}
