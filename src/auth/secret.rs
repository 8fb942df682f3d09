//! Process-lifetime signing secret
//!
//! The key is generated once at startup, kept only in memory and handed to
//! both the token issuer and the validator. Restarting the process therefore
//! invalidates every token issued before the restart.

use crate::error::AppError;
use rand::{rngs::OsRng, RngCore};
use secrecy::{ExposeSecret, Secret};

/// Length of the HMAC signing secret in bytes
pub const SIGNING_KEY_LEN: usize = 40;

/// Symmetric signing key for bearer tokens
pub struct SigningKey {
    bytes: Secret<Vec<u8>>,
}

impl SigningKey {
    /// Draw a fresh key from the operating system entropy source.
    ///
    /// Fails instead of falling back to a weaker generator.
    pub fn generate() -> Result<Self, AppError> {
        let mut bytes = vec![0u8; SIGNING_KEY_LEN];
        OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
            tracing::error!("Entropy source unavailable: {}", e);
            AppError::Internal(format!("Failed to generate signing key: {}", e))
        })?;

        tracing::info!(len = SIGNING_KEY_LEN, "Signing key generated");

        Ok(Self {
            bytes: Secret::new(bytes),
        })
    }

    /// Build a key from known material (tests, tooling)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AppError> {
        if bytes.len() != SIGNING_KEY_LEN {
            return Err(AppError::Config(format!(
                "Signing key must be exactly {} bytes, got {}",
                SIGNING_KEY_LEN,
                bytes.len()
            )));
        }

        Ok(Self {
            bytes: Secret::new(bytes.to_vec()),
        })
    }

    pub(crate) fn expose(&self) -> &[u8] {
        self.bytes.expose_secret()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey").field("bytes", &"[REDACTED]").finish()
    }
}
