//! JWT token generation and validation
//! Single shared-secret bearer tokens (HS256), no refresh tokens

use crate::{auth::secret::SigningKey, error::AppError};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Tolerance added to `exp` (and subtracted from `nbf`) for clock drift
pub const CLOCK_SKEW_SECS: i64 = 5 * 60;

/// JWT claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Issued at
    pub iat: i64,

    /// Not before
    pub nbf: i64,

    /// Expiration
    pub exp: i64,
}

/// Token response returned by login and registration
#[derive(Debug, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64, // seconds until the nominal expiry
}

/// Signs access tokens with the process signing key
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    validity_secs: u64,
}

impl TokenIssuer {
    pub fn new(key: &SigningKey, validity_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(key.expose()),
            validity_secs,
        }
    }

    pub fn validity_secs(&self) -> u64 {
        self.validity_secs
    }

    /// Issue a token for an already authenticated subject
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, AppError> {
        self.issue_at(subject, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (Unix seconds)
    pub fn issue_at(&self, subject: &str, now: i64) -> Result<IssuedToken, AppError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            nbf: now,
            exp: now + self.validity_secs as i64,
        };

        let access_token =
            encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
                tracing::error!("Failed to encode access token: {:?}", e);
                AppError::Internal(format!("Failed to encode access token: {}", e))
            })?;

        Ok(IssuedToken {
            access_token,
            token_type: "Bearer",
            expires_in: self.validity_secs,
        })
    }
}

/// Validation rules applied to every presented token.
///
/// Audience and issuer are not checked: any token signed with the process
/// key is accepted as long as it is within its lifetime.
// TODO: add `aud`/`iss` claims and validate them once a security review settles the values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub clock_skew_secs: i64,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            clock_skew_secs: CLOCK_SKEW_SECS,
        }
    }
}

/// Verifies signature and lifetime of bearer tokens
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
    policy: ValidationPolicy,
}

impl TokenValidator {
    pub fn new(key: &SigningKey) -> Self {
        Self::with_policy(key, ValidationPolicy::default())
    }

    pub fn with_policy(key: &SigningKey, policy: ValidationPolicy) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        // Lifetime is checked in `validate_at` so the clock can be supplied
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(key.expose()),
            validation,
            policy,
        }
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Validate and decode token against the current time
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        self.validate_at(token, Utc::now().timestamp())
    }

    /// Validate and decode token against `now` (Unix seconds).
    ///
    /// Accepts iff the signature matches and `now <= exp + skew`; the
    /// boundary is inclusive.
    pub fn validate_at(&self, token: &str, now: i64) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e);
                AppError::Unauthorized
            })?
            .claims;

        let skew = self.policy.clock_skew_secs;

        if now > claims.exp.saturating_add(skew) {
            tracing::debug!(exp = claims.exp, now, "Token expired");
            return Err(AppError::Unauthorized);
        }

        if claims.nbf.saturating_sub(skew) > now {
            tracing::debug!(nbf = claims.nbf, now, "Token not yet valid");
            return Err(AppError::Unauthorized);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::secret::SIGNING_KEY_LEN;

    fn key(byte: u8) -> SigningKey {
        SigningKey::from_bytes(&[byte; SIGNING_KEY_LEN]).unwrap()
    }

    #[test]
    fn test_issue_and_validate() {
        let key = key(1);
        let issuer = TokenIssuer::new(&key, 600);
        let validator = TokenValidator::new(&key);

        let token = issuer.issue("testuser").unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 600);

        let claims = validator.validate(&token.access_token).unwrap();
        assert_eq!(claims.sub, "testuser");
        assert_eq!(claims.exp - claims.iat, 600);
        assert_eq!(claims.nbf, claims.iat);
    }

    #[test]
    fn test_default_policy_has_five_minute_skew() {
        let validator = TokenValidator::new(&key(1));
        assert_eq!(validator.policy().clock_skew_secs, 300);
    }

    #[test]
    fn test_tampered_payload_fails() {
        let key = key(2);
        let issuer = TokenIssuer::new(&key, 600);
        let validator = TokenValidator::new(&key);

        let token = issuer.issue("alice").unwrap().access_token;
        let other = issuer.issue("mallory").unwrap().access_token;

        // Splice mallory's payload onto alice's signature
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(validator.validate(&forged).is_err());
    }

    #[test]
    fn test_not_yet_valid_beyond_skew_fails() {
        let key = key(3);
        let issuer = TokenIssuer::new(&key, 600);
        let validator = TokenValidator::new(&key);
        let now = 1_700_000_000;

        let token = issuer.issue_at("alice", now + 301).unwrap().access_token;
        assert!(validator.validate_at(&token, now).is_err());

        let token = issuer.issue_at("alice", now + 299).unwrap().access_token;
        assert!(validator.validate_at(&token, now).is_ok());
    }

    #[test]
    fn test_invalid_token_fails() {
        let validator = TokenValidator::new(&key(4));
        assert!(validator.validate("invalid_token").is_err());
        assert!(validator.validate("").is_err());
        assert!(validator.validate("a.b.c").is_err());
    }
}
