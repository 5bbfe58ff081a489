//! Signed-token codec.
//!
//! Tokens are issued as HS256; verification accepts the HMAC family only, so
//! a token whose header names any non-HMAC algorithm is rejected regardless
//! of its signature.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::Claims;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Sign(jsonwebtoken::errors::Error),

    #[error("token rejected: {0}")]
    Verify(jsonwebtoken::errors::Error),
}

/// Verification side of the codec, object-safe so the middleware can hold it
/// behind `Arc<dyn TokenVerifier>`.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Claims, TokenError>;
}

/// HMAC-SHA256 token codec built from the configured signing key.
///
/// The key is an explicit constructor argument; nothing here reads process
/// environment or global state.
pub struct Hs256TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // HMAC family only; expiry is strict (no leeway).
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign claims into a compact JWT.
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(TokenError::Sign)
    }
}

impl TokenVerifier for Hs256TokenCodec {
    fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data =
            decode::<Claims>(token, &self.decoding, &self.validation).map_err(TokenError::Verify)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::{Duration, Utc};

    const SECRET: &[u8] = b"test-signing-key";

    fn codec() -> Hs256TokenCodec {
        Hs256TokenCodec::new(SECRET)
    }

    fn fresh_claims() -> Claims {
        Claims::issue(
            "alice",
            "IT",
            vec!["user.read".into(), "user.write".into()],
            true,
            Utc::now(),
        )
    }

    #[test]
    fn sign_then_verify_round_trips() {
        let codec = codec();
        let claims = fresh_claims();

        let token = codec.sign(&claims).unwrap();
        let verified = codec.verify(&token).unwrap();
        assert_eq!(verified, claims);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = codec().sign(&fresh_claims()).unwrap();
        let other = Hs256TokenCodec::new(b"another-key");
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(codec().verify("not.a.token").is_err());
    }

    #[test]
    fn expired_token_is_rejected_without_leeway() {
        let codec = codec();
        let expired = Claims::issue(
            "alice",
            "IT",
            vec![],
            false,
            Utc::now() - Duration::hours(crate::claims::TOKEN_TTL_HOURS) - Duration::seconds(5),
        );

        let token = codec.sign(&expired).unwrap();
        assert!(codec.verify(&token).is_err());
    }

    #[test]
    fn other_hmac_variants_are_accepted() {
        let claims = fresh_claims();
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(codec().verify(&token).unwrap(), claims);
    }

    #[test]
    fn non_hmac_algorithm_is_rejected() {
        // Splice an RS256 header onto an otherwise well-formed token. The
        // algorithm gate must refuse it before any signature check matters.
        let token = codec().sign(&fresh_claims()).unwrap();
        let (_, rest) = token.split_once('.').unwrap();
        let forged_header = URL_SAFE_NO_PAD.encode(br#"{"typ":"JWT","alg":"RS256"}"#);
        let forged = format!("{forged_header}.{rest}");

        assert!(codec().verify(&forged).is_err());
    }
}
