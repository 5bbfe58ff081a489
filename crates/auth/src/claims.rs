use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token lifetime in hours.
pub const TOKEN_TTL_HOURS: i64 = 12;

/// JWT claims model (transport-agnostic).
///
/// This is the full authorization snapshot embedded at login time: who the
/// caller is, which department they belong to, and which permissions they
/// held when the token was issued. `iat`/`exp` are unix timestamps so the
/// standard registered-claim validation applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the authenticated account.
    pub username: String,

    /// Name of the account's department.
    pub department: String,

    /// Names of the permissions granted to the account.
    pub permissions: Vec<String>,

    /// Administrator flag.
    pub is_admin: bool,

    /// Issued-at (unix seconds).
    pub iat: i64,

    /// Expiration (unix seconds).
    pub exp: i64,
}

impl Claims {
    /// Build claims for a freshly authenticated account, valid for
    /// [`TOKEN_TTL_HOURS`] from `now`.
    pub fn issue(
        username: impl Into<String>,
        department: impl Into<String>,
        permissions: Vec<String>,
        is_admin: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            username: username.into(),
            department: department.into(),
            permissions,
            is_admin,
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        }
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate claim timestamps.
///
/// Note: this validates the *claims* only. Signature verification and the
/// algorithm gate live in [`crate::token`].
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(now: DateTime<Utc>) -> Claims {
        Claims::issue("alice", "IT", vec!["user.read".into()], false, now)
    }

    #[test]
    fn fresh_claims_validate() {
        let now = Utc::now();
        let claims = sample(now);
        assert_eq!(validate_claims(&claims, now), Ok(()));
    }

    #[test]
    fn claims_accepted_until_ttl_elapses() {
        let now = Utc::now();
        let claims = sample(now);

        let just_before = now + Duration::hours(TOKEN_TTL_HOURS) - Duration::seconds(1);
        assert_eq!(validate_claims(&claims, just_before), Ok(()));

        let at_expiry = now + Duration::hours(TOKEN_TTL_HOURS);
        assert_eq!(
            validate_claims(&claims, at_expiry),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn future_iat_is_rejected() {
        let now = Utc::now();
        let claims = sample(now + Duration::minutes(5));
        assert_eq!(
            validate_claims(&claims, now),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn inverted_window_is_rejected() {
        let now = Utc::now();
        let mut claims = sample(now);
        claims.exp = claims.iat;
        assert_eq!(
            validate_claims(&claims, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }
}
