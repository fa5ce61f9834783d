use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::{Claims, TokenError, validate_claims};

/// Capability that turns a presented credential into verified claims.
///
/// Implementations must fail closed: a token that cannot be cryptographically
/// attested yields an error, never partial claims. Callers treat every error
/// as "absent identity".
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError>;
}

/// HS256 verifier matching the backend's symmetric signing scheme.
pub struct Hs256Verifier {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256Verifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller-supplied clock in `verify`,
        // and tokens are allowed to omit `exp` entirely.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl TokenVerifier for Hs256Verifier {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header};

    const SECRET: &[u8] = b"unit-test-secret";

    fn mint(secret: &[u8], role: &str, exp: Option<i64>) -> String {
        let claims = Claims {
            sub: "user-7".to_string(),
            role: role.to_string(),
            email: Some("user7@example.com".to_string()),
            exp,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
            .expect("encode jwt")
    }

    #[test]
    fn valid_token_yields_claims() {
        let now = Utc::now();
        let token = mint(SECRET, "teacher", Some((now + Duration::minutes(5)).timestamp()));

        let claims = Hs256Verifier::new(SECRET).verify(&token, now).unwrap();
        assert_eq!(claims.sub, "user-7");
        assert_eq!(claims.role, "teacher");
        assert_eq!(claims.email.as_deref(), Some("user7@example.com"));
    }

    #[test]
    fn token_without_expiry_verifies() {
        let token = mint(SECRET, "admin", None);
        let claims = Hs256Verifier::new(SECRET).verify(&token, Utc::now()).unwrap();
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let now = Utc::now();
        let token = mint(b"someone-else", "admin", Some((now + Duration::minutes(5)).timestamp()));

        let err = Hs256Verifier::new(SECRET).verify(&token, now).unwrap_err();
        assert_eq!(err, TokenError::BadSignature);
    }

    #[test]
    fn garbage_is_malformed() {
        for token in ["", "abc", "a.b", "not.a.jwt"] {
            let err = Hs256Verifier::new(SECRET).verify(token, Utc::now()).unwrap_err();
            assert_eq!(err, TokenError::Malformed, "token {token:?}");
        }
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now();
        let token = mint(SECRET, "teacher", Some((now - Duration::minutes(1)).timestamp()));

        let err = Hs256Verifier::new(SECRET).verify(&token, now).unwrap_err();
        assert_eq!(err, TokenError::Expired);
    }
}
