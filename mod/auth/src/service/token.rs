use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use domus_core::now_unix;

use crate::model::{AccessClaims, UserRecord};
use crate::service::{AuthConfig, AuthError};

/// Encodes and verifies access tokens (HS256, symmetric secret).
///
/// Verification enforces signature, expiry, audience and issuer on every
/// call. The gateway relies on this for each proxied request, so a stale
/// or foreign token is rejected here and nowhere else.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    audience: String,
    issuer: String,
    access_ttl_secs: i64,
}

impl TokenCodec {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&config.audience]);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);

        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            audience: config.audience.clone(),
            issuer: config.issuer.clone(),
            access_ttl_secs: config.access_ttl_secs,
        }
    }

    /// Mint an access token for a user. Pure: no store access.
    pub fn encode(&self, user: &UserRecord) -> Result<String, AuthError> {
        let now = now_unix();
        let claims = AccessClaims {
            id: user.id,
            name: user.full_name(),
            role: user.role,
            aud: self.audience.clone(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.access_ttl_secs,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("token encode: {e}")))
    }

    /// Verify a token and return its claims.
    ///
    /// A payload that fails to deserialize after the signature checks out
    /// is the separate `FailedParsingTokenClaims` case; every other
    /// failure (structure, signature, expiry, audience, issuer) is
    /// `FailedParsingToken`.
    pub fn decode(&self, token: &str) -> Result<AccessClaims, AuthError> {
        decode::<AccessClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::Json(_) => AuthError::FailedParsingTokenClaims,
                _ => AuthError::FailedParsingToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_codec() -> TokenCodec {
        TokenCodec::new(&AuthConfig::default())
    }

    fn make_user(id: i64, role: i64) -> UserRecord {
        UserRecord {
            id,
            first_name: "Taras".to_string(),
            last_name: "Kovalenko".to_string(),
            role,
            active: true,
        }
    }

    #[test]
    fn round_trip_claims() {
        let codec = test_codec();
        let token = codec.encode(&make_user(10, 2)).unwrap();

        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.id, 10);
        assert_eq!(claims.role, 2);
        assert_eq!(claims.name, "Taras Kovalenko");
        assert_eq!(claims.aud, "domus");
        assert_eq!(claims.iss, "domusd");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_wrong_secret() {
        let codec = test_codec();
        let other = TokenCodec::new(&AuthConfig {
            jwt_secret: "another-secret".to_string(),
            ..AuthConfig::default()
        });

        let token = other.encode(&make_user(1, 0)).unwrap();
        let err = codec.decode(&token).unwrap_err();
        assert!(matches!(err, AuthError::FailedParsingToken));
    }

    #[test]
    fn rejects_spliced_token() {
        let codec = test_codec();
        let a = codec.encode(&make_user(1, 0)).unwrap();
        let b = codec.encode(&make_user(2, 9)).unwrap();

        // Payload of b with the signature of a.
        let sig_a = a.rsplit('.').next().unwrap();
        let mut parts: Vec<&str> = b.split('.').collect();
        parts[2] = sig_a;
        let spliced = parts.join(".");

        let err = codec.decode(&spliced).unwrap_err();
        assert!(matches!(err, AuthError::FailedParsingToken));
    }

    #[test]
    fn rejects_garbage() {
        let codec = test_codec();
        assert!(matches!(
            codec.decode("not-a-token").unwrap_err(),
            AuthError::FailedParsingToken
        ));
        assert!(matches!(
            codec.decode("").unwrap_err(),
            AuthError::FailedParsingToken
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let config = AuthConfig::default();
        let codec = TokenCodec::new(&config);

        // Hand-roll claims well past the default leeway.
        let now = now_unix();
        let claims = AccessClaims {
            id: 7,
            name: "Taras Kovalenko".to_string(),
            role: 1,
            aud: config.audience.clone(),
            iss: config.issuer.clone(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        let err = codec.decode(&token).unwrap_err();
        assert!(matches!(err, AuthError::FailedParsingToken));
    }

    #[test]
    fn rejects_foreign_audience_and_issuer() {
        let config = AuthConfig::default();
        let codec = TokenCodec::new(&config);
        let now = now_unix();

        for (aud, iss) in [
            ("evil".to_string(), config.issuer.clone()),
            (config.audience.clone(), "evil".to_string()),
        ] {
            let claims = AccessClaims {
                id: 7,
                name: "x".to_string(),
                role: 0,
                aud,
                iss,
                iat: now,
                exp: now + 600,
            };
            let token = encode(
                &Header::default(),
                &claims,
                &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            )
            .unwrap();
            assert!(matches!(
                codec.decode(&token).unwrap_err(),
                AuthError::FailedParsingToken
            ));
        }
    }

    #[test]
    fn claims_shape_mismatch_is_its_own_error() {
        let config = AuthConfig::default();
        let codec = TokenCodec::new(&config);
        let now = now_unix();

        // Signed with our secret, passes exp/aud/iss, but `id` is a string.
        let payload = serde_json::json!({
            "id": "seven",
            "name": "x",
            "role": 0,
            "aud": config.audience,
            "iss": config.issuer,
            "iat": now,
            "exp": now + 600,
        });
        let token = encode(
            &Header::default(),
            &payload,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        let err = codec.decode(&token).unwrap_err();
        assert!(matches!(err, AuthError::FailedParsingTokenClaims));
    }
}
