//! Signing and verifying the JSON Web Tokens sent as bearer credentials.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::OwnerId};

/// How long a freshly issued token stays valid.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::days(30);

/// The contents of a JSON Web Token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The owner the token was issued to.
    pub sub: OwnerId,
    /// The time the token was issued, in seconds since the unix epoch.
    pub iat: i64,
    /// The expiry time of the token, in seconds since the unix epoch.
    pub exp: i64,
}

/// Create a signed token for `owner_id` that expires `duration` after `now`.
///
/// # Errors
///
/// Returns an [Error::TokenCreation] if the token could not be signed.
pub fn encode_token(
    owner_id: OwnerId,
    now: OffsetDateTime,
    duration: Duration,
    key: &EncodingKey,
) -> Result<String, Error> {
    let claims = Claims {
        sub: owner_id,
        iat: now.unix_timestamp(),
        exp: (now + duration).unix_timestamp(),
    };

    encode(&Header::default(), &claims, key).map_err(|error| Error::TokenCreation(error.to_string()))
}

/// Verify the signature and expiry of `token` and return its claims.
///
/// # Errors
///
/// Returns an [Error::InvalidToken] if the token is malformed, was signed with
/// another key, or has expired.
pub fn decode_token(token: &str, key: &DecodingKey) -> Result<Claims, Error> {
    decode::<Claims>(token, key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|error| {
            tracing::debug!("rejected bearer token: {error}");
            Error::InvalidToken
        })
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{DecodingKey, EncodingKey};
    use time::{Duration, OffsetDateTime};

    use crate::{Error, auth::OwnerId};

    use super::{decode_token, encode_token};

    const SECRET: &[u8] = b"correct horse battery staple";

    #[test]
    fn round_trips_owner_id() {
        let token = encode_token(
            OwnerId::new(7),
            OffsetDateTime::now_utc(),
            Duration::minutes(5),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let claims = decode_token(&token, &DecodingKey::from_secret(SECRET)).unwrap();

        assert_eq!(claims.sub, OwnerId::new(7));
    }

    #[test]
    fn rejects_token_signed_with_another_key() {
        let token = encode_token(
            OwnerId::new(7),
            OffsetDateTime::now_utc(),
            Duration::minutes(5),
            &EncodingKey::from_secret(b"another secret"),
        )
        .unwrap();

        let result = decode_token(&token, &DecodingKey::from_secret(SECRET));

        assert_eq!(result, Err(Error::InvalidToken));
    }

    #[test]
    fn rejects_expired_token() {
        let issued = OffsetDateTime::now_utc() - Duration::days(2);
        let token = encode_token(
            OwnerId::new(7),
            issued,
            Duration::days(1),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let result = decode_token(&token, &DecodingKey::from_secret(SECRET));

        assert_eq!(result, Err(Error::InvalidToken));
    }
}
