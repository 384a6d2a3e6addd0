//! Authentication middleware that resolves the bearer token to an owner ID.

use axum::{
    RequestPartsExt,
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejectionReason,
};
use jsonwebtoken::DecodingKey;

use crate::{AppState, Error, auth::decode_token};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key used to verify bearer tokens.
    pub decoding_key: DecodingKey,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            decoding_key: state.decoding_key.clone(),
        }
    }
}

/// Middleware function that checks for a valid bearer token.
///
/// The owner ID is placed into the request extensions and the request executed
/// normally if the token is valid, otherwise a 401 JSON error is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(owner_id): Extension<OwnerId>` to receive the owner ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let bearer = match parts.extract::<TypedHeader<Authorization<Bearer>>>().await {
        Ok(TypedHeader(Authorization(bearer))) => bearer,
        Err(rejection) => {
            return match rejection.reason() {
                TypedHeaderRejectionReason::Missing => Error::MissingToken.into_response(),
                _ => Error::InvalidToken.into_response(),
            };
        }
    };

    let claims = match decode_token(bearer.token(), &state.decoding_key) {
        Ok(claims) => claims,
        Err(error) => return error.into_response(),
    };

    parts.extensions.insert(claims.sub);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}
