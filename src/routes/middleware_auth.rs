use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use uuid::Uuid;

use crate::routes::auth::AuthError;
use crate::state::AppState;

/// The authenticated user for this request, or none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session(pub Option<Uuid>);

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Session>().copied().unwrap_or_default())
    }
}

/// Like [`Session`] but rejects anonymous requests.
pub struct JwtUser(pub Uuid);

impl<S> FromRequestParts<S> for JwtUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .and_then(|s| s.0)
            .map(JwtUser)
            .ok_or((StatusCode::UNAUTHORIZED, "missing user"))
    }
}

/// Resolves the bearer token, if any, into a [`Session`].
///
/// No `Authorization` header means an anonymous session; a header that
/// does not carry a valid token is rejected.
pub async fn resolve_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req.headers().get(AUTHORIZATION).map(|v| v.to_str());

    let session = match auth_header {
        None => Session(None),
        Some(Ok(h)) if h.starts_with("Bearer ") => Session(Some(state.jwt.verify(&h[7..])?)),
        Some(_) => return Err(AuthError::InvalidToken),
    };

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
