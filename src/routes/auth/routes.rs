use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::{
    hash_password, verify_password, AuthError, LoginRequest, LoginResponse, RegisterResponse,
    RegistrationRequest, MIN_PASSWORD_LEN,
};
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegistrationRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::InvalidPayload);
    }

    let password_hash = hash_password(&payload.password)?;
    let user = state.users.insert(&email, &password_hash).await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            email: user.email,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let email = payload.email.trim().to_lowercase();
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    let token = state.jwt.issue(user.id)?;
    Ok((StatusCode::OK, Json(LoginResponse { token })))
}
