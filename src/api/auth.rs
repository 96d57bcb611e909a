use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation::{validate_password_len, validate_username};
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::schemas::auth::{LoginRequest, RedirectHint, RegisterRequest, TokenResponse};
use crate::schemas::user::UserResponse;
use crate::store::NewUser;

const BAD_CREDENTIALS: &str = "Incorrect username or password";

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/admin/login", post(admin_login))
        .route("/me", get(me))
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let username = payload.username.trim();
    validate_username(username)?;
    validate_password_len(&payload.password)?;
    if payload.password != payload.confirm_password {
        return Err(ApiError::BadRequest("Passwords do not match".to_string()));
    }

    let hashed_password = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let created = state
        .store()
        .create_user(NewUser {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            hashed_password,
            role: UserRole::Standard,
            is_active: true,
            created_at: primitive_now_utc(),
        })
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create user"))?;

    let Some(user) = created else {
        return Err(ApiError::BadRequest("Username is already taken".to_string()));
    };

    tracing::info!(user_id = %user.id, username = %user.username, "Registered user");

    Ok((StatusCode::CREATED, Json(token_response(&state, user)?)))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = authenticate(&state, &payload).await?;
    Ok(Json(token_response(&state, user)?))
}

async fn admin_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = authenticate(&state, &payload).await?;
    if !user.is_elevated() {
        return Err(ApiError::Forbidden(
            "Access restricted to admins and superusers only".to_string(),
        ));
    }
    Ok(Json(token_response(&state, user)?))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from_db(user))
}

async fn authenticate(state: &AppState, payload: &LoginRequest) -> Result<User, ApiError> {
    let user = state
        .store()
        .find_user_by_username(payload.username.trim())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or(ApiError::Unauthorized(BAD_CREDENTIALS))?;

    let verified = security::verify_password(&payload.password, &user.hashed_password)
        .map_err(|_| ApiError::Unauthorized(BAD_CREDENTIALS))?;

    if !verified {
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS));
    }

    if !user.is_active {
        return Err(ApiError::BadRequest("Inactive user".to_string()));
    }

    Ok(user)
}

fn token_response(state: &AppState, user: User) -> Result<TokenResponse, ApiError> {
    let token = security::create_access_token(&user.id, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    let redirect =
        if user.is_elevated() { RedirectHint::AdminDashboard } else { RedirectHint::Index };

    Ok(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        redirect,
        user: UserResponse::from_db(user),
    })
}
