use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use reel_types::api::Claims;

use crate::auth::AppState;
use crate::visibility::Viewer;

/// Extract and validate JWT from Authorization header.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let claims = bearer_claims(req.headers(), &state.jwt_secret)?.ok_or(StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(Viewer::User(claims.clone()));
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Like `require_auth`, but lets anonymous requests through as `Viewer::Anonymous`.
/// A token that is present but invalid is still rejected.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let viewer = match bearer_claims(req.headers(), &state.jwt_secret)? {
        Some(claims) => Viewer::User(claims),
        None => Viewer::Anonymous,
    };

    req.extensions_mut().insert(viewer);
    Ok(next.run(req).await)
}

/// Must run after `require_auth`.
pub async fn require_staff(req: Request, next: Next) -> Result<Response, StatusCode> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !claims.is_staff {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(next.run(req).await)
}

fn bearer_claims(headers: &HeaderMap, secret: &str) -> Result<Option<Claims>, StatusCode> {
    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let token = auth_header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;

    Ok(Some(token_data.claims))
}
