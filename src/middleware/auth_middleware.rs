//! Middleware de autenticación
//!
//! Resuelve el usuario actual a partir del Bearer token y lo inyecta como
//! extensión del request. Los handlers reciben un `AuthUser` ya validado;
//! la autorización fina por rol se decide en los controllers.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::models::user::{AuthUser, UserRole};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{extract_token_from_header, verify_token, JwtConfig};

pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Falta el header Authorization".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &JwtConfig::from(&state.config))?;

    let id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Jwt("Subject del token inválido".to_string()))?;
    let role = UserRole::from_str(&claims.role)
        .ok_or_else(|| AppError::Jwt("Rol desconocido en el token".to_string()))?;

    request.extensions_mut().insert(AuthUser { id, role });

    Ok(next.run(request).await)
}
