use crate::{auth::verify_jwt, error::AppError, state::AppState};
use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Resolves the caller's identity from either a bearer session JWT or a
/// single-use `auth_token` query parameter carried by notification deep
/// links. The login token burns on first use.
pub async fn authenticate_request(
    state: &AppState,
    headers: &HeaderMap,
    raw_query: Option<&str>,
) -> Result<Uuid, AppError> {
    if let Some(auth_header) = headers.get("Authorization").and_then(|h| h.to_str().ok()) {
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        let claims = verify_jwt(token, &state.config.jwt_secret)?;

        return Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token".to_string()));
    }

    if let Some(token) = query_param(raw_query, "auth_token") {
        if let Some(user_id) = state.login_token_repository.consume(&token).await? {
            return Ok(user_id);
        }
        return Err(AppError::Unauthorized(
            "Login token is invalid or already used".to_string(),
        ));
    }

    Err(AppError::Unauthorized("Invalid credentials".to_string()))
}

fn query_param(raw_query: Option<&str>, name: &str) -> Option<String> {
    raw_query?.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == name && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let raw_query = req.uri().query().map(str::to_owned);
    let user_id = authenticate_request(&state, req.headers(), raw_query.as_deref()).await?;

    req.extensions_mut().insert(user_id);

    Ok(next.run(req).await)
}

// Extractor for getting user_id from request extensions
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Uuid>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_extraction() {
        assert_eq!(
            query_param(Some("auth_token=abc123&x=1"), "auth_token"),
            Some("abc123".to_string())
        );
        assert_eq!(query_param(Some("x=1&auth_token=zzz"), "auth_token"), Some("zzz".to_string()));
        assert_eq!(query_param(Some("auth_token="), "auth_token"), None);
        assert_eq!(query_param(Some("other=1"), "auth_token"), None);
        assert_eq!(query_param(None, "auth_token"), None);
    }
}
