use actix_web::{dev::Payload, error, http::StatusCode, FromRequest, HttpRequest, HttpResponse};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};

/// Secrets the API authenticates against.
///
/// Dashboard traffic carries a Supabase-issued HS256 bearer token; the Zapier
/// ingest webhook authenticates with a shared secret header instead.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub webhook_secret: String,
}

/// Claims of a Supabase-style access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// JSON 401 response for failed authentication
#[derive(Debug, Serialize)]
pub struct AuthError {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl error::ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Unauthorized().json(self)
    }
}

fn unauthorized(message: &str) -> actix_web::Error {
    AuthError {
        error: "unauthorized".to_string(),
        message: message.to_string(),
        status_code: 401,
    }
    .into()
}

/// Authenticated caller, extracted from the Authorization header.
///
/// Handlers take `AuthUser` as an argument to require a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

fn extract_user(req: &HttpRequest) -> Result<AuthUser, actix_web::Error> {
    let config = req
        .app_data::<actix_web::web::Data<AuthConfig>>()
        .ok_or_else(|| unauthorized("auth not configured"))?;

    let header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("missing Authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("expected a bearer token"))?;

    let claims = verify_token(token, &config.jwt_secret)
        .map_err(|e| {
            tracing::debug!("Token validation failed: {}", e);
            unauthorized("invalid or expired token")
        })?;

    Ok(AuthUser(claims))
}

/// Validate an HS256 token against the configured secret.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Check the shared-secret header on the ingest webhook.
pub fn verify_webhook_secret(req: &HttpRequest, config: &AuthConfig) -> bool {
    req.headers()
        .get("X-Webhook-Secret")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == config.webhook_secret)
        .unwrap_or(false)
}
