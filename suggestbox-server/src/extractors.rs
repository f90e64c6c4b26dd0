use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{self, request},
};
use suggestbox_api::{SessionToken, Uuid};

use crate::{sessions::Session, Error, Sessions};

/// Name of the cookie holding the browser's session token
pub const SESSION_COOKIE: &str = "suggestbox-session";

#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    pub sessions: Sessions,
}

/// Session token passed as a bearer token, not yet checked against the live sessions
pub struct PreAuth(pub SessionToken);

#[async_trait]
impl<S: Sync> FromRequestParts<S> for PreAuth {
    type Rejection = Error;

    async fn from_request_parts(req: &mut request::Parts, _state: &S) -> Result<PreAuth, Error> {
        req.headers
            .get(http::header::AUTHORIZATION)
            .and_then(|auth| auth.to_str().ok())
            .and_then(bearer_token)
            .map(|token| PreAuth(SessionToken(token)))
            .ok_or_else(Error::permission_denied)
    }
}

/// Parses `Bearer <uuid>`, with the scheme matched case-insensitively
fn bearer_token(auth: &str) -> Option<Uuid> {
    let (scheme, token) = auth.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.contains(' ') {
        return None;
    }
    Uuid::try_from(token).ok()
}

/// Live session of a JSON API client
pub struct ApiSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for ApiSession {
    type Rejection = Error;

    async fn from_request_parts(
        req: &mut request::Parts,
        state: &AppState,
    ) -> Result<ApiSession, Error> {
        let token = PreAuth::from_request_parts(req, state).await?.0;
        state
            .sessions
            .get(token)
            .await
            .map(ApiSession)
            .ok_or_else(Error::permission_denied)
    }
}

/// Session token found in the browser's cookies, if any
pub struct CookieSession(pub Option<SessionToken>);

#[async_trait]
impl<S: Sync> FromRequestParts<S> for CookieSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        req: &mut request::Parts,
        _state: &S,
    ) -> Result<CookieSession, Infallible> {
        let token = req
            .headers
            .get_all(http::header::COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .flat_map(|h| h.split(';'))
            .filter_map(|c| c.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| Uuid::try_from(value).ok())
            .map(SessionToken);
        Ok(CookieSession(token))
    }
}

pub fn session_cookie(token: SessionToken) -> String {
    format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", token.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_parsing() {
        let id = Uuid::new_v4();
        assert_eq!(bearer_token(&format!("Bearer {id}")), Some(id));
        assert_eq!(bearer_token(&format!("bearer {id}")), Some(id));
        assert_eq!(bearer_token(&format!("Basic {id}")), None);
        assert_eq!(bearer_token(&format!("Bearer  {id}")), None);
        assert_eq!(bearer_token(&format!("Bearer {id} extra")), None);
        assert_eq!(bearer_token("Bearer not-a-uuid"), None);
        assert_eq!(bearer_token("Bearer"), None);
    }
}
