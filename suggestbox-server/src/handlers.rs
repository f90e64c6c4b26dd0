use axum::{extract::State, Json};
use chrono::Utc;
use suggestbox_api::{Board, NewComment, NewSuggestion, SessionToken, Suggestion, SuggestionId};

use crate::{extractors::*, Error, Sessions};

pub async fn new_session(State(sessions): State<Sessions>) -> Json<SessionToken> {
    Json(sessions.create().await.token)
}

pub async fn end_session(
    PreAuth(token): PreAuth,
    State(sessions): State<Sessions>,
) -> Result<(), Error> {
    sessions.end(token).await
}

pub async fn submit_suggestion(
    ApiSession(session): ApiSession,
    Json(s): Json<NewSuggestion>,
) -> Result<Json<SuggestionId>, Error> {
    Ok(Json(
        session.store.lock().await.submit_suggestion(s, Utc::now())?,
    ))
}

pub async fn submit_comment(
    ApiSession(session): ApiSession,
    Json(c): Json<NewComment>,
) -> Result<(), Error> {
    Ok(session.store.lock().await.submit_comment(c)?)
}

pub async fn fetch_public(ApiSession(session): ApiSession) -> Json<Vec<Suggestion>> {
    Json(session.store.lock().await.board(Board::Public))
}

pub async fn fetch_private(ApiSession(session): ApiSession) -> Json<Vec<Suggestion>> {
    Json(session.store.lock().await.board(Board::Private))
}
