use std::str::FromStr;

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use chrono::Utc;
use suggestbox_api::{Board, NewComment, NewSuggestion, SuggestionId, Uuid};

use crate::{
    extractors::*,
    sessions::Session,
    ui::{self, Notice},
    Error, Sessions,
};

#[derive(Debug, serde::Deserialize)]
pub struct SuggestionForm {
    /// Board name, the public board if left out
    #[serde(default)]
    board: String,
    /// Present, usually as "on", iff the checkbox was ticked
    anonymous: Option<String>,
    #[serde(default)]
    author: String,
    #[serde(default)]
    body: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct CommentForm {
    anonymous: Option<String>,
    #[serde(default)]
    author: String,
    #[serde(default)]
    body: String,
}

pub async fn index(
    State(sessions): State<Sessions>,
    CookieSession(token): CookieSession,
) -> Result<Response, Error> {
    let session = sessions.resume_or_create(token).await;
    render(&session, StatusCode::OK, Notice::Nothing).await
}

pub async fn submit(
    State(sessions): State<Sessions>,
    CookieSession(token): CookieSession,
    Form(form): Form<SuggestionForm>,
) -> Result<Response, Error> {
    let session = sessions.resume_or_create(token).await;
    let board = match form.board.as_str() {
        "" => Board::default(),
        name => match Board::from_str(name) {
            Ok(board) => board,
            Err(err) => {
                tracing::info!("rejecting suggestion: {err}");
                let notice = Notice::SubmitFailed(err.to_string());
                return render(&session, StatusCode::BAD_REQUEST, notice).await;
            }
        },
    };
    let s = NewSuggestion {
        board,
        anonymous: form.anonymous.is_some(),
        author: form.author,
        body: form.body,
    };
    let res = session
        .store
        .lock()
        .await
        .submit_suggestion(s, Utc::now());
    match res {
        Ok(_) => render(&session, StatusCode::OK, Notice::Submitted(board)).await,
        Err(err) => {
            tracing::info!("rejecting suggestion: {err}");
            render(&session, err.status_code(), Notice::SubmitFailed(err.to_string())).await
        }
    }
}

pub async fn comment(
    State(sessions): State<Sessions>,
    CookieSession(token): CookieSession,
    Path(suggestion): Path<Uuid>,
    Form(form): Form<CommentForm>,
) -> Result<Response, Error> {
    let session = sessions.resume_or_create(token).await;
    let suggestion = SuggestionId(suggestion);
    let c = NewComment {
        suggestion,
        anonymous: form.anonymous.is_some(),
        author: form.author,
        body: form.body,
    };
    let res = session.store.lock().await.submit_comment(c);
    match res {
        Ok(()) => render(&session, StatusCode::OK, Notice::Commented(suggestion)).await,
        Err(err) => {
            tracing::info!("rejecting comment: {err}");
            let notice = Notice::CommentFailed(suggestion, err.to_string());
            render(&session, err.status_code(), notice).await
        }
    }
}

/// Renders the page from the current state of the session's store
async fn render(session: &Session, status: StatusCode, notice: Notice) -> Result<Response, Error> {
    let public = session.store.lock().await.board(Board::Public);
    let page = ui::render_page(public, notice).await;
    let cookie = HeaderValue::from_str(&session_cookie(session.token))
        .context("building session cookie header")?;
    Ok((status, [(header::SET_COOKIE, cookie)], Html(page)).into_response())
}
