#![cfg(test)]

use std::{fmt::Debug, panic::AssertUnwindSafe, time::Duration as StdDuration};

use axum::{
    extract::FromRequestParts,
    http::{self, request},
};
use chrono::{Duration, TimeZone, Utc};
use suggestbox_api::{
    Board, Error as ApiError, NewComment, NewSuggestion, SessionToken, Suggestion, SuggestionId,
    Uuid, ANONYMOUS,
};
use tower::ServiceExt;

use crate::{db::Store, extractors::*, *};

const SESSION_TTL: StdDuration = StdDuration::from_secs(3600);

fn test_sessions() -> Sessions {
    Sessions::new(SESSION_TTL)
}

macro_rules! do_tokio_test {
    ( $name:ident, $typ:ty, $fn:expr ) => {
        #[test]
        fn $name() {
            let runtime = AssertUnwindSafe(
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .expect("failed initializing tokio runtime"),
            );
            bolero::check!()
                .with_type::<$typ>()
                .cloned()
                .for_each(move |v| {
                    let () = runtime.block_on($fn(v));
                })
        }
    };
}

do_tokio_test!(fuzz_preauth_extractor, String, |token| async move {
    if let Ok(req) = http::Request::builder()
        .method(http::Method::GET)
        .uri("/")
        .header(http::header::AUTHORIZATION, token)
        .body(())
    {
        let mut req = req.into_parts().0;
        let res = PreAuth::from_request_parts(&mut req, &()).await;
        match res {
            Ok(_) => (),
            Err(Error::Api(ApiError::PermissionDenied)) => (),
            Err(e) => panic!("got unexpected error: {e}"),
        }
    }
});

do_tokio_test!(fuzz_cookie_extractor, String, |cookie| async move {
    if let Ok(req) = http::Request::builder()
        .method(http::Method::GET)
        .uri("/")
        .header(http::header::COOKIE, cookie)
        .body(())
    {
        let mut req = req.into_parts().0;
        let res = CookieSession::from_request_parts(&mut req, &()).await;
        assert!(res.is_ok());
    }
});

#[test]
fn fuzz_submission_validation() {
    bolero::check!()
        .with_type::<(bool, bool, String, String)>()
        .cloned()
        .for_each(|(public, anonymous, author, body)| {
            let board = match public {
                true => Board::Public,
                false => Board::Private,
            };
            let mut db = Store::new();
            let res = db.submit_suggestion(
                NewSuggestion {
                    board,
                    anonymous,
                    author: author.clone(),
                    body: body.clone(),
                },
                Utc::now(),
            );
            if body.contains('\0') {
                assert_eq!(res, Err(ApiError::NullByteInString(body)));
            } else if body.trim().is_empty() {
                assert_eq!(res, Err(ApiError::EmptyBody));
            } else if author.contains('\0') {
                assert_eq!(res, Err(ApiError::NullByteInString(author)));
            } else {
                let id = res.expect("valid submission was rejected");
                let stored = db.board(board);
                assert_eq!(stored.len(), 1);
                assert_eq!(stored[0].id, id);
                assert_eq!(stored[0].body, body.trim());
                if anonymous {
                    assert_eq!(stored[0].author, ANONYMOUS);
                }
                let other = match board {
                    Board::Public => Board::Private,
                    Board::Private => Board::Public,
                };
                assert!(db.board(other).is_empty());
                return;
            }
            assert!(db.board(Board::Public).is_empty());
            assert!(db.board(Board::Private).is_empty());
        })
}

async fn call<Req, Resp>(
    app: &Router,
    req: request::Request<axum::body::Body>,
    req_body: &Req,
) -> Result<Resp, ApiError>
where
    Req: Debug,
    Resp: 'static + for<'de> serde::Deserialize<'de>,
{
    let resp = app.clone().oneshot(req).await.expect("running request");
    let status = resp.status();
    let body = hyper::body::to_bytes(resp.into_body())
        .await
        .expect("recovering resp bytes");
    if status == http::StatusCode::OK {
        if std::any::TypeId::of::<Resp>() == std::any::TypeId::of::<()>() {
            // the server returns an empty string in this situation, which does not parse properly with serde_json
            return Ok(serde_json::from_slice(b"null").unwrap());
        } else {
            return Ok(serde_json::from_slice(&body).unwrap_or_else(|err| {
                panic!("parsing response body {body:?} to {req_body:?}: {err}")
            }));
        }
    }
    Err(ApiError::parse(&body)
        .unwrap_or_else(|err| panic!("parsing error response body {err}, body is {body:?}")))
}

async fn run_on_app<Req, Resp>(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<SessionToken>,
    body: &Req,
) -> Result<Resp, ApiError>
where
    Req: Debug + serde::Serialize,
    Resp: 'static + for<'de> serde::Deserialize<'de>,
{
    let req = request::Builder::new()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    let req = match token {
        Some(token) => req.header(http::header::AUTHORIZATION, format!("bearer {}", token.0)),
        None => req,
    };
    let req = req
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("serializing request body to json"),
        ))
        .expect("building request");
    call(app, req, body).await
}

async fn new_session(app: &Router) -> SessionToken {
    run_on_app(app, "POST", "/api/session", None, &())
        .await
        .expect("creating session")
}

async fn submit(
    app: &Router,
    token: SessionToken,
    board: Board,
    body: &str,
) -> Result<SuggestionId, ApiError> {
    let s = NewSuggestion {
        board,
        anonymous: false,
        author: String::from("alice"),
        body: String::from(body),
    };
    run_on_app(app, "POST", "/api/submit-suggestion", Some(token), &s).await
}

async fn submit_comment(
    app: &Router,
    token: SessionToken,
    suggestion: SuggestionId,
    body: &str,
) -> Result<(), ApiError> {
    let c = NewComment {
        suggestion,
        anonymous: false,
        author: String::from("bob"),
        body: String::from(body),
    };
    run_on_app(app, "POST", "/api/submit-comment", Some(token), &c).await
}

async fn fetch(app: &Router, token: SessionToken, board: Board) -> Vec<Suggestion> {
    run_on_app(app, "GET", &format!("/api/fetch-{board}"), Some(token), &())
        .await
        .expect("fetching board")
}

#[tokio::test]
async fn api_submission_goes_to_chosen_board() {
    let app = app(test_sessions());
    let tok = new_session(&app).await;

    let id = submit(&app, tok, Board::Public, "longer lunch breaks").await.unwrap();
    let public = fetch(&app, tok, Board::Public).await;
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].id, id);
    assert_eq!(public[0].body, "longer lunch breaks");
    assert!(fetch(&app, tok, Board::Private).await.is_empty());

    submit(&app, tok, Board::Private, "my manager is great").await.unwrap();
    assert_eq!(fetch(&app, tok, Board::Public).await.len(), 1);
    assert_eq!(fetch(&app, tok, Board::Private).await.len(), 1);
}

#[tokio::test]
async fn api_blank_suggestion_is_rejected() {
    let app = app(test_sessions());
    let tok = new_session(&app).await;
    assert_eq!(
        submit(&app, tok, Board::Public, "  \n").await,
        Err(ApiError::EmptyBody)
    );
    assert_eq!(
        submit(&app, tok, Board::Private, "").await,
        Err(ApiError::EmptyBody)
    );
    assert!(fetch(&app, tok, Board::Public).await.is_empty());
    assert!(fetch(&app, tok, Board::Private).await.is_empty());
}

#[tokio::test]
async fn api_comment_reaches_only_its_target() {
    let app = app(test_sessions());
    let tok = new_session(&app).await;
    let a = submit(&app, tok, Board::Public, "a").await.unwrap();
    let b = submit(&app, tok, Board::Public, "b").await.unwrap();
    let before = fetch(&app, tok, Board::Public).await;

    submit_comment(&app, tok, a, "+1").await.unwrap();
    assert_eq!(
        submit_comment(&app, tok, a, " ").await,
        Err(ApiError::EmptyBody)
    );

    let after = fetch(&app, tok, Board::Public).await;
    let get = |v: &Vec<Suggestion>, id: SuggestionId| {
        v.iter().find(|s| s.id == id).cloned().expect("suggestion disappeared")
    };
    let (a_before, a_after) = (get(&before, a), get(&after, a));
    assert_eq!(a_after.comments.len(), 1);
    assert_eq!(a_after.comments[0].author, "bob");
    assert_eq!(a_after.comments[0].body, "+1");
    assert_eq!(
        (a_after.author, a_after.body, a_after.date),
        (a_before.author, a_before.body, a_before.date)
    );
    assert_eq!(get(&before, b), get(&after, b));
}

#[tokio::test]
async fn api_comment_needs_public_target() {
    let app = app(test_sessions());
    let tok = new_session(&app).await;
    let private = submit(&app, tok, Board::Private, "secret").await.unwrap();
    assert_eq!(
        submit_comment(&app, tok, private, "hi").await,
        Err(ApiError::UnknownSuggestion(private))
    );
    let unknown = SuggestionId(Uuid::new_v4());
    assert_eq!(
        submit_comment(&app, tok, unknown, "hi").await,
        Err(ApiError::UnknownSuggestion(unknown))
    );
}

#[tokio::test]
async fn api_sessions_are_isolated() {
    let app = app(test_sessions());
    let alice = new_session(&app).await;
    let bob = new_session(&app).await;
    let id = submit(&app, alice, Board::Public, "hello").await.unwrap();

    assert!(fetch(&app, bob, Board::Public).await.is_empty());
    assert_eq!(
        submit_comment(&app, bob, id, "hi").await,
        Err(ApiError::UnknownSuggestion(id))
    );
    assert_eq!(fetch(&app, alice, Board::Public).await.len(), 1);
}

#[tokio::test]
async fn api_requires_live_session() {
    let app = app(test_sessions());
    let res: Result<Vec<Suggestion>, _> =
        run_on_app(&app, "GET", "/api/fetch-public", None, &()).await;
    assert_eq!(res, Err(ApiError::PermissionDenied));
    assert_eq!(
        submit(&app, SessionToken(Uuid::new_v4()), Board::Public, "x").await,
        Err(ApiError::PermissionDenied)
    );

    let tok = new_session(&app).await;
    run_on_app::<_, ()>(&app, "POST", "/api/end-session", Some(tok), &())
        .await
        .unwrap();
    assert_eq!(
        submit(&app, tok, Board::Public, "x").await,
        Err(ApiError::PermissionDenied)
    );
    assert_eq!(
        run_on_app::<_, ()>(&app, "POST", "/api/end-session", Some(tok), &()).await,
        Err(ApiError::PermissionDenied)
    );
}

#[tokio::test]
async fn api_board_view_is_stable() {
    let app = app(test_sessions());
    let tok = new_session(&app).await;
    for body in ["one", "two", "three"] {
        let id = submit(&app, tok, Board::Public, body).await.unwrap();
        submit_comment(&app, tok, id, "ok").await.unwrap();
    }
    let view = |v: Vec<Suggestion>| {
        v.into_iter()
            .map(|s| (s.author, s.body, s.date, s.comments.len()))
            .collect::<Vec<_>>()
    };
    assert_eq!(
        view(fetch(&app, tok, Board::Public).await),
        view(fetch(&app, tok, Board::Public).await)
    );
}

struct Page {
    status: http::StatusCode,
    cookie: String,
    html: String,
}

async fn load_page(app: &Router, method: &str, uri: &str, cookie: Option<&str>, form: &str) -> Page {
    let req = request::Builder::new()
        .method(method)
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
    let req = match cookie {
        Some(cookie) => req.header(http::header::COOKIE, cookie),
        None => req,
    };
    let req = req
        .body(axum::body::Body::from(String::from(form)))
        .expect("building request");
    let resp = app.clone().oneshot(req).await.expect("running request");
    let status = resp.status();
    let cookie = resp
        .headers()
        .get(http::header::SET_COOKIE)
        .expect("page did not set the session cookie")
        .to_str()
        .expect("cookie is not ascii")
        .split(';')
        .next()
        .unwrap()
        .to_string();
    let body = hyper::body::to_bytes(resp.into_body())
        .await
        .expect("recovering resp bytes");
    let html = String::from_utf8(body.to_vec()).expect("page is not utf8");
    Page {
        status,
        cookie,
        html,
    }
}

#[tokio::test]
async fn page_starts_a_session() {
    let app = app(test_sessions());
    let page = load_page(&app, "GET", "/", None, "").await;
    assert_eq!(page.status, http::StatusCode::OK);
    assert!(page.cookie.starts_with(&format!("{SESSION_COOKIE}=")));
    assert!(page.html.starts_with("<!DOCTYPE html>"));
    assert!(page.html.contains("No public suggestions yet"));

    let again = load_page(&app, "GET", "/", Some(&page.cookie), "").await;
    assert_eq!(again.cookie, page.cookie);
}

#[tokio::test]
async fn page_submit_then_comment() {
    let app = app(test_sessions());
    let cookie = load_page(&app, "GET", "/", None, "").await.cookie;

    let page = load_page(
        &app,
        "POST",
        "/submit",
        Some(&cookie),
        "board=public&author=alice&body=more+plants+please",
    )
    .await;
    assert_eq!(page.status, http::StatusCode::OK);
    assert!(page.html.contains("more plants please"));
    assert!(page.html.contains("alice"));
    assert!(page.html.contains("Comments (0)"));
    assert!(page.html.contains("Your suggestion is on the public board"));

    let page = load_page(
        &app,
        "POST",
        "/submit",
        Some(&cookie),
        "board=private&anonymous=on&author=alice&body=hidden+thoughts",
    )
    .await;
    assert_eq!(page.status, http::StatusCode::OK);
    assert!(!page.html.contains("hidden thoughts"));
    assert!(page.html.contains("Only you can see it"));

    let sessions_id = {
        let token = cookie
            .split_once('=')
            .and_then(|(_, v)| Uuid::try_from(v).ok())
            .expect("parsing cookie");
        SessionToken(token)
    };
    let public = run_on_app::<_, Vec<Suggestion>>(
        &app,
        "GET",
        "/api/fetch-public",
        Some(sessions_id),
        &(),
    )
    .await
    .unwrap();
    let private = run_on_app::<_, Vec<Suggestion>>(
        &app,
        "GET",
        "/api/fetch-private",
        Some(sessions_id),
        &(),
    )
    .await
    .unwrap();
    assert_eq!(private.len(), 1);
    assert_eq!(private[0].author, ANONYMOUS);

    let page = load_page(
        &app,
        "POST",
        &format!("/comment/{}", public[0].id.0),
        Some(&cookie),
        "author=bob&body=seconded",
    )
    .await;
    assert_eq!(page.status, http::StatusCode::OK);
    assert!(page.html.contains("Comments (1)"));
    assert!(page.html.contains("seconded"));
    assert!(page.html.contains("Your comment was posted!"));

    let page = load_page(
        &app,
        "POST",
        &format!("/comment/{}", public[0].id.0),
        Some(&cookie),
        "anonymous=on&author=carol&body=thirded",
    )
    .await;
    assert_eq!(page.status, http::StatusCode::OK);
    assert!(page.html.contains("Comments (2)"));
    assert!(!page.html.contains("carol"));

    let public = run_on_app::<_, Vec<Suggestion>>(
        &app,
        "GET",
        "/api/fetch-public",
        Some(sessions_id),
        &(),
    )
    .await
    .unwrap();
    let authors = public[0]
        .comments
        .iter()
        .map(|c| (c.author.as_str(), c.body.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(authors, [("bob", "seconded"), (ANONYMOUS, "thirded")]);
}

#[tokio::test]
async fn page_blank_submission_shows_error() {
    let app = app(test_sessions());
    let page = load_page(&app, "POST", "/submit", None, "board=public&author=alice&body=+++").await;
    assert_eq!(page.status, http::StatusCode::BAD_REQUEST);
    assert!(page.html.contains("Please write something before submitting"));
    assert!(page.html.contains("No public suggestions yet"));

    let cookie = page.cookie;
    let page = load_page(&app, "POST", "/submit", Some(&cookie), "board=public&body=ok").await;
    assert!(page.html.contains("Comments (0)"));
    let id = page
        .html
        .split("action=\"/comment/")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .expect("finding comment form")
        .to_string();
    let page = load_page(&app, "POST", &format!("/comment/{id}"), Some(&cookie), "body=").await;
    assert_eq!(page.status, http::StatusCode::BAD_REQUEST);
    assert!(page.html.contains("Please write something before submitting"));
    assert!(page.html.contains("Comments (0)"));
}

#[tokio::test]
async fn page_escapes_user_text() {
    let app = app(test_sessions());
    let page = load_page(
        &app,
        "POST",
        "/submit",
        None,
        "board=public&author=mallory&body=%3Cscript%3Ealert(1)%3C%2Fscript%3E",
    )
    .await;
    assert!(!page.html.contains("<script>alert(1)</script>"));
    assert!(page.html.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn page_lists_newest_first() {
    let sessions = test_sessions();
    let app = app(sessions.clone());
    let session = sessions.create().await;
    let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    for (secs, body) in [(1, "body-t1"), (3, "body-t3"), (2, "body-t2")] {
        session
            .store
            .lock()
            .await
            .submit_suggestion(
                NewSuggestion {
                    board: Board::Public,
                    anonymous: true,
                    author: String::new(),
                    body: String::from(body),
                },
                t0 + Duration::seconds(secs),
            )
            .unwrap();
    }
    let cookie = format!("{SESSION_COOKIE}={}", session.token.0);
    let html = load_page(&app, "GET", "/", Some(&cookie), "").await.html;
    let pos = |needle: &str| html.find(needle).expect("missing suggestion");
    assert!(pos("body-t3") < pos("body-t2"));
    assert!(pos("body-t2") < pos("body-t1"));
    assert!(html.contains("2023-11-14 22:13:23"));
}

#[tokio::test]
async fn page_comment_on_missing_suggestion() {
    let app = app(test_sessions());
    let uri = format!("/comment/{}", Uuid::new_v4());
    let page = load_page(&app, "POST", &uri, None, "author=bob&body=hello").await;
    assert_eq!(page.status, http::StatusCode::NOT_FOUND);
    assert!(page.html.contains("Unknown suggestion"));
    assert!(page.html.contains("No public suggestions yet"));
}

#[tokio::test]
async fn page_unknown_board_shows_error() {
    let app = app(test_sessions());
    let cookie = load_page(&app, "GET", "/", None, "").await.cookie;
    let page = load_page(
        &app,
        "POST",
        "/submit",
        Some(&cookie),
        "board=secret&author=alice&body=hello",
    )
    .await;
    assert_eq!(page.status, http::StatusCode::BAD_REQUEST);
    assert_eq!(page.cookie, cookie);
    assert!(page.html.contains("unknown board"));
    assert!(page.html.contains("No public suggestions yet"));
    assert!(!page.html.contains("hello"));

    let page = load_page(&app, "POST", "/submit", Some(&cookie), "author=alice&body=hello").await;
    assert_eq!(page.status, http::StatusCode::OK);
    assert!(page.html.contains("Your suggestion is on the public board"));
}

#[tokio::test(start_paused = true)]
async fn idle_page_sessions_are_dropped() {
    let sessions = test_sessions();
    let app = app(sessions.clone());
    for _ in 0..10 {
        load_page(&app, "GET", "/", None, "").await;
    }
    let kept = load_page(&app, "GET", "/", None, "").await.cookie;
    assert_eq!(sessions.len().await, 11);

    tokio::time::advance(SESSION_TTL / 2).await;
    load_page(&app, "GET", "/", Some(&kept), "").await;
    tokio::time::advance(SESSION_TTL / 2).await;

    let fresh = load_page(&app, "GET", "/", None, "").await.cookie;
    assert_eq!(sessions.len().await, 2);
    assert_eq!(load_page(&app, "GET", "/", Some(&kept), "").await.cookie, kept);
    assert_ne!(fresh, kept);
}
