use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use structopt::StructOpt;

mod db;
mod error;
mod extractors;
mod fuzz;
mod handlers;
mod page;
mod sessions;
mod ui;

pub use error::Error;
pub use sessions::Sessions;

use extractors::AppState;

#[derive(StructOpt)]
struct Opt {
    /// Address to listen on
    #[structopt(long, env = "SUGGESTBOX_LISTEN", default_value = "127.0.0.1:3000")]
    listen: SocketAddr,

    /// Seconds a session may stay unused before it is dropped along with its suggestions
    #[structopt(long, env = "SUGGESTBOX_SESSION_TTL", default_value = "3600")]
    session_ttl: u64,
}

pub fn app(sessions: Sessions) -> Router {
    let state = AppState { sessions };
    Router::new()
        .route("/", get(page::index))
        .route("/submit", post(page::submit))
        .route("/comment/:id", post(page::comment))
        .route("/api/session", post(handlers::new_session))
        .route("/api/end-session", post(handlers::end_session))
        .route("/api/submit-suggestion", post(handlers::submit_suggestion))
        .route("/api/submit-comment", post(handlers::submit_comment))
        .route("/api/fetch-public", get(handlers::fetch_public))
        .route("/api/fetch-private", get(handlers::fetch_private))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opt = Opt::from_args();
    let app = app(Sessions::new(Duration::from_secs(opt.session_ttl)));

    tracing::info!("listening on {}", opt.listen);
    axum::Server::bind(&opt.listen)
        .serve(app.into_make_service())
        .await
        .context("serving axum webserver")
}
