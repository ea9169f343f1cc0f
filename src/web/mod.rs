pub mod compare;
pub mod index;
pub mod search;
pub mod selection;
pub mod style_css;
pub mod summary;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use maud::{html, Markup, PreEscaped};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    backend::Backend,
    config::Config,
    sessions::{new_session_id, Sessions, SESSION_COOKIE},
};

#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub backend: Backend,
    pub sessions: Sessions,
}

impl AppState {
    pub fn new(config: Config) -> eyre::Result<Self> {
        Ok(Self {
            backend: Backend::new(&config.backend)?,
            sessions: Sessions::new(config.sessions.max_idle),
            config,
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index::route))
        .route("/style.css", get(style_css::route))
        .route("/search", get(search::route))
        .route("/summary", post(summary::route))
        .route("/select", post(selection::toggle))
        .route("/select/remove", post(selection::remove))
        .route("/compare", get(selection::open_comparison))
        .route("/compare-results", get(compare::route))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> eyre::Result<()> {
    let state = Arc::new(AppState::new(config)?);

    if state.config.backend.warmup.enabled {
        let state = state.clone();
        tokio::spawn(async move {
            let warmup = &state.config.backend.warmup;
            match state.backend.warm_up(warmup).await {
                Ok(()) => info!("Backend is up"),
                Err(err) => warn!("Backend didn't answer after {} attempts: {err}", warmup.retries),
            }
        });
    }

    let bind = state.config.bind;
    let app = router(state);

    info!("Listening on http://{bind}");
    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// The session id from the cookie, adding a new one to the jar if the browser
/// doesn't have one yet.
pub fn session_cookie(jar: CookieJar) -> (CookieJar, String) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let id = cookie.value().to_owned();
        return (jar, id);
    }

    let id = new_session_id();
    let jar = jar.add(
        Cookie::build((SESSION_COOKIE, id.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    );
    (jar, id)
}

pub fn results_href(query: &str, page: usize) -> String {
    format!("/search?query={}&page={page}", urlencoding::encode(query))
}

/// `refresh_secs` makes the browser reload the page, for pages that are
/// waiting on something running in the background.
pub fn head_html(title: Option<&str>, refresh_secs: Option<u32>, config: &Config) -> Markup {
    let site_name = &config.ui.site_name;
    html! {
        head {
            meta charset="UTF-8";
            meta name="viewport" content="width=device-width, initial-scale=1.0";
            @if let Some(secs) = refresh_secs {
                meta http-equiv="refresh" content=(secs);
            }
            title {
                @if let Some(title) = title {
                    (title) " - " (site_name)
                } @else {
                    (site_name)
                }
            }
            link rel="stylesheet" href="/style.css";
        }
    }
}

pub fn header_html(query: &str, config: &Config) -> Markup {
    html! {
        header.site-header {
            a.site-name href="/" { (config.ui.site_name) }
            form.search-form.header-search-form action="/search" method="get" {
                input type="text" name="query" value=(query) required
                    pattern=r".*\S.*" placeholder="Search With Our Sixth Sense...";
                input type="submit" value="Search";
            }
        }
    }
}

pub fn footer_html(config: &Config) -> Markup {
    if !config.ui.show_version_info {
        return PreEscaped(String::new());
    }
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = env!("GIT_HASH_SHORT");
    html! {
        footer.version-info {
            span { "sixthsense v" (version) }
            @if !git_hash.is_empty() {
                " (" (git_hash) ")"
            }
        }
    }
}
