//! Form handlers for the comparison selection. Each one updates the session
//! and sends the browser back to the results page.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use tracing::debug;

use crate::{
    controller::{pagination::parse_page, SelectedItem},
    web::{results_href, session_cookie, AppState},
};

/// Where to send the browser afterwards.
#[derive(Deserialize, Debug, Default)]
pub struct BackTo {
    #[serde(default)]
    query: String,
    #[serde(default)]
    page: Option<String>,
}

fn back_href(query: &str, page: Option<&str>) -> String {
    results_href(query, parse_page(page))
}

#[derive(Deserialize, Debug)]
pub struct ToggleForm {
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    query: String,
    #[serde(default)]
    page: Option<String>,
}

pub async fn toggle(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ToggleForm>,
) -> impl IntoResponse {
    let back = back_href(&form.query, form.page.as_deref());
    let (jar, session_id) = session_cookie(jar);
    let controller = state.sessions.get_or_create(&session_id).await;
    {
        let mut controller = controller.lock().await;
        // prefer what the backend sent over what came back in the form
        let item = match controller.find_result(&form.link) {
            Some(result) => SelectedItem::from(result),
            None => SelectedItem {
                title: form.title,
                snippet: form.snippet,
                link: form.link,
            },
        };
        controller.toggle_comparison_selection(item);
        debug!("selection is now {} items", controller.selection().len());
    }
    (jar, Redirect::to(&back))
}

#[derive(Deserialize, Debug)]
pub struct RemoveForm {
    index: usize,
    #[serde(default)]
    query: String,
    #[serde(default)]
    page: Option<String>,
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<RemoveForm>,
) -> impl IntoResponse {
    let (jar, session_id) = session_cookie(jar);
    let controller = state.sessions.get_or_create(&session_id).await;
    controller
        .lock()
        .await
        .remove_comparison_selection(form.index);
    (jar, Redirect::to(&back_href(&form.query, form.page.as_deref())))
}

/// Go to the comparison view, or back to the results with a message if two
/// results haven't been picked.
pub async fn open_comparison(
    Query(back): Query<BackTo>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, session_id) = session_cookie(jar);
    let controller = state.sessions.get_or_create(&session_id).await;
    let target = controller.lock().await.open_comparison();
    let location = match target {
        Ok(target) => target.href(),
        Err(err) => format!(
            "{}&notice={}",
            back_href(&back.query, back.page.as_deref()),
            urlencoding::encode(&err.to_string())
        ),
    };
    (jar, Redirect::to(&location))
}
