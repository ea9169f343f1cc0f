//! The results page.

mod card;
mod tray;

use std::{collections::HashMap, convert::Infallible, sync::Arc};

use async_stream::stream;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use bytes::Bytes;
use maud::{html, Markup, DOCTYPE};

use crate::{
    config::Config,
    controller::{self, pagination, ResultsController},
    web::{footer_html, head_html, header_html, results_href, session_cookie, AppState},
};

/// How often a page with a summary still generating reloads itself.
const SUMMARY_REFRESH_SECS: u32 = 2;

fn render_beginning_of_html(query: &str, refresh_secs: Option<u32>, config: &Config) -> String {
    let head = head_html(Some(query), refresh_secs, config).into_string();
    let header = header_html(query, config).into_string();
    let doctype = DOCTYPE.0;
    format!(r#"{doctype}<html lang="en">{head}<body>{header}<main class="results-page">"#)
}

fn render_loading_notice() -> Markup {
    html! {
        div.loading-notice {
            p.loading { (controller::summary::random_loading_text()) }
        }
    }
}

fn render_end_of_html(
    controller: &ResultsController,
    query: &str,
    page: usize,
    config: &Config,
) -> String {
    let mut html = String::from("</main>");
    html.push_str(&tray::render_tray(controller, query, page).into_string());
    html.push_str(&footer_html(config).into_string());
    html.push_str("</body></html>");
    html
}

fn render_summary_box(controller: &ResultsController, query: &str) -> Markup {
    let loading = controller.is_loading_for(query);
    let error = controller.error_for(query);
    let bullets: &[String] = if controller.has_results_for(query) {
        controller.summary_bullets()
    } else {
        &[]
    };
    html! {
        section.summary-box {
            h2 { "Search Results" }
            @if loading {
                p.loading { "Loading..." }
            }
            @if let Some(error) = error {
                p.error { (error) }
            }
            @if !loading && error.is_none() && !bullets.is_empty() {
                ol.summary-bullets {
                    @for (i, bullet) in bullets.iter().enumerate() {
                        li.summary-bullet {
                            span.bullet-number { (i + 1) }
                            span.bullet-text { (bullet) }
                        }
                    }
                }
            }
        }
    }
}

fn render_pagination(query: &str, page: usize, total_pages: usize) -> Markup {
    html! {
        nav.pagination {
            @if page > 1 {
                a.page-link href=(results_href(query, page - 1)) { "Previous" }
            } @else {
                span.page-link.disabled { "Previous" }
            }
            @for p in 1..=total_pages {
                @if p == page {
                    span.page-link.current { (p) }
                } @else {
                    a.page-link href=(results_href(query, p)) { (p) }
                }
            }
            @if page < total_pages {
                a.page-link href=(results_href(query, page + 1)) { "Next" }
            } @else {
                span.page-link.disabled { "Next" }
            }
        }
    }
}

/// Everything inside `<main>` for `query`. The session may hold state from a
/// different query (a later search in another tab), which is left out.
fn render_results(
    controller: &ResultsController,
    query: &str,
    page: usize,
    notice: Option<&str>,
) -> Markup {
    let loading = controller.is_loading_for(query);
    let error = controller.error_for(query);
    let has_results = controller.has_results_for(query) && !controller.results().is_empty();
    let results = if has_results {
        controller.change_page(page)
    } else {
        &[]
    };
    let first_index = (page.saturating_sub(1)) * pagination::RESULTS_PER_PAGE;

    html! {
        @if let Some(notice) = notice {
            p.notice { (notice) }
        }
        @if page == 1 {
            (render_summary_box(controller, query))
        } @else {
            @if let Some(error) = error {
                p.error { (error) }
            }
        }
        div.search-results {
            @for (offset, result) in results.iter().enumerate() {
                (card::render_result_card(controller, query, result, first_index + offset, page))
            }
        }
        @if has_results {
            (render_pagination(query, page, controller.total_pages()))
        }
        @if !loading && error.is_none() && !has_results {
            p.no-results { "No results found." }
        }
    }
}

pub async fn route(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Response {
    let query = params
        .get("query")
        .cloned()
        .unwrap_or_default()
        .trim()
        .replace('\n', " ");
    if query.is_empty() {
        // redirect to index
        return (
            StatusCode::FOUND,
            [
                (header::LOCATION, "/"),
                (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            ],
            Body::from("<a href=\"/\">No query provided, click here to go back to index</a>"),
        )
            .into_response();
    }

    // the search forms don't send a page, so a missing page means the query
    // was just submitted. page links only change which slice is shown.
    let submitted = !params.contains_key("page");
    let page = pagination::parse_page(params.get("page").map(String::as_str));
    let notice = params.get("notice").cloned();

    let (jar, session_id) = session_cookie(jar);
    let controller = state.sessions.get_or_create(&session_id).await;

    let needs_fetch = submitted || controller.lock().await.needs_fetch(&query);
    if !needs_fetch {
        let html = {
            let controller = controller.lock().await;
            let refresh_secs = controller
                .any_summary_loading()
                .then_some(SUMMARY_REFRESH_SECS);
            let mut html = render_beginning_of_html(&query, refresh_secs, &state.config);
            html.push_str(&render_results(&controller, &query, page, notice.as_deref()).into_string());
            html.push_str(&render_end_of_html(&controller, &query, page, &state.config));
            html
        };
        return (
            jar,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            html,
        )
            .into_response();
    }

    let s = stream! {
        type R = Result<Bytes, Infallible>;

        let mut first_half = render_beginning_of_html(&query, None, &state.config);
        first_half.push_str(&render_loading_notice().into_string());
        yield R::Ok(Bytes::from(first_half));

        controller::load_results_for_query(&controller, &state.backend, &query).await;

        let mut second_half = String::new();
        second_half.push_str("<style>.loading-notice{display:none}</style>");
        {
            let controller = controller.lock().await;
            second_half.push_str(
                &render_results(&controller, &query, page, notice.as_deref()).into_string(),
            );
            second_half.push_str(&render_end_of_html(&controller, &query, page, &state.config));
        }
        yield R::Ok(Bytes::from(second_half));
    };

    (
        jar,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        Body::from_stream(s),
    )
        .into_response()
}
