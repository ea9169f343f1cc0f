use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse};
use maud::{html, PreEscaped, DOCTYPE};

use crate::web::{footer_html, head_html, AppState};

const SUGGESTED_QUERIES: &[&str] = &["What are LLMs?", "Best free open-source AI code editors"];

pub async fn route(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = &state.config;
    let html = html! {
        (PreEscaped("<!-- sixthsense -->\n"))
        (DOCTYPE)
        html lang="en" {
            (head_html(None, None, config))
            body {
                div.main-container.index-page {
                    h1.site-title { (config.ui.site_name) }
                    form.search-form action="/search" method="get" {
                        // whitespace-only queries never leave the page
                        input type="text" name="query" required pattern=r".*\S.*"
                            placeholder="Search with Our Sixth Sense..." autofocus;
                        input type="submit" value="Search";
                    }
                    div.suggested-queries {
                        @for query in SUGGESTED_QUERIES {
                            form action="/search" method="get" {
                                input type="hidden" name="query" value=(query);
                                button.suggested-query type="submit" { (query) }
                            }
                        }
                    }
                }
                (footer_html(config))
            }
        }
    }
    .into_string();

    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html)
}

#[cfg(test)]
mod tests {
    use wiremock::MockServer;

    use crate::web::test_util::{app_for, body_text, get};

    #[tokio::test]
    async fn index_has_search_form() {
        let server = MockServer::start().await;
        let app = app_for(&server);

        let body = body_text(get(&app, "/", None).await).await;
        assert!(body.contains("Sixth Sense"));
        assert!(body.contains(r#"action="/search""#));
        assert!(body.contains("What are LLMs?"));
    }
}
