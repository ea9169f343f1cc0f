//! The side-by-side comparison page.

use std::{convert::Infallible, sync::Arc};

use async_stream::stream;
use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use maud::{html, Markup, DOCTYPE};

use crate::{
    backend::{Comparison, Lines, Website},
    config::Config,
    controller::{load_comparison, ComparisonParams, ComparisonView},
    web::{footer_html, head_html, AppState},
};

fn render_beginning_of_html(config: &Config) -> String {
    let head = head_html(Some("Compare"), None, config).into_string();
    let doctype = DOCTYPE.0;
    format!(r#"{doctype}<html lang="en">{head}<body><div class="main-container comparison-page">"#)
}

fn render_end_of_html(config: &Config) -> String {
    format!("</div>{}</body></html>", footer_html(config).into_string())
}

/// One row of the comparison. Lines from the two sites sit side by side.
fn render_row(left: &Lines, right: &Lines) -> Markup {
    html! {
        div.comparison-row {
            @for lines in [left, right] {
                div.comparison-cell {
                    ul {
                        @for line in lines.iter() {
                            li { (line) }
                        }
                    }
                }
            }
        }
    }
}

fn render_section(title: &str, body: Markup) -> Markup {
    html! {
        section.comparison-section {
            h3 { (title) }
            (body)
        }
    }
}

fn render_site_link(website: &Website, title: &str) -> Markup {
    html! {
        a.comparison-site href=(website.url) target="_blank" rel="noopener noreferrer" {
            (title) " ↗"
        }
    }
}

/// The analysed title, or the one the comparison was opened with if the
/// analysis left it out.
fn display_title(website: &Website, fallback: Option<&str>) -> String {
    if !website.title.is_empty() {
        return website.title.clone();
    }
    fallback.unwrap_or(&website.url).to_string()
}

fn render_comparison(comparison: &Comparison, params: &ComparisonParams) -> Markup {
    let Comparison { first, second } = comparison;
    let first_title = display_title(first, params.title1.as_deref());
    let second_title = display_title(second, params.title2.as_deref());

    let strengths_and_limitations = html! {
        div.comparison-row.comparison-labels {
            h4.advantages { "Advantages" }
            h4.advantages { "Advantages" }
        }
        (render_row(&first.advantages, &second.advantages))
        div.comparison-row.comparison-labels {
            h4.limitations { "Limitations" }
            h4.limitations { "Limitations" }
        }
        (render_row(&first.limitations, &second.limitations))
    };

    html! {
        div.comparison {
            h2.comparison-header {
                (render_site_link(first, &first_title))
                span.versus { "⇄" }
                (render_site_link(second, &second_title))
            }
            (render_section("Key Information", render_row(&first.key_points, &second.key_points)))
            (render_section(
                "Content Structure",
                render_row(
                    &first.content_structure.main_content,
                    &second.content_structure.main_content,
                ),
            ))
            (render_section(
                "Unique Features",
                render_row(&first.unique_features, &second.unique_features),
            ))
            (render_section("Strengths & Limitations", strengths_and_limitations))
            div.analysis-summary {
                h3 { "Content Analysis Summary" }
                p {
                    span.label { "Best for Beginners: " }
                    (second_title) " offers a simpler introduction."
                }
                p {
                    span.label { "Best for Comprehensive Learning: " }
                    (first_title) " provides detailed explanations."
                }
                p {
                    span.label { "Recommendation: " }
                    "Choose based on learning preference."
                }
            }
        }
    }
}

fn render_view(view: &ComparisonView, params: &ComparisonParams) -> Markup {
    html! {
        @match view {
            ComparisonView::Loading => {
                div.compare-loading { "Loading website comparison..." }
            }
            ComparisonView::Ready(comparison) => {
                (render_comparison(comparison, params))
            }
            view => {
                @if let Some(message) = view.message() {
                    div.compare-error { (message) }
                }
            }
        }
    }
}

pub async fn route(
    Query(params): Query<ComparisonParams>,
    State(state): State<Arc<AppState>>,
) -> Response {
    if params.request().is_none() {
        let mut html = render_beginning_of_html(&state.config);
        html.push_str(&render_view(&ComparisonView::NothingToCompare, &params).into_string());
        html.push_str(&render_end_of_html(&state.config));
        return ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response();
    }

    let s = stream! {
        type R = Result<Bytes, Infallible>;

        let mut first_half = render_beginning_of_html(&state.config);
        first_half.push_str(r#"<div class="progress-updates">"#);
        first_half.push_str(&render_view(&ComparisonView::Loading, &params).into_string());
        first_half.push_str("</div>");
        yield R::Ok(Bytes::from(first_half));

        let view = load_comparison(&state.backend, &params).await;

        let mut second_half = String::new();
        second_half.push_str("<style>.progress-updates{display:none}</style>");
        second_half.push_str(&render_view(&view, &params).into_string());
        second_half.push_str(&render_end_of_html(&state.config));
        yield R::Ok(Bytes::from(second_half));
    };

    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        Body::from_stream(s),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::web::test_util::{app_for, body_text, get};

    #[tokio::test]
    async fn missing_url_renders_not_enough_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let app = app_for(&server);

        let body = body_text(get(&app, "/compare-results?url1=https%3A%2F%2Fa.example", None).await)
            .await;
        assert!(body.contains("Not enough data to compare websites."));
        assert!(!body.contains("Loading website comparison"));
    }

    #[tokio::test]
    async fn renders_both_sites() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/compare"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "websites": [
                    {
                        "url": "https://a.example",
                        "title": "Alpha",
                        "keyPoints": ["alpha point one", "alpha point two"],
                        "uniqueFeatures": "alpha feature",
                        "contentStructure": {
                            "introduction": "intro",
                            "mainContent": "alpha main",
                            "conclusion": "end",
                        },
                        "advantages": ["fast"],
                        "limitations": ["small"],
                    },
                    {
                        "url": "https://b.example",
                        "title": "",
                        "keyPoints": "bravo point",
                        "contentStructure": {"mainContent": ["bravo main"]},
                    },
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let app = app_for(&server);

        let body = body_text(
            get(
                &app,
                "/compare-results?url1=https%3A%2F%2Fa.example&url2=https%3A%2F%2Fb.example\
                 &title1=Alpha&title2=Bravo",
                None,
            )
            .await,
        )
        .await;
        assert!(body.contains("Alpha ↗"));
        // the title from the link is used when the analysis has none
        assert!(body.contains("Bravo ↗"));
        assert!(body.contains("<li>alpha point two</li>"));
        assert!(body.contains("<li>bravo point</li>"));
        assert!(body.contains("<li>alpha main</li>"));
        assert!(body.contains("<li>bravo main</li>"));
        assert!(body.contains("<li>alpha feature</li>"));
        assert!(body.contains("Bravo offers a simpler introduction."));
    }

    #[tokio::test]
    async fn single_website_is_not_enough_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/compare"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "websites": [{"url": "https://a.example", "title": "Alpha"}]
            })))
            .mount(&server)
            .await;
        let app = app_for(&server);

        let body = body_text(get(&app, "/compare-results?url1=a&url2=b", None).await).await;
        assert!(body.contains("Not enough data to compare websites."));
    }

    #[tokio::test]
    async fn failure_renders_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/compare"))
            .respond_with(ResponseTemplate::new(502))
            .expect(1)
            .mount(&server)
            .await;
        let app = app_for(&server);

        let body = body_text(get(&app, "/compare-results?url1=a&url2=b", None).await).await;
        assert!(body.contains("API call failed"));
    }
}
