use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use tracing::debug;

use crate::{
    controller::{self, pagination::parse_page},
    web::{results_href, session_cookie, AppState},
};

#[derive(Deserialize, Debug)]
pub struct SummaryForm {
    link: String,
    #[serde(default)]
    query: String,
    #[serde(default)]
    page: Option<String>,
}

/// Start the summary for one card and go straight back to it. The results
/// page shows it loading until the summary is in.
pub async fn route(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SummaryForm>,
) -> impl IntoResponse {
    let (jar, session_id) = session_cookie(jar);
    let controller = state.sessions.get_or_create(&session_id).await;

    if controller::generate_summary_for(&controller, &state.backend, &form.link)
        .await
        .is_none()
    {
        debug!("not starting a summary for {}", form.link);
    }

    let mut location = results_href(&form.query, parse_page(form.page.as_deref()));
    if let Some(index) = controller.lock().await.position_of(&form.link) {
        location.push_str(&format!("#result-{index}"));
    }
    (jar, Redirect::to(&location))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{http::StatusCode, Router};
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use crate::web::test_util::{app_for, body_text, get, location, post_form, session_cookie_of};

    /// The results page once no card is loading anymore.
    async fn settled_page(app: &Router, cookie: &str) -> String {
        for _ in 0..100 {
            let body = body_text(get(app, "/search?query=rust&page=1", Some(cookie)).await).await;
            if !body.contains("summary-loading") {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("summary never finished");
    }

    #[tokio::test]
    async fn generated_summary_shows_on_its_card() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"link": "https://a.example", "rank": 1, "snippet": "about a", "title": "Alpha"},
                    {"link": "https://b.example", "rank": 2, "snippet": "about b", "title": "Bravo"},
                ],
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/summary"))
            .and(body_json(json!({"url": "https://b.example"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"summary": "Bravo in brief"}))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;
        let app = app_for(&server);

        let res = get(&app, "/search?query=rust", None).await;
        let cookie = session_cookie_of(&res);
        body_text(res).await;

        let res = post_form(
            &app,
            "/summary",
            "link=https%3A%2F%2Fb.example&query=rust&page=1",
            Some(&cookie),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/search?query=rust&page=1#result-1");

        // the redirect comes back before the summary does
        let loading = body_text(get(&app, "/search?query=rust&page=1", Some(&cookie)).await).await;
        assert!(loading.contains("summary-loading"));
        assert!(loading.contains(r#"http-equiv="refresh""#));

        let body = settled_page(&app, &cookie).await;
        assert!(body.contains("Bravo in brief"));
        assert!(!body.contains(r#"http-equiv="refresh""#));
        // only the other card still offers a summary
        assert_eq!(body.matches("Generate Summary").count(), 1);
    }

    #[tokio::test]
    async fn failed_summary_shows_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"link": "https://a.example", "rank": 1, "title": "Alpha"}],
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/summary"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let app = app_for(&server);

        let res = get(&app, "/search?query=rust", None).await;
        let cookie = session_cookie_of(&res);
        body_text(res).await;

        post_form(
            &app,
            "/summary",
            "link=https%3A%2F%2Fa.example&query=rust&page=1",
            Some(&cookie),
        )
        .await;

        let body = settled_page(&app, &cookie).await;
        assert!(body.contains("Failed to generate summary"));
        // a failed card can try again
        assert!(body.contains("Generate Summary"));
    }
}
