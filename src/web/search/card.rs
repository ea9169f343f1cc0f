//! A single result card with its compare toggle and summary.

use maud::{html, Markup};

use crate::{
    backend::ResultItem,
    controller::{CardSummary, ResultsController},
};

pub fn render_result_card(
    controller: &ResultsController,
    query: &str,
    result: &ResultItem,
    index: usize,
    page: usize,
) -> Markup {
    let selection = controller.selection();
    let selected = selection.contains(&result.link);
    let summary = controller.card_summary(&result.link);

    html! {
        div.result-card.selected[selected] id=(format!("result-{index}")) {
            div.card-header {
                h2.card-title { (result.title) }
                form.compare-toggle method="post" action="/select" {
                    input type="hidden" name="link" value=(result.link);
                    input type="hidden" name="title" value=(result.title);
                    input type="hidden" name="snippet" value=(result.snippet);
                    input type="hidden" name="query" value=(query);
                    input type="hidden" name="page" value=(page);
                    button.compare-button.active[selected] type="submit" title="Compare"
                        disabled[!selected && selection.is_full()] {
                        @if selected { "Selected" } @else { "Compare" }
                    }
                }
            }
            p.card-snippet { (result.snippet) }
            (render_card_summary(summary))
            div.card-footer {
                @if matches!(summary, CardSummary::Idle | CardSummary::Failed { .. }) {
                    form.generate-summary method="post" action="/summary" {
                        input type="hidden" name="link" value=(result.link);
                        input type="hidden" name="query" value=(query);
                        input type="hidden" name="page" value=(page);
                        button type="submit" { "Generate Summary" }
                    }
                }
                a.learn-more href=(result.link) target="_blank" rel="noopener noreferrer" {
                    "Learn more →"
                }
            }
        }
    }
}

fn render_card_summary(summary: &CardSummary) -> Markup {
    html! {
        @match summary {
            CardSummary::Idle => {}
            CardSummary::Loading { text } => {
                div.summary-loading { span { (text) } }
            }
            CardSummary::Generated { text, title } => {
                // open by default, the summary element toggles it
                details.card-summary open {
                    summary.card-summary-title { (title) }
                    p.card-summary-text { (text) }
                }
            }
            CardSummary::Failed { message } => {
                p.error { (message) }
            }
        }
    }
}
