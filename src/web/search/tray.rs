//! The floating tray listing the results picked for comparison.

use maud::{html, Markup};

use crate::controller::ResultsController;

pub fn render_tray(controller: &ResultsController, query: &str, page: usize) -> Markup {
    let selection = controller.selection();
    if selection.is_empty() {
        return html! {};
    }

    html! {
        div.comparison-tray {
            @for (index, item) in selection.items().iter().enumerate() {
                div.tray-item {
                    form.tray-remove method="post" action="/select/remove" {
                        input type="hidden" name="index" value=(index);
                        input type="hidden" name="query" value=(query);
                        input type="hidden" name="page" value=(page);
                        button type="submit" aria-label="Remove from comparison" { "×" }
                    }
                    h3.tray-item-title { (item.title) }
                    p.tray-item-snippet { (item.snippet) }
                }
            }
            @if !selection.is_full() {
                div.tray-placeholder {
                    p { "Select another result to compare" }
                }
            }
            form.tray-compare method="get" action="/compare" target="_blank" {
                input type="hidden" name="query" value=(query);
                input type="hidden" name="page" value=(page);
                button type="submit" disabled[!selection.is_full()] { "Compare →" }
            }
        }
    }
}
