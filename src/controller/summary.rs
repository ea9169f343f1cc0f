//! The "generate summary" state of each result card.

use rand::seq::SliceRandom;

use crate::backend::FetchError;

const LOADING_TEXTS: &[&str] = &[
    "Crafting your personalized insights...",
    "Distilling wisdom from the content...",
    "Finding the perfect highlights for you...",
    "Unveiling the essence of knowledge...",
    "Brewing your customized summary...",
    "Painting the big picture for you...",
    "Launching into the depths of content...",
    "Mining for valuable insights...",
    "Creating your rainbow of knowledge...",
    "Discovering hidden gems just for you...",
    "Powering up your understanding...",
    "Uncovering the story within...",
    "Setting the stage for clarity...",
    "Blossoming insights coming your way...",
    "Orchestrating your perfect summary...",
];

const SUMMARY_TITLES: &[&str] = &[
    "Key Insights Unveiled",
    "Your Curated Summary",
    "Essential Takeaways",
    "Knowledge Crystalized",
    "Summary Highlights",
    "Smart Brief",
];

pub fn random_loading_text() -> &'static str {
    LOADING_TEXTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Loading...")
}

pub fn random_summary_title() -> &'static str {
    SUMMARY_TITLES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Summary")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CardSummary {
    #[default]
    Idle,
    Loading {
        text: &'static str,
    },
    Generated {
        text: String,
        title: &'static str,
    },
    Failed {
        message: String,
    },
}

impl CardSummary {
    pub fn loading() -> Self {
        Self::Loading {
            text: random_loading_text(),
        }
    }

    pub fn from_result(result: Result<String, FetchError>) -> Self {
        match result {
            Ok(text) => Self::Generated {
                text,
                title: random_summary_title(),
            },
            Err(err) => Self::Failed {
                message: failure_message(&err),
            },
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

fn failure_message(err: &FetchError) -> String {
    let message = match err {
        FetchError::BadStatus(_) => "Failed to generate summary".to_string(),
        err => err.to_string(),
    };
    if message.is_empty() {
        "An error occurred".to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn generated_gets_a_known_title() {
        let CardSummary::Generated { text, title } = CardSummary::from_result(Ok("hi".into()))
        else {
            panic!("expected a generated summary");
        };
        assert_eq!(text, "hi");
        assert!(SUMMARY_TITLES.contains(&title));
    }

    #[test]
    fn failures_carry_a_message() {
        assert_eq!(
            CardSummary::from_result(Err(FetchError::BadStatus(StatusCode::BAD_GATEWAY))),
            CardSummary::Failed {
                message: "Failed to generate summary".to_string()
            }
        );
        let CardSummary::Failed { message } =
            CardSummary::from_result(Err(FetchError::Timeout(Duration::from_secs(60))))
        else {
            panic!("expected a failure");
        };
        assert!(message.contains("timed out"));
    }

    #[test]
    fn loading_text_comes_from_the_list() {
        let CardSummary::Loading { text } = CardSummary::loading() else {
            panic!("expected loading");
        };
        assert!(LOADING_TEXTS.contains(&text));
    }
}
