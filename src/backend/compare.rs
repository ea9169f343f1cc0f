//! Types for the `/compare` response.
//!
//! The analysis is written by a language model, so the shapes aren't always
//! what was asked for. A field that should be a list of strings sometimes
//! comes back as one string (and the other way around), so every text field
//! accepts both.

use serde::Deserialize;

use super::FetchError;

/// A list of lines that may have been sent as a single string.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(from = "LinesRepr")]
pub struct Lines(pub Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum LinesRepr {
    Many(Vec<String>),
    One(String),
    Null(()),
}

impl From<LinesRepr> for Lines {
    fn from(repr: LinesRepr) -> Self {
        match repr {
            LinesRepr::Many(lines) => Self(lines),
            LinesRepr::One(line) if line.is_empty() => Self::default(),
            LinesRepr::One(line) => Self(vec![line]),
            LinesRepr::Null(()) => Self::default(),
        }
    }
}

impl Lines {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The lines as a single paragraph.
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentStructure {
    #[serde(default)]
    pub introduction: Lines,
    #[serde(default)]
    pub main_content: Lines,
    #[serde(default)]
    pub conclusion: Lines,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub key_points: Lines,
    #[serde(default)]
    pub unique_features: Lines,
    #[serde(default)]
    pub content_structure: ContentStructure,
    #[serde(default)]
    pub advantages: Lines,
    #[serde(default)]
    pub limitations: Lines,
}

#[derive(Deserialize, Debug, Default)]
pub(super) struct CompareResponse {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub websites: Vec<Website>,
}

/// The two analysed websites, in the order they were requested.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub first: Website,
    pub second: Website,
}

impl TryFrom<Vec<Website>> for Comparison {
    type Error = FetchError;

    fn try_from(websites: Vec<Website>) -> Result<Self, Self::Error> {
        let count = websites.len();
        let mut websites = websites.into_iter();
        match (websites.next(), websites.next()) {
            (Some(first), Some(second)) => Ok(Self { first, second }),
            _ => Err(FetchError::NotEnoughData(count)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn lines_accept_string_or_array() {
        let website: Website = serde_json::from_value(json!({
            "url": "https://a.example",
            "title": "A",
            "keyPoints": ["one", "two"],
            "uniqueFeatures": "just one",
            "contentStructure": {
                "introduction": "intro",
                "mainContent": ["part one", "part two"],
                "conclusion": null
            },
            "advantages": [],
        }))
        .unwrap();

        assert_eq!(website.key_points.0, vec!["one", "two"]);
        assert_eq!(website.unique_features.0, vec!["just one"]);
        assert_eq!(website.content_structure.introduction.joined(), "intro");
        assert_eq!(
            website.content_structure.main_content.joined(),
            "part one part two"
        );
        assert!(website.content_structure.conclusion.is_empty());
        assert!(website.advantages.is_empty());
        // missing entirely
        assert!(website.limitations.is_empty());
    }

    #[test]
    fn extra_websites_are_ignored() {
        let websites = vec![
            Website {
                title: "A".to_string(),
                ..Default::default()
            },
            Website {
                title: "B".to_string(),
                ..Default::default()
            },
            Website {
                title: "C".to_string(),
                ..Default::default()
            },
        ];
        let comparison = Comparison::try_from(websites).unwrap();
        assert_eq!(comparison.first.title, "A");
        assert_eq!(comparison.second.title, "B");
    }

    #[test]
    fn missing_websites_is_not_enough_data() {
        let res: CompareResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            Comparison::try_from(res.websites),
            Err(FetchError::NotEnoughData(0))
        ));
    }
}
