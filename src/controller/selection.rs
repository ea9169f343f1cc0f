//! The up-to-two results picked for a side-by-side comparison.

use crate::backend::ResultItem;

pub const MAX_SELECTED: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedItem {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

impl From<&ResultItem> for SelectedItem {
    fn from(item: &ResultItem) -> Self {
        Self {
            title: item.title.clone(),
            snippet: item.snippet.clone(),
            link: item.link.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select two items for comparison.")]
    NeedTwoSelected,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonSelection {
    items: Vec<SelectedItem>,
}

impl ComparisonSelection {
    pub fn items(&self) -> &[SelectedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= MAX_SELECTED
    }

    pub fn contains(&self, link: &str) -> bool {
        self.items.iter().any(|item| item.link == link)
    }

    /// Deselect the item if it's already selected, otherwise select it. Does
    /// nothing if two other items are already selected.
    pub fn toggle(&mut self, item: SelectedItem) {
        if self.contains(&item.link) {
            self.items.retain(|selected| selected.link != item.link);
        } else if !self.is_full() {
            self.items.push(item);
        }
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    /// What to send to `/compare` for the current selection.
    pub fn comparison_target(&self) -> Result<ComparisonTarget, ValidationError> {
        match self.items.as_slice() {
            [first, second] => Ok(ComparisonTarget {
                url1: first.link.clone(),
                title1: first.title.clone(),
                url2: second.link.clone(),
                title2: second.title.clone(),
            }),
            _ => Err(ValidationError::NeedTwoSelected),
        }
    }
}

/// The parameters of the comparison view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonTarget {
    pub url1: String,
    pub title1: String,
    pub url2: String,
    pub title2: String,
}

impl ComparisonTarget {
    /// The address of the comparison view for these two items.
    pub fn href(&self) -> String {
        let params = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("url1", &self.url1)
            .append_pair("url2", &self.url2)
            .append_pair("title1", &self.title1)
            .append_pair("title2", &self.title2)
            .finish();
        format!("/compare-results?{params}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(link: &str) -> SelectedItem {
        SelectedItem {
            title: format!("title {link}"),
            snippet: format!("snippet {link}"),
            link: link.to_string(),
        }
    }

    #[test]
    fn toggle_twice_is_a_no_op() {
        let mut selection = ComparisonSelection::default();
        selection.toggle(item("a"));
        let before = selection.clone();

        selection.toggle(item("b"));
        selection.toggle(item("b"));
        assert_eq!(selection, before);

        selection.toggle(item("a"));
        assert!(selection.is_empty());
    }

    #[test]
    fn third_selection_is_ignored() {
        let mut selection = ComparisonSelection::default();
        selection.toggle(item("a"));
        selection.toggle(item("b"));
        selection.toggle(item("c"));

        let links: Vec<_> = selection.items().iter().map(|i| i.link.as_str()).collect();
        assert_eq!(links, vec!["a", "b"]);
        assert!(selection.is_full());
    }

    #[test]
    fn selected_item_can_be_removed_when_full() {
        let mut selection = ComparisonSelection::default();
        selection.toggle(item("a"));
        selection.toggle(item("b"));
        selection.toggle(item("a"));
        assert_eq!(selection.items(), &[item("b")]);
    }

    #[test]
    fn remove_by_index() {
        let mut selection = ComparisonSelection::default();
        selection.toggle(item("a"));
        selection.toggle(item("b"));

        selection.remove(5);
        assert_eq!(selection.len(), 2);

        selection.remove(0);
        assert_eq!(selection.items(), &[item("b")]);
    }

    #[test]
    fn comparison_needs_two_items() {
        let mut selection = ComparisonSelection::default();
        assert_eq!(
            selection.comparison_target(),
            Err(ValidationError::NeedTwoSelected)
        );
        selection.toggle(item("a"));
        assert_eq!(
            selection.comparison_target(),
            Err(ValidationError::NeedTwoSelected)
        );
        selection.toggle(item("b"));

        let target = selection.comparison_target().unwrap();
        assert_eq!(target.url1, "a");
        assert_eq!(target.title2, "title b");
    }

    #[test]
    fn comparison_href_is_encoded() {
        let target = ComparisonTarget {
            url1: "https://a.example/?x=1&y=2".to_string(),
            title1: "A & B".to_string(),
            url2: "https://b.example".to_string(),
            title2: "B".to_string(),
        };
        assert_eq!(
            target.href(),
            "/compare-results?url1=https%3A%2F%2Fa.example%2F%3Fx%3D1%26y%3D2\
             &url2=https%3A%2F%2Fb.example&title1=A+%26+B&title2=B"
        );
    }
}
