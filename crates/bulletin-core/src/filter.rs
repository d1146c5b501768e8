//! Filter engine: a pure mapping from the item list, filter state and
//! bookmark set to the ordered view.
//!
//! Stages run in a fixed order (bookmarks, ministry, chip, query). Each one
//! only narrows; surviving items keep their original relative order.

use crate::bookmarks::BookmarkSet;
use crate::catalog::{ALL, ChipId};
use crate::model::Item;

/// Ministry selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MinistryFilter {
    #[default]
    All,
    Named(String),
}

impl MinistryFilter {
    /// Parse a dropdown value; `"__all__"` and blank select everything.
    pub fn from_value(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL {
            MinistryFilter::All
        } else {
            MinistryFilter::Named(value.to_string())
        }
    }

    pub fn as_value(&self) -> &str {
        match self {
            MinistryFilter::All => ALL,
            MinistryFilter::Named(name) => name,
        }
    }
}

/// User-controlled filters. `chip: None` is the `"__all__"` chip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub ministry: MinistryFilter,
    pub chip: Option<ChipId>,
    pub query: String,
    pub bookmarks_only: bool,
}

impl FilterState {
    /// True when no stage would drop anything.
    pub fn is_default(&self) -> bool {
        self.ministry == MinistryFilter::All
            && self.chip.is_none()
            && self.query.trim().is_empty()
            && !self.bookmarks_only
    }
}

/// Positions in `items` that survive every stage, in original order.
pub fn view_indices(items: &[Item], filter: &FilterState, bookmarks: &BookmarkSet) -> Vec<usize> {
    let query = filter.query.trim().to_lowercase();

    items
        .iter()
        .enumerate()
        .filter(|(_, item)| !filter.bookmarks_only || bookmarks.contains(&item.prid))
        .filter(|(_, item)| match &filter.ministry {
            MinistryFilter::All => true,
            MinistryFilter::Named(name) => item.ministry == *name,
        })
        .filter(|(_, item)| filter.chip.is_none_or(|chip| matches_chip(item, chip)))
        .filter(|(_, item)| query.is_empty() || matches_query(item, &query))
        .map(|(idx, _)| idx)
        .collect()
}

/// The ordered view as borrowed items.
pub fn compute_view<'a>(
    items: &'a [Item],
    filter: &FilterState,
    bookmarks: &BookmarkSet,
) -> Vec<&'a Item> {
    view_indices(items, filter, bookmarks)
        .into_iter()
        .map(|idx| &items[idx])
        .collect()
}

/// Any keyword of the chip appears in title + snippet, case-insensitively.
pub fn matches_chip(item: &Item, chip: ChipId) -> bool {
    let haystack = format!("{} {}", item.title, item.snippet).to_lowercase();
    chip.keywords().iter().any(|kw| haystack.contains(kw))
}

/// `query` must already be trimmed and lowercased.
fn matches_query(item: &Item, query: &str) -> bool {
    [&item.title, &item.snippet, &item.ministry]
        .iter()
        .any(|field| field.to_lowercase().contains(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(prid: &str, ministry: &str, title: &str, snippet: &str) -> Item {
        Item {
            prid: prid.into(),
            ministry: ministry.into(),
            title: title.into(),
            snippet: snippet.into(),
            posted_on_raw: String::new(),
            source_url: String::new(),
            pdfs: Vec::new(),
        }
    }

    fn sample() -> Vec<Item> {
        vec![
            item("1", "Ministry of Finance", "Union Budget 2025", "Highlights of the budget"),
            item("2", "Ministry of Defence", "Navy commissions vessel", "INS vessel joins fleet"),
            item("3", "Ministry of Finance", "GST collections rise", "Monthly figures"),
            item("4", "Ministry of Railways", "New Vande Bharat route", "Train between cities"),
        ]
    }

    fn prids(view: &[&Item]) -> Vec<String> {
        view.iter().map(|i| i.prid.clone()).collect()
    }

    #[test]
    fn default_filter_is_identity() {
        let items = sample();
        let view = compute_view(&items, &FilterState::default(), &BookmarkSet::new());
        assert_eq!(prids(&view), ["1", "2", "3", "4"]);
    }

    #[test]
    fn ministry_filter_keeps_order() {
        let items = sample();
        let filter = FilterState {
            ministry: MinistryFilter::from_value("Ministry of Finance"),
            ..Default::default()
        };
        let view = compute_view(&items, &filter, &BookmarkSet::new());
        assert_eq!(prids(&view), ["1", "3"]);
    }

    #[test]
    fn ministry_match_is_exact() {
        let items = sample();
        let filter = FilterState {
            ministry: MinistryFilter::from_value("ministry of finance"),
            ..Default::default()
        };
        assert!(compute_view(&items, &filter, &BookmarkSet::new()).is_empty());
    }

    #[test]
    fn chip_matches_case_insensitive_substring() {
        let items = sample();
        let filter = FilterState {
            chip: Some(ChipId::Budget),
            ..Default::default()
        };
        let view = compute_view(&items, &filter, &BookmarkSet::new());
        assert_eq!(prids(&view), ["1", "3"]);
        assert!(matches_chip(&items[0], ChipId::Budget));
    }

    #[test]
    fn chip_looks_at_snippet_too() {
        let items = sample();
        let filter = FilterState {
            chip: Some(ChipId::Railways),
            ..Default::default()
        };
        assert_eq!(prids(&compute_view(&items, &filter, &BookmarkSet::new())), ["4"]);
    }

    #[test]
    fn query_is_trimmed_and_searches_ministry() {
        let items = sample();
        let filter = FilterState {
            query: "  DEFENCE ".into(),
            ..Default::default()
        };
        assert_eq!(prids(&compute_view(&items, &filter, &BookmarkSet::new())), ["2"]);

        let blank = FilterState {
            query: "   ".into(),
            ..Default::default()
        };
        assert_eq!(compute_view(&items, &blank, &BookmarkSet::new()).len(), 4);
    }

    #[test]
    fn bookmarks_only_tracks_the_set() {
        let items = sample();
        let filter = FilterState {
            bookmarks_only: true,
            ..Default::default()
        };
        let mut marks: BookmarkSet = ["2", "4"].into_iter().collect();
        assert_eq!(prids(&compute_view(&items, &filter, &marks)), ["2", "4"]);

        marks.toggle("4");
        assert_eq!(prids(&compute_view(&items, &filter, &marks)), ["2"]);
    }

    #[test]
    fn stages_compose() {
        let items = sample();
        let filter = FilterState {
            ministry: MinistryFilter::from_value("Ministry of Finance"),
            chip: Some(ChipId::Budget),
            query: "gst".into(),
            bookmarks_only: false,
        };
        assert_eq!(prids(&compute_view(&items, &filter, &BookmarkSet::new())), ["3"]);
    }

    #[test]
    fn all_sentinel_parses_to_all() {
        assert_eq!(MinistryFilter::from_value("__all__"), MinistryFilter::All);
        assert_eq!(MinistryFilter::from_value(""), MinistryFilter::All);
        assert_eq!(MinistryFilter::All.as_value(), "__all__");
    }
}
