//! Item pools: validated, title-deduplicated item lists.

use std::collections::HashSet;

use animequiz_protocol::{Item, RawItem};

use crate::LobbyError;
use crate::error::ItemDefect;

/// The ordered, deduplicated set of items a lobby can reveal.
///
/// Built from the owner's submission at creation and extended by every
/// joiner's submission. Titles are the uniqueness key (case-sensitive);
/// the first occurrence wins and keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPool {
    items: Vec<Item>,
}

impl ItemPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pool from the owner's submission.
    ///
    /// # Errors
    /// Returns [`LobbyError::InvalidItem`] for the first malformed entry;
    /// no pool is produced.
    pub fn build(raw: &[RawItem], skip_leading: bool) -> Result<Self, LobbyError> {
        let mut pool = Self::new();
        pool.extend(raw, skip_leading)?;
        Ok(pool)
    }

    /// Appends a contributor's submission, skipping titles already present.
    ///
    /// All-or-nothing: every entry is validated before anything is added.
    /// Returns how many items were added.
    ///
    /// # Errors
    /// Returns [`LobbyError::InvalidItem`] for the first malformed entry;
    /// the pool is left unchanged.
    pub fn extend(&mut self, raw: &[RawItem], skip_leading: bool) -> Result<usize, LobbyError> {
        let accepted = validate(raw, skip_leading)?;

        let mut seen: HashSet<String> =
            self.items.iter().map(|item| item.title.clone()).collect();
        let before = self.items.len();
        for item in accepted {
            if seen.insert(item.title.clone()) {
                self.items.push(item);
            }
        }
        Ok(self.items.len() - before)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if an item with exactly this title is present.
    pub fn contains_title(&self, title: &str) -> bool {
        self.items.iter().any(|item| item.title == title)
    }
}

/// Validates every entry after the optional leading placeholder.
fn validate(raw: &[RawItem], skip_leading: bool) -> Result<Vec<Item>, LobbyError> {
    let skip = usize::from(skip_leading);
    raw.iter()
        .enumerate()
        .skip(skip)
        .map(|(index, entry)| {
            let title = non_empty(entry.title.as_deref()).ok_or(LobbyError::InvalidItem {
                index,
                defect: ItemDefect::MissingTitle,
            })?;
            let image = non_empty(entry.image.as_deref()).ok_or(LobbyError::InvalidItem {
                index,
                defect: ItemDefect::MissingImage,
            })?;
            Ok(Item::new(title, image))
        })
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
