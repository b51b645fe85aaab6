use std::collections::BTreeSet;

use serde::Deserialize;

use super::model::{FoodItem, FoodTable, PARKS};

// ---------------------------------------------------------------------------
// Selection: what the user asked to see
// ---------------------------------------------------------------------------

/// Ordering applied to the filtered rows. Always ascending and stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Price,
    Priority,
}

/// Filter criteria for [`select`].
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Case-insensitive substring matched against the Park field.
    pub park: String,
    /// Exact Area values to keep. Empty means no area constraint (show all).
    pub areas: BTreeSet<String>,
    /// Exact Priority to keep, if any.
    pub priority: Option<i64>,
    /// Exact Eats flag to keep, if any (1 = food, 0 = activities).
    pub eats: Option<i64>,
    pub sort: SortKey,
}

impl Selection {
    pub fn for_park(park: impl Into<String>) -> Self {
        Self {
            park: park.into(),
            areas: BTreeSet::new(),
            priority: None,
            eats: None,
            sort: SortKey::default(),
        }
    }

    /// Whether a single row passes every active criterion.
    pub fn matches(&self, item: &FoodItem) -> bool {
        item.in_park(&self.park)
            && (self.areas.is_empty() || self.areas.contains(&item.area))
            && self.priority.is_none_or(|p| item.priority == p)
            && self.eats.is_none_or(|e| item.eats == e)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::for_park(PARKS[0])
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Return indices of rows that pass all active filters, in sort order.
///
/// Ties keep source row order, so equal inputs always give equal output.
pub fn selected_indices(table: &FoodTable, selection: &Selection) -> Vec<usize> {
    let mut indices: Vec<usize> = table
        .items
        .iter()
        .enumerate()
        .filter(|(_, it)| selection.matches(it))
        .map(|(i, _)| i)
        .collect();

    let items = &table.items;
    match selection.sort {
        SortKey::Price => indices.sort_by(|&a, &b| items[a].price.total_cmp(&items[b].price)),
        SortKey::Priority => indices.sort_by_key(|&i| items[i].priority),
    }
    indices
}

/// The filtered, ordered rows. Does not modify `table`.
pub fn select<'a>(table: &'a FoodTable, selection: &Selection) -> Vec<&'a FoodItem> {
    selected_indices(table, selection)
        .into_iter()
        .map(|i| &table.items[i])
        .collect()
}
