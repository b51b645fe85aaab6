use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::data::cache::DatasetCache;
use crate::data::filter::{selected_indices, Selection, SortKey};
use crate::data::model::{FoodItem, FoodTable};
use crate::data::source::Fetch;

// ---------------------------------------------------------------------------
// Row identity
// ---------------------------------------------------------------------------

/// Identity of a row that survives reloads: its descriptive fields plus its
/// occurrence number among rows sharing them, so duplicates stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RowKey {
    food: String,
    location: String,
    park: String,
    area: String,
    nth: usize,
}

fn row_keys(table: &FoodTable) -> Vec<RowKey> {
    let mut seen: BTreeMap<(&str, &str, &str, &str), usize> = BTreeMap::new();
    table
        .items
        .iter()
        .map(|it| {
            let count = seen
                .entry((it.food.as_str(), it.location.as_str(), it.park.as_str(), it.area.as_str()))
                .or_insert(0);
            let nth = *count;
            *count += 1;
            RowKey {
                food: it.food.clone(),
                location: it.location.clone(),
                park: it.park.clone(),
                area: it.area.clone(),
                nth,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything one user has chosen, independent of rendering.
///
/// Lives for a single session and is never written back to the source.
pub struct Session {
    /// Current snapshot (empty until the first refresh, or after a failure).
    table: Arc<FoodTable>,

    /// Active filter criteria.
    pub selection: Selection,

    /// Indices of rows passing the current selection, in display order (cached).
    visible_indices: Vec<usize>,

    /// Identity of each row of `table`, by index.
    row_keys: Vec<RowKey>,

    /// Tried marks set during this session. They take precedence over the
    /// Tried column of the source.
    tried_overrides: BTreeMap<RowKey, bool>,

    /// One-time notices already shown.
    notices_shown: BTreeSet<String>,

    /// Status / error message for the user.
    pub status_message: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Selection::default())
    }
}

impl Session {
    pub fn new(selection: Selection) -> Self {
        Self {
            table: Arc::new(FoodTable::empty()),
            selection,
            visible_indices: Vec::new(),
            row_keys: Vec::new(),
            tried_overrides: BTreeMap::new(),
            notices_shown: BTreeSet::new(),
            status_message: None,
        }
    }

    /// Pull the (possibly cached) table.  On failure the session shows an
    /// empty table and a status message instead.
    pub fn refresh<F: Fetch>(&mut self, cache: &mut DatasetCache<F>) {
        match cache.load() {
            Ok(table) => {
                self.set_table(table);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", cache.source());
                self.set_table(Arc::new(FoodTable::empty()));
                self.status_message = Some(format!("Could not load the food list: {e}"));
            }
        }
    }

    /// User-triggered refresh: bypass the cache window.
    pub fn force_refresh<F: Fetch>(&mut self, cache: &mut DatasetCache<F>) {
        cache.reset();
        self.refresh(cache);
    }

    /// Ingest a snapshot, drop picks it no longer offers and recompute the
    /// visible rows.  An empty snapshot (failed load) keeps the picks so they
    /// apply again once loading recovers.
    pub fn set_table(&mut self, table: Arc<FoodTable>) {
        self.row_keys = row_keys(&table);
        self.table = table;
        if !self.table.is_empty() {
            self.prune_selection();
        }
        self.refilter();
    }

    pub fn table(&self) -> &FoodTable {
        &self.table
    }

    /// Recompute `visible_indices` after a selection change.
    pub fn refilter(&mut self) {
        self.visible_indices = selected_indices(&self.table, &self.selection);
    }

    /// Indices into [`table`](Self::table) of the visible rows, in display order.
    pub fn visible_indices(&self) -> &[usize] {
        &self.visible_indices
    }

    /// Rows currently passing the selection, in display order.
    pub fn visible_items(&self) -> Vec<&FoodItem> {
        self.visible_indices
            .iter()
            .map(|&i| &self.table.items[i])
            .collect()
    }

    // -- selection --

    /// Switch park; area and priority picks that do not exist there are dropped.
    pub fn set_park(&mut self, park: &str) {
        self.selection.park = park.to_string();
        self.prune_selection();
        self.refilter();
    }

    /// Drop area and priority picks the current park does not offer.
    fn prune_selection(&mut self) {
        let park = &self.selection.park;
        let areas: BTreeSet<String> = self.table.areas_for_park(park).into_iter().collect();
        self.selection.areas.retain(|a| areas.contains(a));
        if let Some(p) = self.selection.priority {
            if !self.table.priorities_for_park(park).contains(&p) {
                log::debug!("priority {p} not offered in {park}, clearing");
                self.selection.priority = None;
            }
        }
    }

    /// Selectable areas for the current park.
    pub fn area_options(&self) -> Vec<String> {
        self.table.areas_for_park(&self.selection.park)
    }

    /// Priorities present in the current park.
    pub fn priority_options(&self) -> Vec<i64> {
        self.table.priorities_for_park(&self.selection.park)
    }

    /// Toggle a single area in the selection.
    pub fn toggle_area(&mut self, area: &str) {
        if !self.selection.areas.remove(area) {
            self.selection.areas.insert(area.to_string());
        }
        self.refilter();
    }

    /// Select every area of the current park.
    pub fn select_all_areas(&mut self) {
        self.selection.areas = self.area_options().into_iter().collect();
        self.refilter();
    }

    /// Deselect all areas, which removes the area constraint.
    pub fn clear_areas(&mut self) {
        self.selection.areas.clear();
        self.refilter();
    }

    pub fn set_priority(&mut self, priority: Option<i64>) {
        self.selection.priority = priority;
        self.refilter();
    }

    /// Eats vs. activities tab.
    pub fn set_eats(&mut self, eats: Option<i64>) {
        self.selection.eats = eats;
        self.refilter();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.selection.sort = sort;
        self.refilter();
    }

    // -- tried marks --

    /// Whether the row at `index` of the current table is marked tried.
    pub fn is_tried(&self, index: usize) -> bool {
        let Some(item) = self.table.items.get(index) else {
            return false;
        };
        self.tried_overrides
            .get(&self.row_keys[index])
            .copied()
            .unwrap_or(item.tried)
    }

    /// Flip the tried mark of the row at `index` and return the new state,
    /// or `None` when the table has no such row.
    pub fn toggle_tried(&mut self, index: usize) -> Option<bool> {
        let key = self.row_keys.get(index)?.clone();
        let tried = !self.is_tried(index);
        self.tried_overrides.insert(key, tried);
        Some(tried)
    }

    /// (tried, total) over the visible rows.
    pub fn tried_progress(&self) -> (usize, usize) {
        let tried = self
            .visible_indices
            .iter()
            .filter(|&&i| self.is_tried(i))
            .count();
        (tried, self.visible_indices.len())
    }

    /// True the first time `key` is asked for in this session, false after.
    pub fn take_notice(&mut self, key: &str) -> bool {
        self.notices_shown.insert(key.to_string())
    }

    /// Forget every session choice; the loaded snapshot is kept.
    pub fn reset(&mut self) {
        let park = std::mem::take(&mut self.selection.park);
        let sort = self.selection.sort;
        self.selection = Selection {
            sort,
            ..Selection::for_park(park)
        };
        self.tried_overrides.clear();
        self.notices_shown.clear();
        self.status_message = None;
        self.refilter();
    }
}
