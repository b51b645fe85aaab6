use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column defaults
// ---------------------------------------------------------------------------

/// Priority used when the column is absent or a cell is not a number.
pub const DEFAULT_PRIORITY: i64 = 3;

/// Eats flag used when the column is absent or a cell is not a number.
/// `1` marks a food row, `0` an activity row.
pub const DEFAULT_EATS: i64 = 1;

/// Display fallback for empty Park / Location cells and absent string columns.
pub const NOT_LISTED: &str = "Not listed";

/// Display fallback for an empty Food cell.
pub const UNNAMED_ITEM: &str = "Unnamed Item";

/// The park options offered to the user.
pub const PARKS: [&str; 2] = ["Disneyland", "California Adventure"];

// ---------------------------------------------------------------------------
// Column – the fixed schema
// ---------------------------------------------------------------------------

/// Every column the loader understands. Unknown source columns are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Food,
    Price,
    Category,
    Location,
    Area,
    Park,
    Priority,
    Eats,
    Tried,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Food,
        Column::Price,
        Column::Category,
        Column::Location,
        Column::Area,
        Column::Park,
        Column::Priority,
        Column::Eats,
        Column::Tried,
    ];

    /// Canonical header text, as written by the spreadsheet export.
    pub fn header(self) -> &'static str {
        match self {
            Column::Food => "Food",
            Column::Price => "Price",
            Column::Category => "Category",
            Column::Location => "Location",
            Column::Area => "Area",
            Column::Park => "Park",
            Column::Priority => "Priority",
            Column::Eats => "Eats?",
            Column::Tried => "Tried",
        }
    }

    /// Resolve a header cell (already trimmed) to a column, ignoring case.
    pub fn from_header(name: &str) -> Option<Column> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("eats") {
            return Some(Column::Eats);
        }
        Column::ALL
            .into_iter()
            .find(|c| c.header().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ---------------------------------------------------------------------------
// FoodItem – one row of the dataset
// ---------------------------------------------------------------------------

/// A single menu entry (or activity, when `eats == 0`).
///
/// Values are already normalized: display strings are never empty except
/// `area`, which stays empty when the source cell was blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    #[serde(rename = "Food")]
    pub food: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Area")]
    pub area: String,
    #[serde(rename = "Park")]
    pub park: String,
    #[serde(rename = "Priority")]
    pub priority: i64,
    #[serde(rename = "Eats?")]
    pub eats: i64,
    #[serde(rename = "Tried")]
    pub tried: bool,
}

impl FoodItem {
    /// Case-insensitive substring test against the Park field.
    ///
    /// A row listed under "Disneyland / California Adventure" belongs to both.
    pub fn in_park(&self, park: &str) -> bool {
        self.park.to_lowercase().contains(&park.to_lowercase())
    }

    /// Whether this row is food (as opposed to an activity).
    pub fn is_eats(&self) -> bool {
        self.eats != 0
    }

    /// Area text for display; blank areas render as [`NOT_LISTED`].
    pub fn area_label(&self) -> &str {
        if self.area.is_empty() {
            NOT_LISTED
        } else {
            &self.area
        }
    }
}

impl fmt::Display for FoodItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} – ${:.2} @ {} ({}) [P{}]",
            self.food,
            self.price,
            self.location,
            self.area_label(),
            self.priority
        )
    }
}

// ---------------------------------------------------------------------------
// FoodTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An immutable snapshot of the loaded dataset, in source row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodTable {
    /// All rows.
    pub items: Vec<FoodItem>,
    /// Sorted set of all non-empty Area values.
    pub areas: BTreeSet<String>,
}

impl FoodTable {
    /// Build the area index from the loaded rows.
    pub fn from_items(items: Vec<FoodItem>) -> Self {
        let areas = items
            .iter()
            .filter(|it| !it.area.is_empty())
            .map(|it| it.area.clone())
            .collect();
        FoodTable { items, areas }
    }

    /// The table substituted when loading fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Selectable areas for a park: sorted, unique, blanks excluded.
    pub fn areas_for_park(&self, park: &str) -> Vec<String> {
        self.items
            .iter()
            .filter(|it| it.in_park(park) && !it.area.is_empty())
            .map(|it| it.area.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Priorities present in a park, ascending.
    pub fn priorities_for_park(&self, park: &str) -> Vec<i64> {
        self.items
            .iter()
            .filter(|it| it.in_park(park))
            .map(|it| it.priority)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(food: &str, area: &str, park: &str, priority: i64) -> FoodItem {
        FoodItem {
            food: food.to_string(),
            price: 1.0,
            category: "Snack".to_string(),
            location: NOT_LISTED.to_string(),
            area: area.to_string(),
            park: park.to_string(),
            priority,
            eats: DEFAULT_EATS,
            tried: false,
        }
    }

    #[test]
    fn header_lookup_ignores_case_and_accepts_eats_alias() {
        assert_eq!(Column::from_header(" priority "), Some(Column::Priority));
        assert_eq!(Column::from_header("Eats?"), Some(Column::Eats));
        assert_eq!(Column::from_header("eats"), Some(Column::Eats));
        assert_eq!(Column::from_header("Calories"), None);
    }

    #[test]
    fn shared_park_rows_match_both_parks() {
        let it = item("Churro", "", "Disneyland / California Adventure", 1);
        assert!(it.in_park("disneyland"));
        assert!(it.in_park("California Adventure"));
        assert!(!it.in_park("Epcot"));
    }

    #[test]
    fn blank_areas_are_not_selectable() {
        let table = FoodTable::from_items(vec![
            item("Pickle", "", "Disneyland", 3),
            item("Dole Whip", "Adventureland", "Disneyland", 2),
            item("Cocktail", "Pixar Pier", "California Adventure", 1),
            item("Beignets", "Adventureland", "Disneyland", 2),
        ]);

        assert_eq!(table.len(), 4);
        assert_eq!(table.areas_for_park("Disneyland"), vec!["Adventureland"]);
        assert_eq!(table.priorities_for_park("Disneyland"), vec![2, 3]);
        assert_eq!(table.areas.len(), 2);
        assert_eq!(table.items[0].area_label(), NOT_LISTED);
    }
}
