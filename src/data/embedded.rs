use super::loader::normalize_row;
use super::model::{Column, FoodTable};

/// Food, Price, Category, Location, Area, Park, Priority
type Row = (&'static str, f64, &'static str, &'static str, &'static str, &'static str, i64);

/// The built-in list, used when no network source is configured.
const ROWS: &[Row] = &[
    ("🫔 Breakfast Chimichanga", 7.49, "Breakfast", "Ship to Shore Marketplace", "Frontierland", "Disneyland", 1),
    ("🫓  fried Fried Pickle Chips (NOT SPEARS)", 5.79, "Snack", "Smokejumpers Grill", "Buena Vista Street / Grizzly Peak", "California Adventure", 1),
    ("🍿 Popcorn Bucket", 14.25, "Snack", "", "", "Disneyland / California Adventure", 1),
    ("🍪 Chocolate Chip Cookies", 6.79, "Snack", "Harbour Gallery", "New Orleans Square", "Disneyland", 1),
    ("Churro", 5.75, "Snack", "", "", "Disneyland / California Adventure", 1),
    ("🍍 Pineapple Upside Down Sundae", 8.49, "Snack", "Tropical Hideaway", "Adventureland", "Disneyland", 1),
    ("🥖 Cheesy Garlic Pretzel Bread", 7.99, "Snack", "Edelweiss Snacks", "Fantasyland", "Disneyland", 1),
    ("☕️ Black Caf Cold Brew", 7.29, "Drink", "Docking Bay 7", "Star Wars: Galaxy's Edge", "Disneyland", 1),
    ("🍹 Secret Menu Cocktails", 15.00, "Drink", "Lamplight Lounge", "Pixar Pier", "California Adventure", 1),
    ("🍟 Space Place Cottage Fries", 9.49, "Snack", "Galactic Grill", "Tomorrowland", "Disneyland", 1),
    ("🌯 Soyrizo Breakfast Burrito", 10.99, "Breakfast", "Galactic Grill", "Tomorrowland", "Disneyland", 2),
    ("🥨 Cream Cheese Jalapeno Pretzel", 7.5, "Snack", "Cart near Star Tours", "Tomorrowland", "Disneyland", 2),
    ("🥕 Rontoless Garden Wrap", 14.49, "Lunch", "Ronto Roasters", "Star Wars: Galaxy's Edge", "Disneyland", 2),
    ("🍨 Dole Whip", 6.49, "Snack", "Tropical Hideaway", "Adventureland", "Disneyland", 2),
    ("🥤 Mint Julep", 6.49, "Drink", "Mint Julep Bar", "New Orleans Square", "Disneyland", 2),
    ("🍩 Mickey Beignets", 6.99, "Snack", "Mint Julep Bar", "New Orleans Square", "Disneyland", 2),
    ("🍑 Peach Cobbler Funnel Cake Fries", 9.99, "Snack", "Hungry Bear Jamboree", "Bayou Country", "Disneyland", 2),
    ("🍌 Banana Split Churro", 7.5, "Snack", "Churro Cart near Goofys Sky School", "Paradise Gardens Park", "California Adventure", 2),
    ("🥒  Pickle", 4.49, "Snack", "", "", "Disneyland", 3),
    ("🍲 Corn Soup", 12.99, "Lunch", "Harbour Gallery", "New Orleans Square", "Disneyland", 3),
    ("🥟 Ithorian Garden Patty Bun", 10.99, "Lunch", "Docking Bay 7", "Star Wars: Galaxy's Edge", "Disneyland", 3),
    ("⛰️ Celebration Matterhorn Macaroon", 8.29, "Snack", "Jolly Holliday", "Main Street", "Disneyland", 3),
];

/// Build the built-in table through the same normalization as loaded files.
///
/// The literal table has no Eats or Tried columns, so every row is food and
/// untried.
pub fn embedded_table() -> FoodTable {
    let items = ROWS
        .iter()
        .enumerate()
        .map(|(row_no, &(food, price, category, location, area, park, priority))| {
            let price = price.to_string();
            let priority = priority.to_string();
            normalize_row(row_no + 1, |col| match col {
                Column::Food => Some(food),
                Column::Price => Some(price.as_str()),
                Column::Category => Some(category),
                Column::Location => Some(location),
                Column::Area => Some(area),
                Column::Park => Some(park),
                Column::Priority => Some(priority.as_str()),
                Column::Eats | Column::Tried => None,
            })
        })
        .collect();

    FoodTable::from_items(items)
}
