//! Static registry of placeable tool items
//!
//! Read-only data: the catalog is the universe of tools the dashboard can
//! show. Placement state lives in [`SlotGrid`], never here.

use crate::aggregates::SlotGrid;
use crate::entities::{Item, Rarity};
use crate::ids::ItemId;

fn tool(id: &str, name: &str, icon: &str, rarity: Rarity, category: &str, blurb: &str) -> Item {
    // slugs in this table are non-empty literals
    let id = ItemId::new(id).expect("catalog slug");
    Item::new(id, name, icon, rarity, category).with_description(blurb)
}

/// Every placeable tool, in default placement order.
pub fn default_catalog() -> Vec<Item> {
    vec![
        tool(
            "pomodoro",
            "Pomodoro Timer",
            "\u{23F1}",
            Rarity::Common,
            "focus",
            "25-minute focus sprints with short breaks",
        ),
        tool(
            "todo-list",
            "Todo List",
            "\u{2705}",
            Rarity::Common,
            "planning",
            "Plain checklist for the day's tasks",
        ),
        tool(
            "kanban-board",
            "Kanban Board",
            "\u{1F4CB}",
            Rarity::Rare,
            "planning",
            "Columns for backlog, doing, and done",
        ),
        tool(
            "notes",
            "Quick Notes",
            "\u{1F4DD}",
            Rarity::Common,
            "capture",
            "Scratchpad that autosaves as you type",
        ),
        tool(
            "calendar",
            "Calendar",
            "\u{1F4C5}",
            Rarity::Rare,
            "planning",
            "Month view with day drill-down",
        ),
        tool(
            "habit-tracker",
            "Habit Tracker",
            "\u{1F501}",
            Rarity::Rare,
            "focus",
            "Daily streaks for recurring habits",
        ),
        tool(
            "ambient-mixer",
            "Ambient Mixer",
            "\u{1F3A7}",
            Rarity::Epic,
            "ambience",
            "Layered background soundscapes",
        ),
        tool(
            "focus-stats",
            "Focus Stats",
            "\u{1F4CA}",
            Rarity::Epic,
            "insight",
            "Charts of focus time and streaks",
        ),
        tool(
            "bookmarks",
            "Bookmarks",
            "\u{1F516}",
            Rarity::Common,
            "capture",
            "Pinned links for quick access",
        ),
        tool(
            "breathing",
            "Breathing Guide",
            "\u{1F32C}",
            Rarity::Legendary,
            "ambience",
            "Guided box-breathing intervals",
        ),
    ]
}

/// Look up a catalog item by slug.
pub fn find_item(id: &str) -> Option<Item> {
    default_catalog().into_iter().find(|item| item.id.as_str() == id)
}

/// Catalog items in a category, in default order.
pub fn items_in_category(category: &str) -> Vec<Item> {
    default_catalog()
        .into_iter()
        .filter(|item| item.category == category)
        .collect()
}

/// The starting grid: catalog items placed into the leading slots.
pub fn default_placement() -> SlotGrid {
    let mut grid = SlotGrid::empty();
    for (slot, item) in default_catalog().into_iter().enumerate() {
        // default_catalog is far smaller than the grid; ignore the
        // impossible overflow rather than panic
        if grid.place(item, slot).is_err() {
            break;
        }
    }
    grid
}
