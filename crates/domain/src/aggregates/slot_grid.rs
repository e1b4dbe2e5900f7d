//! SlotGrid aggregate - the fixed-capacity dashboard grid
//!
//! # Invariants
//!
//! - the grid always holds exactly [`SLOT_COUNT`] slots
//! - an item id occupies at most one slot
//! - a placed record's `slot` tag always equals the index holding it
//!
//! All mutations go through `place`/`remove`/`swap`/`reset`/`clear`; the
//! slot vector is never handed out mutably.

use serde::{Deserialize, Serialize};

use crate::entities::Item;
use crate::error::DomainError;
use crate::ids::ItemId;

/// Number of slots in the dashboard grid.
pub const SLOT_COUNT: usize = 48;

/// An item together with the slot it currently occupies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub item: Item,
    pub slot: usize,
}

/// Fixed-size ordered grid of optional placed items.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotGrid {
    slots: Vec<Option<PlacedItem>>,
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self::empty()
    }
}

impl SlotGrid {
    /// A grid with every slot empty.
    pub fn empty() -> Self {
        Self {
            slots: (0..SLOT_COUNT).map(|_| None).collect(),
        }
    }

    /// Rebuild a grid from per-slot rows, e.g. a persisted snapshot.
    ///
    /// Rows beyond [`SLOT_COUNT`] are dropped, missing rows read as empty,
    /// and a duplicated item id keeps its first occurrence only, so the
    /// result always satisfies the grid invariants regardless of input.
    pub fn hydrate<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = Option<Item>>,
    {
        let mut grid = Self::empty();
        for (slot, row) in rows.into_iter().take(SLOT_COUNT).enumerate() {
            if let Some(item) = row {
                if grid.find_slot_of(&item.id).is_none() {
                    grid.slots[slot] = Some(PlacedItem { item, slot });
                }
            }
        }
        grid
    }

    fn check(&self, slot: usize) -> Result<(), DomainError> {
        if slot >= SLOT_COUNT {
            return Err(DomainError::invalid_slot(slot, SLOT_COUNT));
        }
        Ok(())
    }

    /// Put an item into a slot, overwriting any occupant.
    ///
    /// If the same item id already sits in another slot, that slot is
    /// emptied first - the unique-placement invariant is maintained here,
    /// not by callers.
    pub fn place(&mut self, item: Item, slot: usize) -> Result<(), DomainError> {
        self.check(slot)?;
        if let Some(previous) = self.find_slot_of(&item.id) {
            if previous != slot {
                self.slots[previous] = None;
            }
        }
        self.slots[slot] = Some(PlacedItem { item, slot });
        Ok(())
    }

    /// Empty a slot, returning the evicted item. No-op if already empty.
    pub fn remove(&mut self, slot: usize) -> Result<Option<Item>, DomainError> {
        self.check(slot)?;
        Ok(self.slots[slot].take().map(|placed| placed.item))
    }

    /// Exchange the contents of two slots.
    ///
    /// `swap(a, a)` is a no-op; if one side is empty this degenerates to a
    /// move. Atomic from the caller's perspective - there is no transient
    /// state in which an item is visible in two slots.
    pub fn swap(&mut self, from: usize, to: usize) -> Result<(), DomainError> {
        self.check(from)?;
        self.check(to)?;
        if from == to {
            return Ok(());
        }
        self.slots.swap(from, to);
        if let Some(placed) = self.slots[from].as_mut() {
            placed.slot = from;
        }
        if let Some(placed) = self.slots[to].as_mut() {
            placed.slot = to;
        }
        Ok(())
    }

    /// Restore the default catalog placement.
    pub fn reset(&mut self) {
        *self = crate::catalog::default_placement();
    }

    /// Empty every slot.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The occupant of a slot; `None` for empty or out-of-range.
    pub fn get(&self, slot: usize) -> Option<&PlacedItem> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Indices of occupied slots, ascending.
    pub fn used_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|_| i))
            .collect()
    }

    /// Indices of empty slots, ascending.
    pub fn empty_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.is_none().then_some(i))
            .collect()
    }

    /// Linear scan for the slot holding an item id.
    pub fn find_slot_of(&self, id: &ItemId) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|placed| placed.item.id == *id))
    }

    /// Number of occupied slots.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Per-slot view of the grid, for building persisted snapshots.
    pub fn slots(&self) -> &[Option<PlacedItem>] {
        &self.slots
    }

    /// Iterator over the occupied slots.
    pub fn items(&self) -> impl Iterator<Item = &PlacedItem> {
        self.slots.iter().filter_map(|s| s.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Rarity;

    fn item(id: &str) -> Item {
        Item::new(
            ItemId::new(id).expect("valid id"),
            id.to_uppercase(),
            "*",
            Rarity::Common,
            "test",
        )
    }

    /// Invariant check: no two occupied slots share an item id, and every
    /// slot tag matches its index.
    fn assert_invariants(grid: &SlotGrid) {
        let mut seen = std::collections::HashSet::new();
        for (index, slot) in grid.slots().iter().enumerate() {
            if let Some(placed) = slot {
                assert_eq!(placed.slot, index, "slot tag must equal index");
                assert!(
                    seen.insert(placed.item.id.clone()),
                    "item {} placed twice",
                    placed.item.id
                );
            }
        }
    }

    #[test]
    fn test_place_then_find_agree() {
        let mut grid = SlotGrid::empty();
        for i in 0..SLOT_COUNT {
            let it = item(&format!("tool-{i}"));
            grid.place(it.clone(), i).expect("valid slot");
            assert_eq!(grid.get(i).map(|p| &p.item.id), Some(&it.id));
            assert_eq!(grid.find_slot_of(&it.id), Some(i));
        }
        assert_invariants(&grid);
    }

    #[test]
    fn test_place_out_of_range() {
        let mut grid = SlotGrid::empty();
        let err = grid.place(item("a"), SLOT_COUNT).expect_err("out of range");
        assert!(matches!(err, DomainError::InvalidSlot { slot: 48, max: 48 }));
    }

    #[test]
    fn test_place_moves_existing_id() {
        let mut grid = SlotGrid::empty();
        grid.place(item("a"), 3).expect("place");
        grid.place(item("a"), 7).expect("place");
        assert_eq!(grid.find_slot_of(&ItemId::new("a").expect("id")), Some(7));
        assert_eq!(grid.count(), 1);
        assert_invariants(&grid);
    }

    #[test]
    fn test_place_overwrites_occupant() {
        let mut grid = SlotGrid::empty();
        grid.place(item("a"), 3).expect("place");
        grid.place(item("b"), 3).expect("place");
        assert_eq!(grid.get(3).map(|p| p.item.id.as_str()), Some("b"));
        assert_eq!(grid.find_slot_of(&ItemId::new("a").expect("id")), None);
    }

    #[test]
    fn test_remove_is_total_on_valid_indices() {
        let mut grid = SlotGrid::empty();
        grid.place(item("a"), 5).expect("place");
        assert_eq!(
            grid.remove(5).expect("valid slot").map(|i| i.name),
            Some("A".to_string())
        );
        // removing an already-empty slot is a no-op
        assert_eq!(grid.remove(5).expect("valid slot"), None);
    }

    #[test]
    fn test_swap_scenario() {
        let mut grid = SlotGrid::empty();
        grid.place(item("a"), 5).expect("place");
        grid.place(item("b"), 10).expect("place");
        grid.swap(5, 10).expect("swap");
        assert_eq!(grid.get(5).map(|p| p.item.id.as_str()), Some("b"));
        assert_eq!(grid.get(10).map(|p| p.item.id.as_str()), Some("a"));
        assert_invariants(&grid);
    }

    #[test]
    fn test_swap_is_involution() {
        let mut grid = SlotGrid::empty();
        grid.place(item("a"), 2).expect("place");
        grid.place(item("b"), 40).expect("place");
        let before = grid.clone();
        grid.swap(2, 40).expect("swap");
        grid.swap(2, 40).expect("swap");
        assert_eq!(grid, before);
    }

    #[test]
    fn test_self_swap_is_noop() {
        let mut grid = SlotGrid::empty();
        grid.place(item("a"), 7).expect("place");
        let before = grid.clone();
        grid.swap(7, 7).expect("swap");
        assert_eq!(grid, before);
    }

    #[test]
    fn test_swap_into_empty_moves() {
        let mut grid = SlotGrid::empty();
        grid.place(item("a"), 0).expect("place");
        grid.swap(0, 47).expect("swap");
        assert_eq!(grid.get(0), None);
        assert_eq!(grid.get(47).map(|p| p.item.id.as_str()), Some("a"));
        assert_eq!(grid.get(47).map(|p| p.slot), Some(47));
        assert_invariants(&grid);
    }

    #[test]
    fn test_invariant_holds_across_mixed_sequence() {
        let mut grid = SlotGrid::empty();
        grid.place(item("a"), 0).expect("place");
        grid.place(item("b"), 1).expect("place");
        grid.place(item("c"), 2).expect("place");
        grid.swap(0, 2).expect("swap");
        grid.remove(1).expect("remove");
        grid.place(item("b"), 5).expect("place");
        grid.place(item("a"), 1).expect("place");
        grid.swap(1, 5).expect("swap");
        assert_invariants(&grid);
        assert_eq!(grid.count(), 3);
    }

    #[test]
    fn test_clear_and_counts() {
        let mut grid = SlotGrid::empty();
        grid.place(item("a"), 0).expect("place");
        grid.place(item("b"), 1).expect("place");
        assert_eq!(grid.used_slots(), vec![0, 1]);
        assert_eq!(grid.empty_slots().len(), SLOT_COUNT - 2);
        grid.clear();
        assert_eq!(grid.count(), 0);
        assert_eq!(grid.empty_slots().len(), SLOT_COUNT);
    }

    #[test]
    fn test_hydrate_drops_duplicates_and_tags_slots() {
        let rows = vec![Some(item("a")), None, Some(item("a")), Some(item("b"))];
        let grid = SlotGrid::hydrate(rows);
        assert_eq!(grid.count(), 2);
        assert_eq!(grid.find_slot_of(&ItemId::new("a").expect("id")), Some(0));
        assert_eq!(grid.find_slot_of(&ItemId::new("b").expect("id")), Some(3));
        assert_invariants(&grid);
    }

    #[test]
    fn test_reset_restores_default_placement() {
        let mut grid = SlotGrid::empty();
        grid.place(item("a"), 30).expect("place");
        grid.reset();
        assert_eq!(grid, crate::catalog::default_placement());
        assert!(grid.count() > 0);
    }
}
