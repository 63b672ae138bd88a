use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A quantity of material in base units (grams).
pub type Quantity = u64;

// ---------------------------------------------------------------------------
// Item types
// ---------------------------------------------------------------------------

/// Symbolic identity of a kind of material ("IronOre", "Coal", ...).
///
/// Ordered lexicographically by name so that anything keyed by item type
/// iterates in a reproducible order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemType(String);

impl ItemType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ItemType {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Quantity formatting
// ---------------------------------------------------------------------------

const UNITS: [(Quantity, &str); 4] = [
    (1_000_000_000_000, "Mt"),
    (1_000_000_000, "kt"),
    (1_000_000, "t"),
    (1_000, "kg"),
];

/// Render a base-unit quantity with the largest unit it reaches.
///
/// Uses truncating division: `2_500_000` renders as `"2t"`, never `"3t"`.
pub fn format_quantity(quantity: Quantity) -> String {
    for (scale, unit) in UNITS {
        if quantity >= scale {
            return format!("{}{unit}", quantity / scale);
        }
    }
    format!("{quantity}g")
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised by inventory mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("insufficient {item} (have {available}, need {requested})")]
    InsufficientQuantity {
        item: ItemType,
        available: Quantity,
        requested: Quantity,
    },
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Mapping from item type to quantity.
///
/// Never stores a zero entry: removing the last unit of a type deletes it, so
/// a missing type and a zero quantity are indistinguishable to every query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Inventory {
    items: BTreeMap<ItemType, Quantity>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored quantity of `item`, zero when absent.
    pub fn quantity(&self, item: &ItemType) -> Quantity {
        self.items.get(item).copied().unwrap_or(0)
    }

    pub fn contains(&self, item: &ItemType) -> bool {
        self.items.contains_key(item)
    }

    pub fn contains_at_least(&self, item: &ItemType, quantity: Quantity) -> bool {
        self.quantity(item) >= quantity
    }

    /// True iff every entry of `requirement` is covered by this inventory.
    pub fn contains_at_least_all(&self, requirement: &Inventory) -> bool {
        requirement
            .iter()
            .all(|(item, quantity)| self.contains_at_least(item, quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct item types held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities across types.
    pub fn total(&self) -> Quantity {
        self.items.values().fold(0, |acc, q| acc.saturating_add(*q))
    }

    /// Entries in item-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemType, Quantity)> {
        self.items.iter().map(|(item, quantity)| (item, *quantity))
    }

    /// Item types present, in item-name order.
    pub fn item_types(&self) -> impl Iterator<Item = &ItemType> {
        self.items.keys()
    }

    /// Add `quantity` of `item`. Adding zero is a no-op.
    pub fn add(&mut self, item: ItemType, quantity: Quantity) {
        if quantity == 0 {
            return;
        }
        let entry = self.items.entry(item).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    /// Remove `quantity` of `item`, deleting the entry when it reaches zero.
    pub fn remove(&mut self, item: &ItemType, quantity: Quantity) -> Result<(), InventoryError> {
        let available = self.quantity(item);
        if available < quantity {
            return Err(InventoryError::InsufficientQuantity {
                item: item.clone(),
                available,
                requested: quantity,
            });
        }
        if quantity == 0 {
            return Ok(());
        }
        let remaining = available - quantity;
        if remaining == 0 {
            self.items.remove(item);
        } else {
            self.items.insert(item.clone(), remaining);
        }
        Ok(())
    }

    /// Add every entry of `amount`.
    pub fn add_all(&mut self, amount: &Inventory) {
        for (item, quantity) in amount.iter() {
            self.add(item.clone(), quantity);
        }
    }

    /// Remove every entry of `requirement`, or nothing at all.
    ///
    /// The whole batch is checked before the first mutation. On failure the
    /// error names the first (in item order) type that falls short and the
    /// inventory is left unchanged.
    pub fn remove_all(&mut self, requirement: &Inventory) -> Result<(), InventoryError> {
        if let Some((item, requested)) = requirement
            .iter()
            .find(|(item, quantity)| !self.contains_at_least(item, *quantity))
        {
            return Err(InventoryError::InsufficientQuantity {
                item: item.clone(),
                available: self.quantity(item),
                requested,
            });
        }
        for (item, quantity) in requirement.iter() {
            self.remove(item, quantity)?;
        }
        Ok(())
    }

    /// Move the entire stored quantity of `item` into `target`.
    ///
    /// Returns the amount moved, zero when the type was absent.
    pub fn transfer_all(&mut self, item: &ItemType, target: &mut Inventory) -> Quantity {
        match self.items.remove(item) {
            Some(quantity) => {
                target.add(item.clone(), quantity);
                quantity
            }
            None => 0,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl FromIterator<(ItemType, Quantity)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (ItemType, Quantity)>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for (item, quantity) in iter {
            inventory.add(item, quantity);
        }
        inventory
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (item, quantity)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}: {}", format_quantity(quantity))?;
        }
        Ok(())
    }
}
