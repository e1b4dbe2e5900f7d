//! Item entity - placeable tools shown in the dashboard grid

use serde::{Deserialize, Serialize};

use crate::ids::ItemId;

/// How rare a tool is, for display emphasis only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
    /// Unknown rarity for forward compatibility
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Common => write!(f, "common"),
            Self::Rare => write!(f, "rare"),
            Self::Epic => write!(f, "epic"),
            Self::Legendary => write!(f, "legendary"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for Rarity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "common" => Ok(Self::Common),
            "rare" => Ok(Self::Rare),
            "epic" => Ok(Self::Epic),
            "legendary" => Ok(Self::Legendary),
            _ => Ok(Self::Unknown),
        }
    }
}

/// A tool that can occupy a slot in the dashboard grid
///
/// This is a data-carrying struct with no invariants to protect. All fields
/// are public because there's no invalid state that can be constructed - any
/// combination of values is valid. Items are immutable once catalogued;
/// placement state lives in the grid, not on the item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Glyph rendered in the grid cell
    pub icon: String,
    pub rarity: Rarity,
    /// Grouping label (e.g., "focus", "planning", "ambience")
    pub category: String,
    pub description: Option<String>,
}

impl Item {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        icon: impl Into<String>,
        rarity: Rarity,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            icon: icon.into(),
            rarity,
            category: category.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
