use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum ItemId {
    Potion,
    SuperPotion,
    MonsterBall,
}

/// What an item does when used in battle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Restores up to this many HP to the active creature.
    Heal(u32),
    /// Capture coefficient in (0, 1]; the effective rate also depends on the
    /// target's missing HP.
    Capture(f64),
}

impl ItemEffect {
    pub fn is_capture(&self) -> bool {
        matches!(self, ItemEffect::Capture(_))
    }

    pub fn description(&self) -> String {
        match self {
            ItemEffect::Heal(amount) => format!("Heals {} HP", amount),
            ItemEffect::Capture(_) => "Captures a weakened wild monster".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    pub price: u32,
    pub effect: ItemEffect,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_item_keys() {
        assert_eq!(ItemId::SuperPotion.as_ref(), "superPotion");
        assert_eq!(ItemId::from_str("monsterball"), Ok(ItemId::MonsterBall));
    }

    #[test]
    fn test_effect_descriptions() {
        assert_eq!(ItemEffect::Heal(20).description(), "Heals 20 HP");
        assert!(ItemEffect::Capture(0.3).is_capture());
        assert!(!ItemEffect::Heal(50).is_capture());
    }
}
