use crate::creature::CreatureInst;
use crate::errors::{LedgerError, LedgerResult};
use schema::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Largest roster any configuration may allow.
pub const MAX_TEAM_CAPACITY: usize = 6;
/// Default roster size.
pub const DEFAULT_TEAM_CAPACITY: usize = MAX_TEAM_CAPACITY;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    pub name: String,
    pub level: u32,
    pub money: u32,
    // Not awarded by battles yet; carried so saves keep it.
    pub exp: u32,
}

impl PlayerProfile {
    pub fn new(name: &str, money: u32) -> LedgerResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::InvalidPlayerName);
        }
        Ok(Self {
            name: name.to_string(),
            level: 1,
            money,
            exp: 0,
        })
    }

    /// Check a profile that came from a save file.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("trainer name is empty".to_string());
        }
        Ok(())
    }

    pub fn spend(&mut self, amount: u32) -> LedgerResult<()> {
        if amount > self.money {
            return Err(LedgerError::InsufficientFunds {
                needed: amount,
                available: self.money,
            });
        }
        self.money -= amount;
        Ok(())
    }
}

/// Item counts keyed by item id. Items with no entry have a count of zero.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    counts: BTreeMap<ItemId, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, item: ItemId) -> u32 {
        self.counts.get(&item).copied().unwrap_or(0)
    }

    pub fn add(&mut self, item: ItemId, quantity: u32) {
        let entry = self.counts.entry(item).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    /// Remove one unit. Returns false, leaving the inventory untouched, when
    /// there is none left.
    pub fn take_one(&mut self, item: ItemId) -> bool {
        match self.counts.get_mut(&item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.counts.iter().map(|(item, count)| (*item, *count))
    }
}

impl From<BTreeMap<ItemId, u32>> for Inventory {
    fn from(counts: BTreeMap<ItemId, u32>) -> Self {
        Self { counts }
    }
}

/// The player's ordered roster. The first member fights.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Team {
    members: Vec<CreatureInst>,
    capacity: usize,
}

impl Default for Team {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TEAM_CAPACITY)
    }
}

impl Team {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: Vec::new(),
            capacity,
        }
    }

    pub fn members(&self) -> &[CreatureInst] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    pub fn lead(&self) -> Option<&CreatureInst> {
        self.members.first()
    }

    pub fn get(&self, index: usize) -> Option<&CreatureInst> {
        self.members.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> LedgerResult<&mut CreatureInst> {
        self.members
            .get_mut(index)
            .ok_or(LedgerError::InvalidTeamIndex(index))
    }

    /// Append a creature. Returns its slot, or `TeamFull` at capacity.
    pub fn add(&mut self, creature: CreatureInst) -> LedgerResult<usize> {
        if self.is_full() {
            return Err(LedgerError::TeamFull {
                capacity: self.capacity,
            });
        }
        self.members.push(creature);
        Ok(self.members.len() - 1)
    }

    /// Check a roster that came from a save file: capacity within limits, no
    /// more members than it holds, every member consistent.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 || self.capacity > MAX_TEAM_CAPACITY {
            return Err(format!(
                "team capacity {} is outside 1..={}",
                self.capacity, MAX_TEAM_CAPACITY
            ));
        }
        if self.members.len() > self.capacity {
            return Err(format!(
                "team holds {} monsters but its capacity is {}",
                self.members.len(),
                self.capacity
            ));
        }
        self.members.iter().try_for_each(CreatureInst::validate)
    }

    /// Move a member to the front so it leads the next battle.
    pub fn set_lead(&mut self, index: usize) -> LedgerResult<()> {
        if index >= self.members.len() {
            return Err(LedgerError::InvalidTeamIndex(index));
        }
        let creature = self.members.remove(index);
        self.members.insert(0, creature);
        Ok(())
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.members.is_empty() {
            return write!(f, "No monsters on the team");
        }
        for (i, creature) in self.members.iter().enumerate() {
            let lead_marker = if i == 0 { " (Lead)" } else { "" };
            let detail = format!("{:#}", creature);
            let mut lines = detail.lines();
            if let Some(first_line) = lines.next() {
                writeln!(f, " {}. {}{}", i + 1, first_line, lead_marker)?;
            }
            for line in lines {
                writeln!(f, "    {}", line)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::TestCreatureBuilder;
    use pretty_assertions::assert_eq;
    use schema::SpeciesId;

    #[test]
    fn test_profile_rejects_blank_name() {
        assert_eq!(
            PlayerProfile::new("   ", 500),
            Err(LedgerError::InvalidPlayerName)
        );
        let profile = PlayerProfile::new(" Sacha ", 500).unwrap();
        assert_eq!(profile.name, "Sacha");
        assert_eq!(profile.level, 1);
    }

    #[test]
    fn test_spend_checks_balance() {
        let mut profile = PlayerProfile::new("Sacha", 100).unwrap();
        assert_eq!(profile.spend(60), Ok(()));
        assert_eq!(
            profile.spend(60),
            Err(LedgerError::InsufficientFunds {
                needed: 60,
                available: 40
            })
        );
        assert_eq!(profile.money, 40);
    }

    #[test]
    fn test_inventory_take_one_never_goes_negative() {
        let mut inventory = Inventory::new();
        inventory.add(ItemId::Potion, 1);
        assert!(inventory.take_one(ItemId::Potion));
        assert!(!inventory.take_one(ItemId::Potion));
        assert!(!inventory.take_one(ItemId::MonsterBall));
        assert_eq!(inventory.count(ItemId::Potion), 0);
    }

    #[test]
    fn test_team_capacity() {
        let mut team = Team::default();
        for expected_slot in 0..DEFAULT_TEAM_CAPACITY {
            let creature = TestCreatureBuilder::new(SpeciesId::Voltix, 3).build();
            assert_eq!(team.add(creature), Ok(expected_slot));
        }
        assert!(team.is_full());
        let extra = TestCreatureBuilder::new(SpeciesId::Voltix, 3).build();
        assert_eq!(team.add(extra), Err(LedgerError::TeamFull { capacity: 6 }));
        assert_eq!(team.len(), 6);
    }

    #[test]
    fn test_validate_team_bounds() {
        let mut team = Team::default();
        team.add(TestCreatureBuilder::new(SpeciesId::Flamby, 5).build())
            .unwrap();
        assert_eq!(team.validate(), Ok(()));

        let oversized = Team {
            members: vec![TestCreatureBuilder::new(SpeciesId::Voltix, 3).build(); 7],
            capacity: 7,
        };
        assert_eq!(
            oversized.validate(),
            Err("team capacity 7 is outside 1..=6".to_string())
        );

        let overfull = Team {
            members: vec![TestCreatureBuilder::new(SpeciesId::Voltix, 3).build(); 3],
            capacity: 2,
        };
        assert_eq!(
            overfull.validate(),
            Err("team holds 3 monsters but its capacity is 2".to_string())
        );
    }

    #[test]
    fn test_set_lead_reorders() {
        let mut team = Team::default();
        team.add(TestCreatureBuilder::new(SpeciesId::Flamby, 5).build())
            .unwrap();
        team.add(TestCreatureBuilder::new(SpeciesId::Glaceon, 2).build())
            .unwrap();
        team.set_lead(1).unwrap();
        assert_eq!(team.lead().map(|c| c.species), Some(SpeciesId::Glaceon));
        assert_eq!(team.set_lead(5), Err(LedgerError::InvalidTeamIndex(5)));
    }

    #[test]
    fn test_team_display_marks_lead() {
        let mut team = Team::default();
        assert_eq!(team.to_string(), "No monsters on the team");
        team.add(TestCreatureBuilder::new(SpeciesId::Flamby, 5).build())
            .unwrap();
        let text = team.to_string();
        assert!(text.contains("1. "));
        assert!(text.contains("(Lead)"));
        assert!(text.contains("EXP: 0 / 500"));
    }
}
