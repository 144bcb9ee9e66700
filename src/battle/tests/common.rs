use crate::battle::engine::start_battle_against;
use crate::battle::state::{BattleState, EventBus, TurnRng};
use crate::config::GameConfig;
use crate::creature::CreatureInst;
use crate::player::{Inventory, Team};
use schema::{ItemId, SpeciesId, ZoneId};

/// A builder for creating test creatures with common defaults.
///
/// # Example
/// ```ignore
/// let terrak = TestCreatureBuilder::new(SpeciesId::Terrak, 5)
///     .with_hp(10)
///     .build();
/// ```
pub struct TestCreatureBuilder {
    species: SpeciesId,
    level: u32,
    current_hp: Option<u32>,
}

impl TestCreatureBuilder {
    /// Creates a new builder for a given species and level.
    pub fn new(species: SpeciesId, level: u32) -> Self {
        Self {
            species,
            level,
            current_hp: None,
        }
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.current_hp = Some(hp);
        self
    }

    /// Builds the `CreatureInst`.
    pub fn build(self) -> CreatureInst {
        let mut creature = match CreatureInst::from_species(self.species, self.level) {
            Ok(creature) => creature,
            Err(err) => panic!("Failed to load species data for {:?}: {}", self.species, err),
        };
        if let Some(hp) = self.current_hp {
            creature.set_hp(hp);
        }
        creature
    }
}

/// A default-capacity team holding the given creatures in order.
pub fn create_test_team(members: Vec<CreatureInst>) -> Team {
    let mut team = Team::default();
    for creature in members {
        if let Err(err) = team.add(creature) {
            panic!("Test team overflow: {}", err);
        }
    }
    team
}

/// A full six-member team led by `lead`.
pub fn create_full_team(lead: CreatureInst) -> Team {
    let mut members = vec![lead];
    for _ in 1..6 {
        members.push(TestCreatureBuilder::new(SpeciesId::Aqualis, 2).build());
    }
    create_test_team(members)
}

/// The inventory every new game starts with.
pub fn starting_inventory() -> Inventory {
    Inventory::from(GameConfig::default().starting_inventory)
}

pub fn inventory_with(item: ItemId, count: u32) -> Inventory {
    let mut inventory = Inventory::new();
    inventory.add(item, count);
    inventory
}

/// Creates a 1v1 battle in the forest with default rules.
pub fn create_test_battle(player: CreatureInst, enemy: CreatureInst) -> BattleState {
    create_test_battle_with_team(create_test_team(vec![player]), enemy)
}

pub fn create_test_battle_with_team(team: Team, enemy: CreatureInst) -> BattleState {
    let mut event_bus = EventBus::new();
    match start_battle_against(
        ZoneId::Forest,
        enemy,
        "Sacha",
        &team,
        &GameConfig::default(),
        &mut event_bus,
    ) {
        Ok(state) => state,
        Err(err) => panic!("Failed to start test battle: {}", err),
    }
}

/// Creates a `TurnRng` with a long list of values that never pass a capture roll.
/// Useful for tests where the specific RNG outcome is not important.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![0.99; 100])
}
