use crate::errors::RegistryResult;
use crate::registry::get_species_data;
use schema::{BaseStats, ElementType, SpeciesId, SpeciesTemplate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-level growth applied to HP, attack and defense.
const STAT_GROWTH_PER_LEVEL: f64 = 0.1;
/// Per-level growth of the defensive term used by the damage formula.
const DEFENSE_FACTOR_PER_LEVEL: f64 = 0.05;
/// Experience needed per level before the next one.
const EXP_PER_LEVEL: u32 = 100;

fn scale(base: u32, level: u32, per_level: f64) -> u32 {
    (base as f64 * (1.0 + level as f64 * per_level)).floor() as u32
}

/// Stat line shown in the team view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

/// A leveled creature belonging to a team or to a battle.
///
/// Base stats are copied from the species template so that battle math never
/// has to go back to the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureInst {
    pub species: SpeciesId,
    pub name: String,
    pub element: ElementType,
    pub glyph: String,
    pub base_stats: BaseStats,
    pub level: u32,
    pub exp: u32,
    current_hp: u32,
    max_hp: u32,
}

impl CreatureInst {
    /// Create a fresh creature at full HP with no experience.
    pub fn new(template: &SpeciesTemplate, level: u32) -> Self {
        let level = level.max(1);
        let max_hp = scale(template.base_stats.hp, level, STAT_GROWTH_PER_LEVEL);

        CreatureInst {
            species: template.id,
            name: template.name.clone(),
            element: template.element,
            glyph: template.glyph.clone(),
            base_stats: template.base_stats,
            level,
            exp: 0,
            current_hp: max_hp,
            max_hp,
        }
    }

    /// Look the species up in the registry and instantiate it.
    pub fn from_species(species: SpeciesId, level: u32) -> RegistryResult<Self> {
        let template = get_species_data(species)?;
        Ok(Self::new(template, level))
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Fraction of HP remaining, in [0, 1].
    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.current_hp as f64 / self.max_hp as f64
    }

    pub fn effective_attack(&self) -> u32 {
        scale(self.base_stats.attack, self.level, STAT_GROWTH_PER_LEVEL)
    }

    pub fn effective_defense(&self) -> u32 {
        scale(self.base_stats.defense, self.level, STAT_GROWTH_PER_LEVEL)
    }

    /// Defensive term subtracted from an incoming attack. Grows at half the
    /// rate of `effective_defense`.
    pub fn defense_factor(&self) -> u32 {
        scale(self.base_stats.defense, self.level, DEFENSE_FACTOR_PER_LEVEL)
    }

    /// Subtract HP, clamping at zero. Returns true if the creature fainted.
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        self.current_hp = self.current_hp.saturating_sub(amount);
        self.is_fainted()
    }

    /// Restore up to `amount` HP without exceeding max HP. Returns the amount
    /// actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.max_hp.saturating_sub(self.current_hp));
        self.current_hp += healed;
        healed
    }

    pub fn restore_full_hp(&mut self) {
        self.current_hp = self.max_hp;
    }

    /// Set HP directly, clamped to [0, max HP].
    pub fn set_hp(&mut self, hp: u32) {
        self.current_hp = hp.min(self.max_hp);
    }

    pub fn exp_to_next_level(&self) -> u32 {
        self.level * EXP_PER_LEVEL
    }

    pub fn display_stats(&self) -> DisplayStats {
        DisplayStats {
            hp: scale(self.base_stats.hp, self.level, STAT_GROWTH_PER_LEVEL),
            attack: self.effective_attack(),
            defense: self.effective_defense(),
            speed: self.base_stats.speed,
        }
    }

    /// Check a creature that came from outside the engine, such as a save file.
    pub fn validate(&self) -> Result<(), String> {
        if self.level == 0 {
            return Err(format!("{} has level 0", self.name));
        }
        let expected_max = scale(self.base_stats.hp, self.level, STAT_GROWTH_PER_LEVEL);
        if self.max_hp != expected_max {
            return Err(format!(
                "{} has max HP {} but level {} gives {}",
                self.name, self.max_hp, self.level, expected_max
            ));
        }
        if self.current_hp > self.max_hp {
            return Err(format!(
                "{} has {} HP, above its max of {}",
                self.name, self.current_hp, self.max_hp
            ));
        }
        Ok(())
    }

    /// A copy with full HP and no experience, as kept after a capture.
    pub fn captured_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.current_hp = copy.max_hp;
        copy.exp = 0;
        copy
    }
}

impl fmt::Display for CreatureInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} Lv.{} ({}) HP: {}/{}",
            self.glyph, self.name, self.level, self.element, self.current_hp, self.max_hp
        )?;

        if f.alternate() {
            let stats = self.display_stats();
            write!(
                f,
                "\nHP {}  ATK {}  DEF {}  SPD {}\nEXP: {} / {}",
                stats.hp,
                stats.attack,
                stats.defense,
                stats.speed,
                self.exp,
                self.exp_to_next_level()
            )?;
        }
        Ok(())
    }
}
