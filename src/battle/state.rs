use crate::creature::CreatureInst;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::{ItemId, SpeciesId, ZoneId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Capture,
}

impl fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BattleOutcome::Victory => "victory",
            BattleOutcome::Defeat => "defeat",
            BattleOutcome::Capture => "capture",
        };
        write!(f, "{}", text)
    }
}

/// Whose move the battle is waiting for, or how it ended.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    PlayerTurn,
    EnemyTurn,
    Resolved(BattleOutcome),
}

impl BattlePhase {
    pub fn is_resolved(&self) -> bool {
        matches!(self, BattlePhase::Resolved(_))
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self {
            BattlePhase::Resolved(outcome) => Some(*outcome),
            _ => None,
        }
    }
}

impl fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattlePhase::PlayerTurn => write!(f, "the player's turn"),
            BattlePhase::EnemyTurn => write!(f, "the enemy's turn"),
            BattlePhase::Resolved(outcome) => write!(f, "a finished battle ({})", outcome),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Enemy,
}

/// The choices available to the player on their turn.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Attack,
    UseItem { item: ItemId },
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Attack => write!(f, "Attack"),
            PlayerAction::UseItem { item } => write!(f, "Use {}", item),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    BattleStarted {
        zone: ZoneId,
        enemy: SpeciesId,
        enemy_name: String,
        level: u32,
    },
    CreatureSentOut {
        trainer: String,
        name: String,
    },
    DamageDealt {
        attacker: Side,
        attacker_name: String,
        target_name: String,
        damage: u32,
        remaining_hp: u32,
    },
    CreatureFainted {
        side: Side,
        name: String,
    },
    /// The enemy dropped under the capture threshold for the first time.
    CaptureUnlocked {
        name: String,
    },
    ItemUsed {
        trainer: String,
        item: ItemId,
        item_name: String,
    },
    CreatureHealed {
        name: String,
        amount: u32,
        new_hp: u32,
    },
    CaptureAttempted {
        name: String,
        catch_rate: f64,
    },
    CaptureSucceeded {
        name: String,
    },
    CaptureFailed {
        name: String,
    },
    /// A capture succeeded but there was no room left on the team.
    TeamFull {
        name: String,
    },
    BattleEnded {
        outcome: BattleOutcome,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable line.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::BattleStarted {
                enemy_name, level, ..
            } => Some(format!("A wild {} (Lv.{}) appeared!", enemy_name, level)),
            BattleEvent::CreatureSentOut { trainer, name } => {
                Some(format!("{} sent out {}!", trainer, name))
            }
            BattleEvent::DamageDealt {
                attacker_name,
                damage,
                ..
            } => Some(format!("{} deals {} damage!", attacker_name, damage)),
            BattleEvent::CreatureFainted { name, .. } => Some(format!("{} fainted!", name)),
            BattleEvent::CaptureUnlocked { name } => {
                Some(format!("{} is weakened! It can be captured.", name))
            }
            BattleEvent::ItemUsed {
                trainer, item_name, ..
            } => Some(format!("{} uses {}!", trainer, item_name)),
            BattleEvent::CreatureHealed { name, amount, .. } => {
                Some(format!("{} recovered {} HP!", name, amount))
            }
            BattleEvent::CaptureAttempted { .. } => {
                None // Silent - the roll result follows immediately
            }
            BattleEvent::CaptureSucceeded { name } => Some(format!("{} was captured!", name)),
            BattleEvent::CaptureFailed { name } => Some(format!("{} broke free!", name)),
            BattleEvent::TeamFull { name } => Some(format!(
                "Your team is full, so {} could not join it.",
                name
            )),
            BattleEvent::BattleEnded { outcome } => Some(match outcome {
                BattleOutcome::Victory => "You won the battle!".to_string(),
                BattleOutcome::Defeat => "You lost the battle...".to_string(),
                BattleOutcome::Capture => "The battle is over.".to_string(),
            }),
        }
    }
}

/// Event bus for collecting battle narration in the order it happened.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Formatted text for every non-silent event, one entry per line.
    pub fn formatted_lines(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }

    /// Return true if the event bus contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the number of events in the bus.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl fmt::Display for EventBus {
    /// Shows debug format of all events.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Scripted { outcomes: Vec<f64>, index: usize },
    Live(StdRng),
}

/// Random source for encounter sampling and capture rolls.
///
/// Every draw is a uniform value in [0, 1). Tests script the exact sequence.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<f64>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    pub fn new_random() -> Self {
        Self {
            source: RngSource::Live(StdRng::from_os_rng()),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RngSource::Live(StdRng::seed_from_u64(seed)),
        }
    }

    /// Next uniform value in [0, 1).
    pub fn next_unit(&mut self, reason: &str) -> f64 {
        match &mut self.source {
            RngSource::Scripted { outcomes, index } => {
                if *index >= outcomes.len() {
                    panic!(
                        "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                        reason
                    );
                }
                let outcome = outcomes[*index];
                *index += 1;
                tracing::trace!(outcome, reason, "scripted rng draw");
                outcome
            }
            RngSource::Live(rng) => {
                let outcome: f64 = rng.random();
                tracing::trace!(outcome, reason, "rng draw");
                outcome
            }
        }
    }

    /// Uniform index in `0..len`. Returns 0 for an empty range.
    pub fn next_index(&mut self, len: usize, reason: &str) -> usize {
        if len == 0 {
            return 0;
        }
        let unit = self.next_unit(reason);
        ((unit * len as f64).floor() as usize).min(len - 1)
    }
}

/// One wild encounter, from the first turn to its outcome.
///
/// `player` is a working copy of a team member; the team itself is untouched
/// until the finished battle's report is applied.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleState {
    pub zone: ZoneId,
    pub trainer_name: String,
    pub enemy: CreatureInst,
    pub player: CreatureInst,
    pub player_team_index: usize,
    pub phase: BattlePhase,
    pub can_capture: bool,
    pub capture_threshold: f64,
    pub team_has_room: bool,
    pub turn_number: u32,
    pub captured: Option<CreatureInst>,
}

impl BattleState {
    pub fn is_over(&self) -> bool {
        self.phase.is_resolved()
    }
}

impl fmt::Display for BattleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Turn {} - {}", self.turn_number, self.phase)?;
        writeln!(f, "Wild {}", self.enemy)?;
        write!(f, "Your {}", self.player)?;
        if self.can_capture && !self.is_over() {
            write!(f, "\n(The wild monster can be captured)")?;
        }
        Ok(())
    }
}

/// What a finished battle hands back to the progression ledger.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    pub player_team_index: usize,
    pub final_player: CreatureInst,
    pub captured: Option<CreatureInst>,
}
