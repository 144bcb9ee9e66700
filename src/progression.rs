use crate::battle::state::{BattleOutcome, BattleReport};
use crate::config::{GameConfig, HpPersistence};
use crate::errors::{GameResult, LedgerError, LedgerResult};
use crate::registry::get_item_data;
use crate::session::GameState;
use schema::{ItemId, SpeciesId};
use tracing::{info, warn};

/// Where a captured creature ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFate {
    Added { slot: usize },
    TeamFull,
}

/// What applying a battle report changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerReport {
    pub outcome: BattleOutcome,
    /// HP written back to the fighting team member, if any.
    pub committed_hp: Option<u32>,
    pub capture: Option<(SpeciesId, CaptureFate)>,
}

/// Fold a finished battle back into the game.
///
/// Items were already spent during the battle, so only HP and captures are
/// applied here.
pub fn apply_battle_report(
    game: &mut GameState,
    report: BattleReport,
    config: &GameConfig,
) -> LedgerResult<LedgerReport> {
    let commit = report.outcome != BattleOutcome::Defeat
        && config.hp_persistence == HpPersistence::CommitOnExit;

    let committed_hp = if commit {
        let member = game.team.get_mut(report.player_team_index)?;
        member.set_hp(report.final_player.current_hp());
        Some(member.current_hp())
    } else {
        None
    };

    let capture = match report.captured {
        Some(creature) => {
            let species = creature.species;
            let fate = match game.team.add(creature) {
                Ok(slot) => CaptureFate::Added { slot },
                Err(LedgerError::TeamFull { capacity }) => {
                    warn!(%species, capacity, "team full, captured monster released");
                    CaptureFate::TeamFull
                }
                Err(err) => return Err(err),
            };
            Some((species, fate))
        }
        None => None,
    };

    info!(outcome = %report.outcome, ?committed_hp, ?capture, "battle report applied");
    Ok(LedgerReport {
        outcome: report.outcome,
        committed_hp,
        capture,
    })
}

/// Buy `quantity` of an item at its listed price.
pub fn buy_item(game: &mut GameState, item: ItemId, quantity: u32) -> GameResult<u32> {
    if quantity == 0 {
        return Err(LedgerError::InvalidQuantity.into());
    }
    let definition = get_item_data(item)?;
    let total = definition.price.saturating_mul(quantity);

    game.player.spend(total)?;
    game.inventory.add(item, quantity);
    info!(%item, quantity, total, money = game.player.money, "items bought");
    Ok(total)
}
