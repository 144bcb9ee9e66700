use crate::battle::calculators::{calculate_damage, is_capture_eligible};
use crate::battle::catch::{calculate_catch_rate, can_attempt_catch, roll_catch_success};
use crate::battle::state::{
    BattleEvent, BattleOutcome, BattlePhase, BattleReport, BattleState, EventBus, PlayerAction,
    Side, TurnRng,
};
use crate::config::GameConfig;
use crate::creature::CreatureInst;
use crate::errors::{BattleError, BattleResult, GameResult};
use crate::player::{Inventory, Team};
use crate::registry::{get_item_data, get_zone_data};
use schema::{ItemEffect, ItemId, ZoneId};
use tracing::{debug, info, warn};

/// Roll a wild encounter for `zone` and open a battle against it.
///
/// Consumes two draws: the species index, then the level offset.
pub fn start_battle(
    zone_id: ZoneId,
    trainer_name: &str,
    team: &Team,
    config: &GameConfig,
    rng: &mut TurnRng,
    event_bus: &mut EventBus,
) -> GameResult<BattleState> {
    let zone = get_zone_data(zone_id)?;
    if team.is_empty() {
        return Err(BattleError::EmptyTeam.into());
    }

    let species_index = rng.next_index(zone.monsters.len(), "wild species");
    let species = zone.monsters[species_index];
    let level_offset = rng.next_index(config.enemy_level_spread as usize + 1, "wild level");
    let enemy = CreatureInst::from_species(species, zone.level + level_offset as u32)?;

    Ok(start_battle_against(
        zone_id,
        enemy,
        trainer_name,
        team,
        config,
        event_bus,
    )?)
}

/// Open a battle against a specific enemy. The first team member fights.
pub fn start_battle_against(
    zone: ZoneId,
    enemy: CreatureInst,
    trainer_name: &str,
    team: &Team,
    config: &GameConfig,
    event_bus: &mut EventBus,
) -> BattleResult<BattleState> {
    let mut player = team.lead().cloned().ok_or(BattleError::EmptyTeam)?;
    // A stored HP of zero is treated as "never set".
    if player.current_hp() == 0 {
        player.restore_full_hp();
    }

    info!(
        %zone,
        enemy = %enemy.species,
        enemy_level = enemy.level,
        player = %player.species,
        "battle started"
    );
    event_bus.push(BattleEvent::BattleStarted {
        zone,
        enemy: enemy.species,
        enemy_name: enemy.name.clone(),
        level: enemy.level,
    });
    event_bus.push(BattleEvent::CreatureSentOut {
        trainer: trainer_name.to_string(),
        name: player.name.clone(),
    });

    Ok(BattleState {
        zone,
        trainer_name: trainer_name.to_string(),
        enemy,
        player,
        player_team_index: 0,
        phase: BattlePhase::PlayerTurn,
        can_capture: false,
        capture_threshold: config.capture_threshold,
        team_has_room: !team.is_full(),
        turn_number: 1,
        captured: None,
    })
}

fn require_phase(
    battle_state: &BattleState,
    expected: BattlePhase,
    action: &'static str,
) -> BattleResult<()> {
    if battle_state.phase != expected {
        warn!(action, phase = %battle_state.phase, "action rejected");
        return Err(BattleError::InvalidTurn {
            action,
            phase: battle_state.phase,
        });
    }
    Ok(())
}

fn resolve(battle_state: &mut BattleState, outcome: BattleOutcome, event_bus: &mut EventBus) {
    battle_state.phase = BattlePhase::Resolved(outcome);
    info!(%outcome, turns = battle_state.turn_number, "battle resolved");
    event_bus.push(BattleEvent::BattleEnded { outcome });
}

fn hand_turn_to_enemy(battle_state: &mut BattleState) {
    battle_state.phase = BattlePhase::EnemyTurn;
    debug!(turn = battle_state.turn_number, "enemy turn pending");
}

/// Refresh the capture flag after the enemy lost HP.
fn update_capture_eligibility(battle_state: &mut BattleState, event_bus: &mut EventBus) {
    let was_eligible = battle_state.can_capture;
    battle_state.can_capture =
        is_capture_eligible(&battle_state.enemy, battle_state.capture_threshold);
    if battle_state.can_capture && !was_eligible {
        event_bus.push(BattleEvent::CaptureUnlocked {
            name: battle_state.enemy.name.clone(),
        });
    }
}

/// The player's creature attacks. A knockout ends the battle at once;
/// otherwise the enemy moves next.
pub fn attack(battle_state: &mut BattleState, event_bus: &mut EventBus) -> BattleResult<()> {
    require_phase(battle_state, BattlePhase::PlayerTurn, "attack")?;

    let damage = calculate_damage(&battle_state.player, &battle_state.enemy);
    let fainted = battle_state.enemy.apply_damage(damage);
    debug!(damage, enemy_hp = battle_state.enemy.current_hp(), "player attack");

    event_bus.push(BattleEvent::DamageDealt {
        attacker: Side::Player,
        attacker_name: battle_state.player.name.clone(),
        target_name: battle_state.enemy.name.clone(),
        damage,
        remaining_hp: battle_state.enemy.current_hp(),
    });

    if fainted {
        event_bus.push(BattleEvent::CreatureFainted {
            side: Side::Enemy,
            name: battle_state.enemy.name.clone(),
        });
        resolve(battle_state, BattleOutcome::Victory, event_bus);
        return Ok(());
    }

    update_capture_eligibility(battle_state, event_bus);
    hand_turn_to_enemy(battle_state);
    Ok(())
}

/// The wild creature's reply. Callable only while the enemy holds the turn.
pub fn enemy_turn(battle_state: &mut BattleState, event_bus: &mut EventBus) -> BattleResult<()> {
    require_phase(battle_state, BattlePhase::EnemyTurn, "enemy turn")?;

    let damage = calculate_damage(&battle_state.enemy, &battle_state.player);
    let fainted = battle_state.player.apply_damage(damage);
    debug!(damage, player_hp = battle_state.player.current_hp(), "enemy attack");

    event_bus.push(BattleEvent::DamageDealt {
        attacker: Side::Enemy,
        attacker_name: battle_state.enemy.name.clone(),
        target_name: battle_state.player.name.clone(),
        damage,
        remaining_hp: battle_state.player.current_hp(),
    });

    if fainted {
        event_bus.push(BattleEvent::CreatureFainted {
            side: Side::Player,
            name: battle_state.player.name.clone(),
        });
        resolve(battle_state, BattleOutcome::Defeat, event_bus);
        return Ok(());
    }

    battle_state.phase = BattlePhase::PlayerTurn;
    battle_state.turn_number += 1;
    Ok(())
}

/// Use an item from `inventory` on the player's turn.
///
/// Nothing is consumed when the action is rejected. Once accepted the item is
/// spent exactly once, whatever the effect's result.
pub fn use_item(
    battle_state: &mut BattleState,
    item_id: ItemId,
    inventory: &mut Inventory,
    rng: &mut TurnRng,
    event_bus: &mut EventBus,
) -> GameResult<()> {
    require_phase(battle_state, BattlePhase::PlayerTurn, "use item")?;
    let item = get_item_data(item_id)?;

    if item.effect.is_capture() {
        can_attempt_catch(battle_state)?;
    }
    if !inventory.take_one(item_id) {
        warn!(item = %item_id, "item use rejected, none left");
        return Err(BattleError::InsufficientInventory(item_id).into());
    }
    event_bus.push(BattleEvent::ItemUsed {
        trainer: battle_state.trainer_name.clone(),
        item: item_id,
        item_name: item.name.clone(),
    });

    match item.effect {
        ItemEffect::Heal(amount) => {
            let healed = battle_state.player.heal(amount);
            debug!(item = %item_id, healed, "heal item used");
            event_bus.push(BattleEvent::CreatureHealed {
                name: battle_state.player.name.clone(),
                amount: healed,
                new_hp: battle_state.player.current_hp(),
            });
            hand_turn_to_enemy(battle_state);
        }
        ItemEffect::Capture(item_rate) => {
            let catch_rate = calculate_catch_rate(&battle_state.enemy, item_rate);
            event_bus.push(BattleEvent::CaptureAttempted {
                name: battle_state.enemy.name.clone(),
                catch_rate,
            });

            if roll_catch_success(catch_rate, rng) {
                let captured = battle_state.enemy.captured_copy();
                event_bus.push(BattleEvent::CaptureSucceeded {
                    name: captured.name.clone(),
                });
                if !battle_state.team_has_room {
                    event_bus.push(BattleEvent::TeamFull {
                        name: captured.name.clone(),
                    });
                }
                battle_state.captured = Some(captured);
                resolve(battle_state, BattleOutcome::Capture, event_bus);
            } else {
                debug!(catch_rate, "capture failed");
                event_bus.push(BattleEvent::CaptureFailed {
                    name: battle_state.enemy.name.clone(),
                });
                hand_turn_to_enemy(battle_state);
            }
        }
    }

    Ok(())
}

/// Run one full exchange: the player's action, then the enemy's reply if the
/// battle is still going. Returns the narration for both halves.
pub fn take_turn(
    battle_state: &mut BattleState,
    action: PlayerAction,
    inventory: &mut Inventory,
    rng: &mut TurnRng,
) -> GameResult<EventBus> {
    let mut event_bus = EventBus::new();

    match action {
        PlayerAction::Attack => attack(battle_state, &mut event_bus)?,
        PlayerAction::UseItem { item } => {
            use_item(battle_state, item, inventory, rng, &mut event_bus)?
        }
    }

    if battle_state.phase == BattlePhase::EnemyTurn {
        enemy_turn(battle_state, &mut event_bus)?;
    }

    Ok(event_bus)
}

/// Close a resolved battle and hand its results to the ledger.
pub fn finish(battle_state: BattleState) -> BattleResult<BattleReport> {
    let outcome = battle_state
        .phase
        .outcome()
        .ok_or(BattleError::BattleNotResolved)?;

    Ok(BattleReport {
        outcome,
        player_team_index: battle_state.player_team_index,
        final_player: battle_state.player,
        captured: battle_state.captured,
    })
}
