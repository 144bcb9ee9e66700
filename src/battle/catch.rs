use crate::battle::calculators::is_capture_eligible;
use crate::battle::state::{BattleState, TurnRng};
use crate::creature::CreatureInst;
use crate::errors::BattleError;

/// Probability that a capture item with coefficient `item_rate` succeeds.
///
/// Scales linearly with the target's missing HP: 0 at full HP, `item_rate`
/// at 0 HP.
pub fn calculate_catch_rate(target: &CreatureInst, item_rate: f64) -> f64 {
    item_rate * (1.0 - target.hp_ratio())
}

/// Roll for catch success using the calculated catch rate.
/// Consumes exactly one draw.
pub fn roll_catch_success(catch_rate: f64, rng: &mut TurnRng) -> bool {
    let roll = rng.next_unit("catch roll");
    roll < catch_rate
}

/// Get a descriptive catch rate category for display purposes
pub fn get_catch_rate_description(catch_rate: f64) -> &'static str {
    match catch_rate {
        r if r >= 0.25 => "Good",
        r if r >= 0.15 => "Fair",
        r if r >= 0.05 => "Poor",
        _ => "Very Poor",
    }
}

/// Validate that the wild monster is weak enough for a capture item. Turn
/// order is checked by the caller.
pub fn can_attempt_catch(battle_state: &BattleState) -> Result<(), BattleError> {
    if !battle_state.can_capture
        || !is_capture_eligible(&battle_state.enemy, battle_state.capture_threshold)
    {
        return Err(BattleError::CaptureNotAllowed);
    }
    Ok(())
}
