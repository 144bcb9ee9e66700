use crate::creature::CreatureInst;

/// Damage dealt by `attacker` to `defender` in a single exchange.
///
/// The attacker's effective attack (level * 0.1 growth) is reduced by the
/// defender's defense factor (level * 0.05 growth). Never less than 1, so every
/// exchange makes progress.
pub fn calculate_damage(attacker: &CreatureInst, defender: &CreatureInst) -> u32 {
    attacker
        .effective_attack()
        .saturating_sub(defender.defense_factor())
        .max(1)
}

/// Whether the enemy is weak enough for a capture item: strictly below
/// `threshold` of its max HP.
pub fn is_capture_eligible(enemy: &CreatureInst, threshold: f64) -> bool {
    (enemy.current_hp() as f64) < enemy.max_hp() as f64 * threshold
}
