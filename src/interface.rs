//! Text front end shared by the terminal game and the MCP server.
//!
//! Every command returns the text to show. The enemy's reply is kept as a
//! separate step so a caller can pace it; `run_command` does both at once.

use crate::battle::catch::{calculate_catch_rate, get_catch_rate_description};
use crate::battle::engine::{attack, enemy_turn, finish, start_battle, use_item};
use crate::battle::state::{BattleOutcome, BattlePhase, BattleState, EventBus, TurnRng};
use crate::config::GameConfig;
use crate::errors::GameError;
use crate::player::{Inventory, PlayerProfile, Team};
use crate::progression::{apply_battle_report, buy_item, CaptureFate};
use crate::registry::{all_items, all_zones, get_species_data, parse_item_key, parse_zone_key};
use crate::session::GameState;
use schema::ItemEffect;
use tracing::debug;

pub const HELP_TEXT: &str = "Commands:
  status              - show your trainer profile
  zones               - list the areas you can explore
  team                - show your monsters
  lead <n>            - put team member n in front
  inventory           - show your items
  shop                - list item prices
  buy <item> <qty>    - buy items
  explore <zone>      - look for a wild monster
  attack              - attack the wild monster
  item <item>         - use an item in battle
  battle              - show the current battle";

/// Profile summary.
pub fn display_player_info(player: &PlayerProfile) -> String {
    format!(
        "--- Trainer ---\nName: {}\nLevel: {}\nMoney: {}\nEXP: {}",
        player.name, player.level, player.money, player.exp
    )
}

pub fn display_zones() -> String {
    let zones = match all_zones() {
        Ok(zones) => zones,
        Err(err) => return err.to_string(),
    };
    let mut output = String::from("--- Zones ---\n");
    for zone in zones {
        let names: Vec<&str> = zone
            .monsters
            .iter()
            .filter_map(|id| get_species_data(*id).ok())
            .map(|template| template.name.as_str())
            .collect();
        output.push_str(&format!(
            "  {} ({}) - Lv.{}+ - {}\n",
            zone.name,
            zone.id,
            zone.level,
            names.join(", ")
        ));
    }
    output
}

pub fn display_team(team: &Team) -> String {
    format!("--- Your Team ({}/{}) ---\n{}", team.len(), team.capacity(), team)
}

/// Every known item with its count and effect.
pub fn display_inventory(inventory: &Inventory) -> String {
    let items = match all_items() {
        Ok(items) => items,
        Err(err) => return err.to_string(),
    };
    let mut output = String::from("--- Inventory ---\n");
    for item in items {
        output.push_str(&format!(
            "  {} x{} - {}\n",
            item.name,
            inventory.count(item.id),
            item.effect.description()
        ));
    }
    output
}

pub fn display_shop() -> String {
    let items = match all_items() {
        Ok(items) => items,
        Err(err) => return err.to_string(),
    };
    let mut output = String::from("--- Shop ---\n");
    for item in items {
        output.push_str(&format!("  {} ({}) - {} coins\n", item.name, item.id, item.price));
    }
    output
}

pub fn display_battle_status(battle_state: &BattleState) -> String {
    let header = match battle_state.phase {
        BattlePhase::Resolved(BattleOutcome::Victory) => "Battle Over - You Won!",
        BattlePhase::Resolved(BattleOutcome::Defeat) => "Battle Over - You Lost!",
        BattlePhase::Resolved(BattleOutcome::Capture) => "Battle Over - Monster Captured!",
        _ => "Battle in Progress",
    };
    let mut output = format!("{}\n{}", header, battle_state);
    if battle_state.can_capture && !battle_state.is_over() {
        for item in all_items().unwrap_or_default() {
            if let ItemEffect::Capture(item_rate) = item.effect {
                let rate = calculate_catch_rate(&battle_state.enemy, item_rate);
                output.push_str(&format!(
                    "\n{} chance: {} ({:.0}%)",
                    item.name,
                    get_catch_rate_description(rate),
                    rate * 100.0
                ));
            }
        }
    }
    output
}

fn narrate(event_bus: &EventBus) -> String {
    let mut output = String::new();
    for line in event_bus.formatted_lines() {
        output.push_str(&line);
        output.push('\n');
    }
    output
}

/// One player's game plus the battle in progress, if any.
#[derive(Debug)]
pub struct GameSession {
    game: GameState,
    battle: Option<BattleState>,
    config: GameConfig,
    rng: TurnRng,
}

impl GameSession {
    pub fn new(game: GameState, config: GameConfig, rng: TurnRng) -> Self {
        Self {
            game,
            battle: None,
            config,
            rng,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn battle(&self) -> Option<&BattleState> {
        self.battle.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// True while the wild monster still has to answer the last action.
    pub fn enemy_pending(&self) -> bool {
        self.battle
            .as_ref()
            .is_some_and(|battle| battle.phase == BattlePhase::EnemyTurn)
    }

    /// Run one command. In battle this only performs the player's half of the
    /// exchange; see `enemy_reply`.
    pub fn handle_command(&mut self, input: &str) -> Result<String, String> {
        let mut parts = input.split_whitespace();
        let command = match parts.next() {
            Some(command) => command.to_lowercase(),
            None => return Err("Type 'help' to see the commands.".to_string()),
        };
        let args: Vec<&str> = parts.collect();
        debug!(%command, ?args, "command");

        match command.as_str() {
            "help" => Ok(HELP_TEXT.to_string()),
            "status" => Ok(display_player_info(&self.game.player)),
            "zones" => Ok(display_zones()),
            "team" => Ok(display_team(&self.game.team)),
            "inventory" | "bag" => Ok(display_inventory(&self.game.inventory)),
            "shop" => Ok(display_shop()),
            "battle" => match &self.battle {
                Some(battle) => Ok(display_battle_status(battle)),
                None => Err("You are not in a battle.".to_string()),
            },
            "lead" => self.set_lead(args.first().copied()),
            "buy" => self.buy(args.first().copied(), args.get(1).copied()),
            "explore" => match args.first() {
                Some(zone) => self.explore(zone),
                None => Err("Where do you want to go? (e.g., 'explore forest')".to_string()),
            },
            "attack" => self.attack(),
            "item" | "use" => match args.first() {
                Some(item) => self.use_item(item),
                None => Err("Which item? (e.g., 'item potion')".to_string()),
            },
            other => Err(format!(
                "Unknown command '{}'. Type 'help' to see the commands.",
                other
            )),
        }
    }

    /// `handle_command` followed by the enemy's reply when one is due.
    pub fn run_command(&mut self, input: &str) -> Result<String, String> {
        let mut output = self.handle_command(input)?;
        if let Some(reply) = self.enemy_reply() {
            output.push_str(&reply);
        }
        Ok(output)
    }

    /// Let the wild monster act if it holds the turn.
    pub fn enemy_reply(&mut self) -> Option<String> {
        let battle = self.battle.as_mut()?;
        let mut event_bus = EventBus::new();
        if let Err(err) = enemy_turn(battle, &mut event_bus) {
            debug!(%err, "no enemy reply due");
            return None;
        }
        let mut output = narrate(&event_bus);
        output.push_str(&self.settle_if_resolved());
        Some(output)
    }

    fn explore(&mut self, zone_key: &str) -> Result<String, String> {
        if self.battle.is_some() {
            return Err("You are already in a battle!".to_string());
        }
        let zone = parse_zone_key(zone_key).map_err(|e| e.to_string())?;
        let mut event_bus = EventBus::new();
        let battle = start_battle(
            zone,
            &self.game.player.name,
            &self.game.team,
            &self.config,
            &mut self.rng,
            &mut event_bus,
        )
        .map_err(|e| e.to_string())?;

        self.game.current_zone = Some(zone);
        let output = format!("{}\n{}", narrate(&event_bus), battle);
        self.battle = Some(battle);
        Ok(output)
    }

    fn attack(&mut self) -> Result<String, String> {
        let battle = self
            .battle
            .as_mut()
            .ok_or_else(|| "You are not in a battle.".to_string())?;
        let mut event_bus = EventBus::new();
        attack(battle, &mut event_bus).map_err(|e| e.to_string())?;

        let mut output = narrate(&event_bus);
        output.push_str(&self.settle_if_resolved());
        Ok(output)
    }

    fn use_item(&mut self, item_key: &str) -> Result<String, String> {
        let item = parse_item_key(item_key).map_err(|e| e.to_string())?;
        let battle = self
            .battle
            .as_mut()
            .ok_or_else(|| "Items can only be used in battle.".to_string())?;
        let mut event_bus = EventBus::new();
        use_item(
            battle,
            item,
            &mut self.game.inventory,
            &mut self.rng,
            &mut event_bus,
        )
        .map_err(|e| e.to_string())?;

        let mut output = narrate(&event_bus);
        output.push_str(&self.settle_if_resolved());
        Ok(output)
    }

    fn buy(&mut self, item_key: Option<&str>, quantity: Option<&str>) -> Result<String, String> {
        if self.battle.is_some() {
            return Err("The shop is closed during a battle.".to_string());
        }
        let item_key = item_key.ok_or_else(|| "Buy what? (e.g., 'buy potion 2')".to_string())?;
        let item = parse_item_key(item_key).map_err(|e| e.to_string())?;
        let quantity = match quantity {
            Some(text) => text
                .parse::<u32>()
                .map_err(|_| format!("'{}' is not a valid quantity.", text))?,
            None => 1,
        };
        let total = buy_item(&mut self.game, item, quantity).map_err(|e| e.to_string())?;
        Ok(format!(
            "Bought {} x{} for {} coins. Money left: {}",
            item, quantity, total, self.game.player.money
        ))
    }

    fn set_lead(&mut self, position: Option<&str>) -> Result<String, String> {
        if self.battle.is_some() {
            return Err("You cannot reorder your team during a battle.".to_string());
        }
        let position = position
            .and_then(|text| text.parse::<usize>().ok())
            .filter(|n| *n >= 1)
            .ok_or_else(|| "Give a team position, e.g. 'lead 2'.".to_string())?;
        self.game
            .team
            .set_lead(position - 1)
            .map_err(|e| GameError::from(e).to_string())?;
        Ok(display_team(&self.game.team))
    }

    /// Close a finished battle and apply its results to the game.
    fn settle_if_resolved(&mut self) -> String {
        if !self.battle.as_ref().is_some_and(BattleState::is_over) {
            return String::new();
        }
        let Some(battle) = self.battle.take() else {
            return String::new();
        };
        let captured_name = battle.captured.as_ref().map(|c| c.name.clone());

        let report = match finish(battle) {
            Ok(report) => report,
            Err(err) => return format!("{}\n", err),
        };
        let ledger = match apply_battle_report(&mut self.game, report, &self.config) {
            Ok(ledger) => ledger,
            Err(err) => return format!("{}\n", err),
        };

        let mut output = String::new();
        if let (Some((_, CaptureFate::Added { slot })), Some(name)) =
            (ledger.capture, captured_name)
        {
            output.push_str(&format!("{} joined your team in slot {}!\n", name, slot + 1));
        }
        if ledger.outcome == BattleOutcome::Defeat {
            output.push_str("Your monster needs rest. Its HP was not changed.\n");
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_full_team, create_test_battle, TestCreatureBuilder};
    use pretty_assertions::assert_eq;
    use schema::{ItemId, SpeciesId, ZoneId};

    fn session(draws: Vec<f64>) -> GameSession {
        let config = GameConfig::default();
        let game = GameState::new_game("Sacha", SpeciesId::Flamby, &config).unwrap();
        GameSession::new(game, config, TurnRng::new_for_test(draws))
    }

    #[test]
    fn test_info_views() {
        let mut session = session(vec![]);
        let status = session.handle_command("status").unwrap();
        assert!(status.contains("Name: Sacha"));
        assert!(status.contains("Money: 500"));

        let zones = session.handle_command("zones").unwrap();
        assert!(zones.contains("Mystic Forest (forest) - Lv.1+ - Flamby, Terrak, Glaceon"));

        let team = session.handle_command("team").unwrap();
        assert!(team.contains("(1/6)"));
        assert!(team.contains("ATK 18"));

        let inventory = session.handle_command("inventory").unwrap();
        assert!(inventory.contains("Potion x3 - Heals 20 HP"));
        assert!(inventory.contains("Monster Ball x5 - Captures a weakened wild monster"));
    }

    #[test]
    fn test_unknown_and_empty_commands() {
        let mut session = session(vec![]);
        assert!(session.handle_command("dance").is_err());
        assert!(session.handle_command("   ").is_err());
        assert!(session.handle_command("attack").is_err());
        assert_eq!(
            session.handle_command("explore volcano"),
            Err("Unknown zone 'volcano'".to_string())
        );
    }

    #[test]
    fn test_explore_then_fight_to_victory() {
        // Glaceon Lv.1 in the forest.
        let mut session = session(vec![0.99, 0.0]);
        let intro = session.handle_command("explore forest").unwrap();
        assert!(intro.contains("A wild Glaceon (Lv.1) appeared!"));
        assert_eq!(session.game().current_zone, Some(ZoneId::Forest));
        assert!(session.handle_command("explore lake").is_err());

        let mut rounds = 0;
        while session.battle().is_some() {
            session.run_command("attack").unwrap();
            rounds += 1;
            assert!(rounds <= 10);
        }

        assert_eq!(rounds, 6);
        assert_eq!(
            session.game().team.lead().map(|c| c.current_hp()),
            Some(62)
        );
    }

    #[test]
    fn test_enemy_reply_is_a_separate_step() {
        let mut session = session(vec![0.5, 0.5]);
        session.handle_command("explore forest").unwrap();
        session.handle_command("attack").unwrap();
        assert!(session.enemy_pending());
        assert!(session.handle_command("attack").is_err());

        let reply = session.enemy_reply().unwrap();
        assert!(reply.contains("Terrak deals"));
        assert!(!session.enemy_pending());
        assert_eq!(session.enemy_reply(), None);
    }

    #[test]
    fn test_item_command_uses_inventory() {
        let mut session = session(vec![0.5, 0.5]);
        session.handle_command("explore forest").unwrap();
        let text = session.run_command("item potion").unwrap();
        assert!(text.contains("Sacha uses Potion!"));
        assert_eq!(session.game().inventory.count(ItemId::Potion), 2);

        let rejected = session.handle_command("item monsterball").unwrap_err();
        assert_eq!(
            rejected,
            "Battle error: The wild monster is not weak enough to capture"
        );
        assert_eq!(session.game().inventory.count(ItemId::MonsterBall), 5);
    }

    #[test]
    fn test_capture_through_session_joins_team() {
        // Glaceon Lv.1 in the forest, then a ball that cannot miss.
        let mut session = session(vec![0.99, 0.0, 0.0]);
        session.handle_command("explore forest").unwrap();

        // Five hits of 9 take Glaceon from 52 to 7 HP, under the threshold.
        for _ in 0..5 {
            session.run_command("attack").unwrap();
        }
        let battle = session.battle().unwrap();
        assert_eq!(battle.enemy.current_hp(), 7);
        assert!(battle.can_capture);

        let text = session.run_command("item monsterBall").unwrap();

        assert!(text.contains("Glaceon was captured!"));
        assert!(text.contains("Glaceon joined your team in slot 2!"));
        assert!(session.battle().is_none());
        assert_eq!(session.game().inventory.count(ItemId::MonsterBall), 4);
        let team = &session.game().team;
        assert_eq!(team.len(), 2);
        assert_eq!(team.lead().map(|c| c.current_hp()), Some(62));
        let newcomer = team.get(1).unwrap();
        assert_eq!(newcomer.species, SpeciesId::Glaceon);
        assert_eq!(newcomer.current_hp(), 52);
        assert_eq!(newcomer.exp, 0);
    }

    #[test]
    fn test_session_debug_shows_battle() {
        let mut session = session(vec![0.5, 0.5]);
        session.handle_command("explore forest").unwrap();
        let dump = format!("{:?}", session);
        assert!(dump.starts_with("GameSession"));
        assert!(dump.contains("Terrak"));
    }

    #[test]
    fn test_shop_is_closed_during_battle() {
        let mut session = session(vec![0.5, 0.5]);
        session.handle_command("explore forest").unwrap();
        assert_eq!(
            session.handle_command("buy potion 1"),
            Err("The shop is closed during a battle.".to_string())
        );
        assert_eq!(session.game().player.money, 500);
        assert_eq!(session.game().inventory.count(ItemId::Potion), 3);
    }

    #[test]
    fn test_battle_status_shows_capture_chance() {
        let flamby = TestCreatureBuilder::new(SpeciesId::Flamby, 5).build();
        let aqualis = TestCreatureBuilder::new(SpeciesId::Aqualis, 10)
            .with_hp(20)
            .build();
        let mut battle_state = create_test_battle(flamby, aqualis);
        battle_state.can_capture = true;

        let status = display_battle_status(&battle_state);
        assert!(status.starts_with("Battle in Progress"));
        assert!(status.contains("Monster Ball chance: Fair (24%)"));
    }

    #[test]
    fn test_buy_and_lead_commands() {
        let mut session = session(vec![]);
        assert_eq!(
            session.handle_command("buy superpotion 2"),
            Ok("Bought superPotion x2 for 200 coins. Money left: 300".to_string())
        );
        assert!(session.handle_command("buy monsterBall 9").is_err());
        assert!(session.handle_command("buy potion lots").is_err());

        assert!(session.handle_command("lead 2").is_err());
        session.game.team = create_full_team(TestCreatureBuilder::new(SpeciesId::Flamby, 5).build());
        let team = session.handle_command("lead 2").unwrap();
        assert!(team.contains("1. 💧 Aqualis"));
    }
}
