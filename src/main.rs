//! Terminal version of Monster Adventure.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use monster_adventure::interface::{GameSession, HELP_TEXT};
use monster_adventure::registry::{get_species_data, parse_species_key};
use monster_adventure::{GameConfig, GameState, SaveManager, TurnRng};
use tracing::warn;
use tracing_subscriber::EnvFilter;

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, text: &str) -> AppResult<String> {
    print!("{}", text);
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(line?.trim().to_string()),
        None => Err("input closed".into()),
    }
}

/// Ask for a name and starter until both are valid.
fn create_game(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    config: &GameConfig,
) -> AppResult<GameState> {
    println!("Welcome to Monster Adventure!");
    loop {
        let name = prompt(lines, "What is your name? ")?;

        println!("Choose your starter:");
        for species in &config.starters {
            let template = get_species_data(*species)?;
            println!(
                "  {} {} ({}) - {}",
                template.glyph, template.name, species, template.element
            );
        }
        let choice = prompt(lines, "> ")?;
        let starter = match parse_species_key(&choice) {
            Ok(starter) => starter,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };

        match GameState::new_game(&name, starter, config) {
            Ok(game) => return Ok(game),
            Err(err) => println!("{}", err),
        }
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("monster_adventure=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = GameConfig::from_env()?;
    let saves = SaveManager::default_location()?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let loaded = if saves.exists() {
        match saves.load() {
            Ok(game) => Some(game),
            Err(err) => {
                println!("Your save could not be loaded ({}). Starting over.", err);
                None
            }
        }
    } else {
        None
    };
    let game = match loaded {
        Some(game) => {
            println!("Welcome back, {}!", game.player.name);
            game
        }
        None => {
            let game = create_game(&mut lines, &config)?;
            if let Err(err) = saves.save(&game) {
                warn!(%err, "autosave failed");
            }
            game
        }
    };

    let turn_delay = Duration::from_millis(config.turn_delay_ms);
    let mut session = GameSession::new(game, config, TurnRng::new_random());
    println!("{}", HELP_TEXT);
    println!("Also: save, reset, quit");

    loop {
        let input = match prompt(&mut lines, "\n> ") {
            Ok(input) => input,
            Err(_) => break,
        };

        match input.to_lowercase().as_str() {
            "" => continue,
            "quit" | "exit" => break,
            "save" => {
                match saves.save(session.game()) {
                    Ok(()) => println!("Game saved to {}", saves.path().display()),
                    Err(err) => println!("Could not save: {}", err),
                }
                continue;
            }
            "reset" => {
                if let Err(err) = saves.delete() {
                    warn!(%err, "could not delete the old save");
                }
                let game = create_game(&mut lines, session.config())?;
                if let Err(err) = saves.save(&game) {
                    warn!(%err, "autosave failed");
                }
                session = GameSession::new(game, session.config().clone(), TurnRng::new_random());
                continue;
            }
            _ => {}
        }

        match session.handle_command(&input) {
            Ok(text) => print!("{}", text),
            Err(err) => println!("{}", err),
        }
        if session.enemy_pending() {
            io::stdout().flush()?;
            thread::sleep(turn_delay);
            if let Some(reply) = session.enemy_reply() {
                print!("{}", reply);
            }
        }
        if session.battle().is_none() {
            if let Err(err) = saves.save(session.game()) {
                warn!(%err, path = %saves.path().display(), "autosave failed");
            }
        }
    }

    if let Err(err) = saves.save(session.game()) {
        println!("Could not save: {}", err);
    }
    println!("\nGoodbye!");
    Ok(())
}
