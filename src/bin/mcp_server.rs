//! Monster Adventure MCP Server
//!
//! A Model Context Protocol server built on the Rust SDK (rmcp) that exposes
//! the game for LLM interaction. Game text goes to stdout through the
//! transport; logs go to stderr.

use std::borrow::Cow;
use std::sync::{Arc, Mutex};

use monster_adventure::interface::{GameSession, HELP_TEXT};
use monster_adventure::registry::parse_species_key;
use monster_adventure::{GameConfig, GameState, TurnRng};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

type SharedSession = Arc<Mutex<Option<GameSession>>>;

const NO_GAME: &str = "No game is running. Use 'new_game' to begin.";

#[derive(Debug, Clone)]
pub struct MonsterAdventureService {
    tool_router: ToolRouter<MonsterAdventureService>,
    session: SharedSession,
    config: GameConfig,
}

// Tool request structures
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NewGameRequest {
    #[schemars(description = "Trainer name")]
    pub name: String,
    #[schemars(description = "Starter species key: 'flamby', 'aqualis' or 'terrak'")]
    pub starter: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExploreRequest {
    #[schemars(description = "Zone key: 'forest', 'lake' or 'mountain'")]
    pub zone: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UseItemRequest {
    #[schemars(description = "Item key: 'potion', 'superPotion' or 'monsterBall'")]
    pub item: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BuyRequest {
    #[schemars(description = "Item key to buy")]
    pub item: String,
    #[schemars(description = "How many to buy")]
    pub quantity: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CommandRequest {
    #[schemars(description = "A text command such as 'team' or 'lead 2'")]
    pub command: String,
}

fn internal_error(message: String) -> McpError {
    McpError {
        code: ErrorCode(-32603),
        message: Cow::from(message),
        data: None,
    }
}

#[tool_router]
impl MonsterAdventureService {
    pub fn new(config: GameConfig) -> Self {
        Self {
            tool_router: Self::tool_router(),
            session: Arc::new(Mutex::new(None)),
            config,
        }
    }

    /// Run a text command against the current game, enemy reply included.
    fn run(&self, command: &str) -> Result<CallToolResult, McpError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| internal_error("Game state lock poisoned".to_string()))?;
        let text = match guard.as_mut() {
            Some(session) => match session.run_command(command) {
                Ok(text) => text,
                Err(e) => format!("Error: {}", e),
            },
            None => NO_GAME.to_string(),
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Start a new game with a trainer name and a starter monster")]
    async fn new_game(
        &self,
        Parameters(request): Parameters<NewGameRequest>,
    ) -> Result<CallToolResult, McpError> {
        let starter = parse_species_key(&request.starter)
            .map_err(|e| internal_error(format!("Error starting game: {}", e)))?;
        let game = GameState::new_game(&request.name, starter, &self.config)
            .map_err(|e| internal_error(format!("Error starting game: {}", e)))?;
        let intro = format!(
            "Welcome, {}! {} joins your team.\n\n{}",
            game.player.name, starter, HELP_TEXT
        );

        let session = GameSession::new(game, self.config.clone(), TurnRng::new_random());
        *self
            .session
            .lock()
            .map_err(|_| internal_error("Game state lock poisoned".to_string()))? = Some(session);
        Ok(CallToolResult::success(vec![Content::text(intro)]))
    }

    #[tool(description = "Show the trainer profile")]
    async fn get_status(&self) -> Result<CallToolResult, McpError> {
        self.run("status")
    }

    #[tool(description = "List the zones that can be explored")]
    async fn list_zones(&self) -> Result<CallToolResult, McpError> {
        self.run("zones")
    }

    #[tool(description = "Show the monsters on your team")]
    async fn get_team(&self) -> Result<CallToolResult, McpError> {
        self.run("team")
    }

    #[tool(description = "Show your items and what they do")]
    async fn get_inventory(&self) -> Result<CallToolResult, McpError> {
        self.run("inventory")
    }

    #[tool(description = "Get the current battle state")]
    async fn get_battle_state(&self) -> Result<CallToolResult, McpError> {
        self.run("battle")
    }

    #[tool(description = "Explore a zone and meet a wild monster")]
    async fn explore(
        &self,
        Parameters(request): Parameters<ExploreRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(&format!("explore {}", request.zone))
    }

    #[tool(description = "Attack the wild monster")]
    async fn attack(&self) -> Result<CallToolResult, McpError> {
        self.run("attack")
    }

    #[tool(description = "Use an item in battle: heal your monster or throw a capture item")]
    async fn use_item(
        &self,
        Parameters(request): Parameters<UseItemRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(&format!("item {}", request.item))
    }

    #[tool(description = "Buy items from the shop")]
    async fn buy_item(
        &self,
        Parameters(request): Parameters<BuyRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(&format!("buy {} {}", request.item, request.quantity))
    }

    #[tool(description = "Run any text command (type 'help' for the list)")]
    async fn command(
        &self,
        Parameters(request): Parameters<CommandRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(&request.command)
    }
}

#[tool_handler]
impl ServerHandler for MonsterAdventureService {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Monster Adventure MCP Server starting");
    let config = GameConfig::from_env()?;

    let service = MonsterAdventureService::new(config);
    let transport = (stdin(), stdout());

    let server = service.serve(transport).await?;
    tracing::info!("server running, waiting for shutdown");
    let quit_reason = server.waiting().await?;

    tracing::info!(?quit_reason, "Monster Adventure MCP Server exiting");
    Ok(())
}
