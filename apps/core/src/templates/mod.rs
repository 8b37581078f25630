//! # Templates Module
//!
//! Game documents and code snippets produced for chat replies.
//!
//! ## Components
//! - `GameTemplate`: the three playable templates (arcade, puzzle, platformer)
//! - `GameOptions`: the resolved options record every template renders from
//! - `TemplateRenderer`: tera-backed renderer producing standalone HTML documents
//! - `code`: website and function snippets for code replies
//! - `puzzle`: model of the sliding puzzle shuffle embedded in the puzzle template

pub mod code;
pub mod puzzle;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tera::{Context, Tera};
use tracing::debug;

use crate::error::AppError;

/// Watermark embedded in every generated document.
pub const WATERMARK: &str = "HGPT Pro";

const ARCADE_TEMPLATE: &str = include_str!("../../templates/games/arcade.html");
const PUZZLE_TEMPLATE: &str = include_str!("../../templates/games/puzzle.html");
const PLATFORMER_TEMPLATE: &str = include_str!("../../templates/games/platformer.html");
const WEBSITE_TEMPLATE: &str = include_str!("../../templates/code/website.html");

/// Playable game templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameTemplate {
    Arcade,
    Puzzle,
    Platformer,
}

impl GameTemplate {
    pub const ALL: [GameTemplate; 3] = [
        GameTemplate::Arcade,
        GameTemplate::Puzzle,
        GameTemplate::Platformer,
    ];

    /// Human-readable template title.
    pub fn title(&self) -> &'static str {
        match self {
            GameTemplate::Arcade => "Аркадная игра",
            GameTemplate::Puzzle => "Головоломка",
            GameTemplate::Platformer => "Платформер",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GameTemplate::Arcade => "Простая аркадная игра с базовыми элементами управления",
            GameTemplate::Puzzle => "Игра-головоломка с перемещением блоков",
            GameTemplate::Platformer => "Простая игра-платформер с прыжками и препятствиями",
        }
    }

    fn template_name(&self) -> &'static str {
        match self {
            GameTemplate::Arcade => "games/arcade.html",
            GameTemplate::Puzzle => "games/puzzle.html",
            GameTemplate::Platformer => "games/platformer.html",
        }
    }

    /// Defaults every request starts from before keyword overrides apply.
    pub fn default_options(&self) -> GameOptions {
        match self {
            GameTemplate::Arcade => GameOptions {
                primary_color: "#9b87f5".to_string(),
                secondary_color: "#ff6b6b".to_string(),
                background_color: "#1a1a2e".to_string(),
                name: "Аркада".to_string(),
                difficulty: Difficulty::Medium,
                grid_size: GridSize::Four,
            },
            GameTemplate::Puzzle => GameOptions {
                primary_color: "#8B5CF6".to_string(),
                secondary_color: "#7E69AB".to_string(),
                background_color: "#1A1F2C".to_string(),
                name: "Головоломка".to_string(),
                difficulty: Difficulty::Medium,
                grid_size: GridSize::Four,
            },
            GameTemplate::Platformer => GameOptions {
                primary_color: "#9b87f5".to_string(),
                secondary_color: "#7E69AB".to_string(),
                background_color: "#1A1F2C".to_string(),
                name: "Приключение".to_string(),
                difficulty: Difficulty::Medium,
                grid_size: GridSize::Four,
            },
        }
    }
}

impl fmt::Display for GameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GameTemplate::Arcade => "arcade",
            GameTemplate::Puzzle => "puzzle",
            GameTemplate::Platformer => "platformer",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Initial enemy speed factor of the arcade template.
    pub fn arcade_speed(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.5,
            Difficulty::Hard => 2.0,
        }
    }

    /// Initial scroll speed of the platformer template.
    pub fn platformer_speed(&self) -> f64 {
        match self {
            Difficulty::Easy => 5.0,
            Difficulty::Medium => 6.0,
            Difficulty::Hard => 8.0,
        }
    }

    /// Random legal moves replayed from the solved puzzle.
    pub fn shuffle_moves(&self) -> u32 {
        match self {
            Difficulty::Easy => 50,
            Difficulty::Medium => 100,
            Difficulty::Hard => 150,
        }
    }
}

/// Side length of the sliding puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum GridSize {
    Three,
    Four,
    Five,
}

impl GridSize {
    pub fn side(&self) -> usize {
        match self {
            GridSize::Three => 3,
            GridSize::Four => 4,
            GridSize::Five => 5,
        }
    }
}

impl From<GridSize> for u8 {
    fn from(size: GridSize) -> u8 {
        size.side() as u8
    }
}

impl TryFrom<u8> for GridSize {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(GridSize::Three),
            4 => Ok(GridSize::Four),
            5 => Ok(GridSize::Five),
            other => Err(format!("unsupported grid size {}", other)),
        }
    }
}

/// The resolved options record.
///
/// Colors are role-based: `primary` is the player (tiles for the puzzle),
/// `secondary` the enemies, platforms or the puzzle button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub name: String,
    pub difficulty: Difficulty,
    pub grid_size: GridSize,
}

#[derive(Serialize)]
struct ArcadeContext<'a> {
    game_name: &'a str,
    player_color: &'a str,
    enemy_color: &'a str,
    background_color: &'a str,
    initial_speed: f64,
    speed_step: f64,
    watermark: &'static str,
}

#[derive(Serialize)]
struct PuzzleContext<'a> {
    game_name: &'a str,
    tile_color: &'a str,
    button_color: &'a str,
    background_color: &'a str,
    grid_size: usize,
    shuffle_moves: u32,
    watermark: &'static str,
}

#[derive(Serialize)]
struct PlatformerContext<'a> {
    game_name: &'a str,
    player_color: &'a str,
    platform_color: &'a str,
    background_color: &'a str,
    initial_speed: f64,
    speed_step: f64,
    gravity: f64,
    jump_force: f64,
    watermark: &'static str,
}

#[derive(Serialize)]
struct WebsiteContext<'a> {
    site_title: &'a str,
    accent_color: &'a str,
    watermark: &'static str,
}

/// Renders game documents and the website snippet from the bundled templates.
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self, AppError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("games/arcade.html", ARCADE_TEMPLATE),
            ("games/puzzle.html", PUZZLE_TEMPLATE),
            ("games/platformer.html", PLATFORMER_TEMPLATE),
            ("code/website.html", WEBSITE_TEMPLATE),
        ])?;
        tera.autoescape_on(vec![".html"]);
        Ok(Self { tera })
    }

    /// Produces the complete game document. Identical inputs give identical output.
    pub fn render_game(&self, template: GameTemplate, options: &GameOptions) -> Result<String, AppError> {
        let context = match template {
            GameTemplate::Arcade => Context::from_serialize(ArcadeContext {
                game_name: &options.name,
                player_color: &options.primary_color,
                enemy_color: &options.secondary_color,
                background_color: &options.background_color,
                initial_speed: options.difficulty.arcade_speed(),
                speed_step: 0.2,
                watermark: WATERMARK,
            })?,
            GameTemplate::Puzzle => Context::from_serialize(PuzzleContext {
                game_name: &options.name,
                tile_color: &options.primary_color,
                button_color: &options.secondary_color,
                background_color: &options.background_color,
                grid_size: options.grid_size.side(),
                shuffle_moves: options.difficulty.shuffle_moves(),
                watermark: WATERMARK,
            })?,
            GameTemplate::Platformer => Context::from_serialize(PlatformerContext {
                game_name: &options.name,
                player_color: &options.primary_color,
                platform_color: &options.secondary_color,
                background_color: &options.background_color,
                initial_speed: options.difficulty.platformer_speed(),
                speed_step: 0.5,
                gravity: 0.5,
                jump_force: 15.0,
                watermark: WATERMARK,
            })?,
        };

        let html = self.tera.render(template.template_name(), &context)?;
        debug!(template = %template, bytes = html.len(), "Game document rendered");
        Ok(html)
    }

    /// Produces the HTML/CSS landing page used for website code requests.
    pub fn render_website(&self, site_title: &str, accent_color: &str) -> Result<String, AppError> {
        let context = Context::from_serialize(WebsiteContext {
            site_title,
            accent_color,
            watermark: WATERMARK,
        })?;
        Ok(self.tera.render("code/website.html", &context)?)
    }
}

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<script>([\s\S]*?)</script>").expect("Invalid regex: script block")
});

const SNIPPET_LINES: usize = 15;
const SNIPPET_TAIL: &str = "// ... (полный код игры)";

/// First lines of the document's script, for inline display in the chat.
pub fn extract_game_code_snippet(document: &str) -> String {
    match SCRIPT_BLOCK.captures(document).and_then(|c| c.get(1)) {
        Some(script) => {
            let head: Vec<&str> = script.as_str().split('\n').take(SNIPPET_LINES).collect();
            format!("{}\n{}", head.join("\n"), SNIPPET_TAIL)
        }
        None => format!(
            "const canvas = document.getElementById(\"gameCanvas\");\n{}",
            SNIPPET_TAIL
        ),
    }
}
