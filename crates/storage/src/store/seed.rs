#![forbid(unsafe_code)]

use super::games::{create_game_tx, create_mission_tx};
use super::*;
use gl_core::ids::GameId;
use serde::Deserialize;
use std::collections::BTreeMap;

const MISSIONS_JSON: &str = include_str!("../../seed/missions.json");

struct BundledGame {
    name: &'static str,
    display_name: &'static str,
    description: &'static str,
    template_code: &'static str,
}

const BUNDLED_GAMES: &[BundledGame] = &[
    BundledGame {
        name: "snake",
        display_name: "Snake",
        description: "Guide the snake to the food and grow as long as you can.",
        template_code: include_str!("../../seed/templates/snake.py"),
    },
    BundledGame {
        name: "pong",
        display_name: "Pong",
        description: "The classic paddle game for two players.",
        template_code: include_str!("../../seed/templates/pong.py"),
    },
    BundledGame {
        name: "space_invaders",
        display_name: "Space Invaders",
        description: "Defend the planet from rows of marching aliens.",
        template_code: include_str!("../../seed/templates/space_invaders.py"),
    },
    BundledGame {
        name: "maze",
        display_name: "Maze Runner",
        description: "Find your way through the maze to the exit.",
        template_code: include_str!("../../seed/templates/maze.py"),
    },
    BundledGame {
        name: "tetris",
        display_name: "Tetris",
        description: "Stack falling blocks and clear full lines.",
        template_code: include_str!("../../seed/templates/tetris.py"),
    },
    BundledGame {
        name: "sandbox",
        display_name: "Block Sandbox",
        description: "Build anything you like in a world made of blocks.",
        template_code: include_str!("../../seed/templates/sandbox.py"),
    },
];

#[derive(Debug, Deserialize)]
struct BundledMission {
    game: String,
    title: String,
    description: String,
    difficulty: String,
    validation_type: String,
    validation_data: serde_json::Value,
    #[serde(default)]
    hints: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub games_inserted: usize,
    pub missions_inserted: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.games_inserted == 0 && self.missions_inserted == 0
    }
}

impl SqliteStore {
    /// Installs the bundled game templates and their missions.
    ///
    /// Runs only against an empty `games` table, so reopening a seeded store
    /// is a no-op.
    pub fn seed_default_content(&mut self) -> Result<SeedReport, StoreError> {
        let missions: Vec<BundledMission> = serde_json::from_str(MISSIONS_JSON)
            .map_err(|_| StoreError::CorruptRow("bundled missions are not valid json"))?;

        let tx = self.conn.transaction()?;
        let existing = tx.query_row("SELECT COUNT(*) FROM games", [], |row| {
            row.get::<_, i64>(0)
        })?;
        if existing > 0 {
            return Ok(SeedReport::default());
        }

        let mut report = SeedReport::default();
        let mut game_ids = BTreeMap::new();
        for game in BUNDLED_GAMES {
            let created = create_game_tx(
                &tx,
                NewGame {
                    name: game.name.to_string(),
                    display_name: game.display_name.to_string(),
                    description: game.description.to_string(),
                    template_code: game.template_code.to_string(),
                },
            )?;
            game_ids.insert(game.name, created.id);
            report.games_inserted += 1;
        }

        for mission in missions {
            let game_id = game_ids
                .get(mission.game.as_str())
                .copied()
                .and_then(|id| GameId::try_new(id).ok())
                .ok_or(StoreError::CorruptRow("bundled mission names an unknown game"))?;
            let validation_json = serde_json::to_string(&mission.validation_data)
                .map_err(|_| StoreError::CorruptRow("bundled mission params"))?;
            create_mission_tx(
                &tx,
                &NewMission {
                    game_id,
                    title: mission.title,
                    description: mission.description,
                    difficulty: mission.difficulty,
                    validation_type: mission.validation_type,
                    validation_json,
                    hints: mission.hints,
                },
            )?;
            report.missions_inserted += 1;
        }

        tx.commit()?;
        tracing::info!(
            games = report.games_inserted,
            missions = report.missions_inserted,
            "default content seeded"
        );
        Ok(report)
    }
}
