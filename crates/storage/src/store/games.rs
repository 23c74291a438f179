#![forbid(unsafe_code)]

use super::*;
use gl_core::ids::GameId;
use gl_core::mission::MissionRule;
use gl_core::model::Game;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewGame {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub template_code: String,
}

/// Mission as authored: the rule stays in its persisted
/// `(validation_type, validation_json)` form until it is loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMission {
    pub game_id: GameId,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub validation_type: String,
    pub validation_json: String,
    pub hints: Vec<String>,
}

impl SqliteStore {
    pub fn create_game(&mut self, game: NewGame) -> Result<Game, StoreError> {
        let tx = self.conn.transaction()?;
        let created = create_game_tx(&tx, game)?;
        tx.commit()?;
        Ok(created)
    }

    pub fn create_mission(&mut self, mission: NewMission) -> Result<i64, StoreError> {
        let tx = self.conn.transaction()?;
        let id = create_mission_tx(&tx, &mission)?;
        tx.commit()?;
        Ok(id)
    }

    pub fn list_games(&self) -> Result<Vec<Game>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, display_name, description, template_code FROM games ORDER BY id ASC",
        )?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();

        while let Some(row) = rows.next()? {
            out.push(Game {
                id: row.get(0)?,
                name: row.get(1)?,
                display_name: row.get(2)?,
                description: row.get(3)?,
                template_code: row.get(4)?,
            });
        }

        Ok(out)
    }

    pub fn get_game(&self, game_id: GameId) -> Result<Game, StoreError> {
        self.conn
            .query_row(
                "SELECT id, name, display_name, description, template_code FROM games WHERE id=?1",
                params![game_id.get()],
                |row| {
                    Ok(Game {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        display_name: row.get(2)?,
                        description: row.get(3)?,
                        template_code: row.get(4)?,
                    })
                },
            )
            .optional()?
            .ok_or(StoreError::UnknownGame)
    }
}

pub(super) fn create_game_tx(tx: &Transaction<'_>, game: NewGame) -> Result<Game, StoreError> {
    let name = game.name.trim();
    if name.is_empty() {
        return Err(StoreError::InvalidInput("game name must not be empty"));
    }

    let insert = tx.execute(
        "INSERT INTO games(name, display_name, description, template_code, created_at_ms) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            name,
            game.display_name,
            game.description,
            game.template_code,
            now_ms()
        ],
    );
    if let Err(err) = insert {
        if is_constraint_violation(&err) {
            return Err(StoreError::InvalidInput("game name already exists"));
        }
        return Err(err.into());
    }

    Ok(Game {
        id: tx.last_insert_rowid(),
        name: name.to_string(),
        display_name: game.display_name,
        description: game.description,
        template_code: game.template_code,
    })
}

pub(super) fn create_mission_tx(
    tx: &Transaction<'_>,
    mission: &NewMission,
) -> Result<i64, StoreError> {
    game_template_tx(tx, mission.game_id.get())?;
    MissionRule::decode(&mission.validation_type, &mission.validation_json)
        .map_err(|_| StoreError::InvalidInput("invalid mission rule"))?;
    let hints_json = serde_json::to_string(&mission.hints)
        .map_err(|_| StoreError::InvalidInput("invalid mission hints"))?;

    let order_index = tx.query_row(
        "SELECT COALESCE(MAX(order_index), 0) + 1 FROM missions WHERE game_id=?1",
        params![mission.game_id.get()],
        |row| row.get::<_, i64>(0),
    )?;

    tx.execute(
        "INSERT INTO missions(game_id, order_index, title, description, difficulty, validation_type, validation_json, hints_json) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            mission.game_id.get(),
            order_index,
            mission.title,
            mission.description,
            mission.difficulty,
            mission.validation_type.trim(),
            mission.validation_json,
            hints_json,
        ],
    )?;

    Ok(tx.last_insert_rowid())
}

/// Template code of a game; `UnknownGame` when it does not exist.
pub(super) fn game_template_tx(tx: &Transaction<'_>, game_id: i64) -> Result<String, StoreError> {
    tx.query_row(
        "SELECT template_code FROM games WHERE id=?1",
        params![game_id],
        |row| row.get::<_, String>(0),
    )
    .optional()?
    .ok_or(StoreError::UnknownGame)
}
