#![forbid(unsafe_code)]

use super::*;
use gl_core::ids::{UserId, Username};
use gl_core::model::User;

impl SqliteStore {
    pub fn create_user(&mut self, username: &Username) -> Result<User, StoreError> {
        let created_at_ms = now_ms();
        let tx = self.conn.transaction()?;

        let insert = tx.execute(
            "INSERT INTO users(username, created_at_ms) VALUES (?1, ?2)",
            params![username.as_str(), created_at_ms],
        );
        if let Err(err) = insert {
            if is_constraint_violation(&err) {
                return Err(StoreError::UsernameTaken);
            }
            return Err(err.into());
        }
        let id = tx.last_insert_rowid();

        tx.commit()?;
        tracing::info!(user_id = id, "user created");
        Ok(User {
            id,
            username: username.as_str().to_string(),
            created_at_ms,
        })
    }

    pub fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, username, created_at_ms FROM users ORDER BY id ASC")?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();

        while let Some(row) = rows.next()? {
            out.push(User {
                id: row.get(0)?,
                username: row.get(1)?,
                created_at_ms: row.get(2)?,
            });
        }

        Ok(out)
    }

    pub fn get_user(&self, user_id: UserId) -> Result<User, StoreError> {
        self.conn
            .query_row(
                "SELECT id, username, created_at_ms FROM users WHERE id=?1",
                params![user_id.get()],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        created_at_ms: row.get(2)?,
                    })
                },
            )
            .optional()?
            .ok_or(StoreError::UnknownUser)
    }
}
