#![forbid(unsafe_code)]

use super::games::game_template_tx;
use super::*;
use gl_core::diff::{DEFAULT_CONTEXT, unified_diff};
use gl_core::ids::{GameId, UserId, VersionId};
use gl_core::model::{CodeDiff, CodeVersion, LoadedCode, SaveOutcome};
use rusqlite::TransactionBehavior;

const VERSION_COLUMNS: &str =
    "id, user_id, game_id, code, message, is_checkpoint, created_at_ms";

impl SqliteStore {
    /// Appends a snapshot unless it is byte-identical to the latest one for
    /// the same (user, game). Rows are never updated; `message` is stored
    /// exactly as given.
    pub fn save_code(&mut self, request: SaveCodeRequest) -> Result<SaveOutcome, StoreError> {
        let SaveCodeRequest {
            user_id,
            game_id,
            code,
            message,
            is_checkpoint,
        } = request;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        ensure_user_exists_tx(&tx, user_id.get())?;
        game_template_tx(&tx, game_id.get())?;

        let latest = latest_version_tx(&tx, user_id.get(), game_id.get())?;
        if let Some(latest) = &latest
            && latest.code == code
        {
            tracing::debug!(version_id = latest.id, "save skipped, code unchanged");
            return Ok(SaveOutcome {
                created: false,
                version: latest.clone(),
            });
        }

        let created_at_ms = next_created_at_ms(latest.as_ref());
        let version = insert_version_tx(
            &tx,
            NewVersion {
                user_id: user_id.get(),
                game_id: game_id.get(),
                code,
                message,
                is_checkpoint,
                created_at_ms,
            },
        )?;
        tx.commit()?;

        tracing::info!(
            version_id = version.id,
            user_id = version.user_id,
            game_id = version.game_id,
            checkpoint = version.is_checkpoint,
            "code version saved"
        );
        Ok(SaveOutcome {
            created: true,
            version,
        })
    }

    /// Latest snapshot for (user, game), or the game template when the user
    /// has not saved anything yet.
    pub fn load_code(&mut self, user_id: UserId, game_id: GameId) -> Result<LoadedCode, StoreError> {
        let tx = self.conn.transaction()?;
        ensure_user_exists_tx(&tx, user_id.get())?;
        let template = game_template_tx(&tx, game_id.get())?;
        let latest = latest_version_tx(&tx, user_id.get(), game_id.get())?;
        tx.commit()?;

        Ok(match latest {
            Some(version) => LoadedCode {
                code: version.code,
                version_id: Some(version.id),
                created_at_ms: Some(version.created_at_ms),
            },
            None => LoadedCode {
                code: template,
                version_id: None,
                created_at_ms: None,
            },
        })
    }

    pub fn get_version(&mut self, version_id: VersionId) -> Result<CodeVersion, StoreError> {
        let tx = self.conn.transaction()?;
        let version = version_tx(&tx, version_id.get())?;
        tx.commit()?;
        Ok(version)
    }

    /// Unified diff from `from_version` to `to_version`. Both versions are
    /// resolved before anything is computed.
    pub fn get_diff(&mut self, request: DiffRequest) -> Result<CodeDiff, StoreError> {
        let tx = self.conn.transaction()?;
        let from = version_tx(&tx, request.from_version.get())?;
        let to = version_tx(&tx, request.to_version.get())?;
        tx.commit()?;

        let lines = unified_diff(
            &from.code,
            &to.code,
            &format!("Version {}", from.id),
            &format!("Version {}", to.id),
            DEFAULT_CONTEXT,
        );
        tracing::debug!(from = from.id, to = to.id, lines = lines.len(), "diff computed");
        Ok(CodeDiff {
            lines,
            from_version: from.id,
            to_version: to.id,
        })
    }

    /// Copies an old snapshot forward as a new checkpoint for `user_id`.
    /// The source row is left untouched.
    pub fn restore_version(&mut self, request: RestoreRequest) -> Result<CodeVersion, StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let source = version_tx(&tx, request.version_id.get())?;
        ensure_user_exists_tx(&tx, request.user_id.get())?;

        let latest = latest_version_tx(&tx, request.user_id.get(), source.game_id)?;
        let restored = insert_version_tx(
            &tx,
            NewVersion {
                user_id: request.user_id.get(),
                game_id: source.game_id,
                code: source.code,
                message: Some(format!("Restored from version {}", source.id)),
                is_checkpoint: true,
                created_at_ms: next_created_at_ms(latest.as_ref()),
            },
        )?;
        tx.commit()?;

        tracing::info!(
            version_id = restored.id,
            source_id = source.id,
            user_id = restored.user_id,
            "code version restored"
        );
        Ok(restored)
    }
}

struct NewVersion {
    user_id: i64,
    game_id: i64,
    code: String,
    message: Option<String>,
    is_checkpoint: bool,
    created_at_ms: i64,
}

// Keeps history ordering stable when the wall clock steps backwards.
fn next_created_at_ms(latest: Option<&CodeVersion>) -> i64 {
    let now = now_ms();
    latest.map_or(now, |version| now.max(version.created_at_ms))
}

fn insert_version_tx(tx: &Transaction<'_>, new: NewVersion) -> Result<CodeVersion, StoreError> {
    tx.execute(
        "INSERT INTO code_versions(user_id, game_id, code, message, is_checkpoint, created_at_ms) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            new.user_id,
            new.game_id,
            new.code,
            new.message,
            if new.is_checkpoint { 1i64 } else { 0i64 },
            new.created_at_ms
        ],
    )?;

    Ok(CodeVersion {
        id: tx.last_insert_rowid(),
        user_id: new.user_id,
        game_id: new.game_id,
        code: new.code,
        message: new.message,
        is_checkpoint: new.is_checkpoint,
        created_at_ms: new.created_at_ms,
    })
}

pub(super) fn version_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CodeVersion> {
    Ok(CodeVersion {
        id: row.get(0)?,
        user_id: row.get(1)?,
        game_id: row.get(2)?,
        code: row.get(3)?,
        message: row.get(4)?,
        is_checkpoint: row.get::<_, i64>(5)? != 0,
        created_at_ms: row.get(6)?,
    })
}

fn version_tx(tx: &Transaction<'_>, version_id: i64) -> Result<CodeVersion, StoreError> {
    tx.query_row(
        &format!("SELECT {VERSION_COLUMNS} FROM code_versions WHERE id=?1"),
        params![version_id],
        version_from_row,
    )
    .optional()?
    .ok_or(StoreError::UnknownVersion)
}

fn latest_version_tx(
    tx: &Transaction<'_>,
    user_id: i64,
    game_id: i64,
) -> Result<Option<CodeVersion>, StoreError> {
    Ok(tx
        .query_row(
            &format!(
                "SELECT {VERSION_COLUMNS} FROM code_versions \
                 WHERE user_id=?1 AND game_id=?2 \
                 ORDER BY created_at_ms DESC, id DESC LIMIT 1"
            ),
            params![user_id, game_id],
            version_from_row,
        )
        .optional()?)
}
