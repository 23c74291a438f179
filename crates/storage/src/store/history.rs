#![forbid(unsafe_code)]

use super::versions::version_from_row;
use super::*;
use gl_core::model::{HistoryPage, has_more};

impl SqliteStore {
    /// Newest-first page of snapshot summaries for (user, game).
    ///
    /// `total` and the page come from the same read transaction. Unknown
    /// users or games simply have no history.
    pub fn get_history(&mut self, request: HistoryRequest) -> Result<HistoryPage, StoreError> {
        let limit = to_sqlite_i64(request.limit)?;
        let offset = to_sqlite_i64(request.offset)?;
        let user_id = request.user_id.get();
        let game_id = request.game_id.get();

        let tx = self.conn.transaction()?;
        let total = tx.query_row(
            "SELECT COUNT(*) FROM code_versions WHERE user_id=?1 AND game_id=?2",
            params![user_id, game_id],
            |row| row.get::<_, i64>(0),
        )?;

        let mut versions = Vec::new();
        {
            let mut stmt = tx.prepare(
                r#"
                SELECT id, user_id, game_id, code, message, is_checkpoint, created_at_ms
                FROM code_versions
                WHERE user_id=?1 AND game_id=?2
                ORDER BY created_at_ms DESC, id DESC
                LIMIT ?3 OFFSET ?4
                "#,
            )?;
            let mut rows = stmt.query(params![user_id, game_id, limit, offset])?;
            while let Some(row) = rows.next()? {
                versions.push(version_from_row(row)?.summary());
            }
        }
        tx.commit()?;

        let total = usize::try_from(total).map_err(|_| StoreError::CorruptRow("negative count"))?;
        tracing::debug!(user_id, game_id, total, page = versions.len(), "history read");
        Ok(HistoryPage {
            versions,
            total,
            limit: request.limit,
            offset: request.offset,
            has_more: has_more(request.offset, request.limit, total),
        })
    }
}
