use chrono::Utc;
use sea_orm::{ActiveValue::Set, EntityTrait, sea_query::OnConflict};
use vitalsync_entities::sync_checkpoint;

use crate::DatabaseHandler;

/// Row holding the end of the last successful sync.
pub const LAST_SYNC_KEY: &str = "last_sync_timestamp";

impl DatabaseHandler {
    /// Last successful sync in epoch millis, 0 if never synced.
    pub async fn get_last_sync(&self) -> anyhow::Result<i64> {
        let row = sync_checkpoint::Entity::find_by_id(LAST_SYNC_KEY.to_string())
            .one(&self.db)
            .await?;

        Ok(row.map(|r| r.last_sync_millis).unwrap_or_default())
    }

    pub async fn set_last_sync(&self, millis: i64) -> anyhow::Result<()> {
        let model = sync_checkpoint::ActiveModel {
            name: Set(LAST_SYNC_KEY.to_string()),
            last_sync_millis: Set(millis),
            updated_at: Set(Utc::now().naive_utc()),
        };

        sync_checkpoint::Entity::insert(model)
            .on_conflict(
                OnConflict::column(sync_checkpoint::Column::Name)
                    .update_columns([
                        sync_checkpoint::Column::LastSyncMillis,
                        sync_checkpoint::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        debug!("Updated last sync timestamp to: {millis}");
        Ok(())
    }

    pub async fn clear_last_sync(&self) -> anyhow::Result<()> {
        sync_checkpoint::Entity::delete_by_id(LAST_SYNC_KEY.to_string())
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
