use anyhow::Context;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use vitalsync_migration::{Migrator, MigratorTrait};

#[derive(Clone)]
pub struct DatabaseHandler {
    pub(crate) db: DatabaseConnection,
}

impl DatabaseHandler {
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Connects and brings the schema up to date.
    pub async fn new<C>(path: C) -> anyhow::Result<Self>
    where
        C: Into<ConnectOptions>,
    {
        let db = Database::connect(path)
            .await
            .context("Unable to connect to db")?;

        Migrator::up(&db, None)
            .await
            .context("Error running migrations")?;

        Ok(Self { db })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ConnectionTrait;

    #[tokio::test]
    async fn connects_and_migrates_in_memory() {
        let db = DatabaseHandler::new("sqlite::memory:").await.unwrap();
        let backend = db.connection().get_database_backend();
        assert_eq!(backend, sea_orm::DatabaseBackend::Sqlite);
    }

    #[tokio::test]
    async fn invalid_url_is_an_error() {
        assert!(DatabaseHandler::new("notadb://nowhere").await.is_err());
    }
}
