use super::schema::install_schema;
use log::info;
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sea_orm::sqlx::ConnectOptions as _;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, RuntimeErr,
    SqlxSqliteConnector,
};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(8);

pub async fn establish_connection(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = if is_in_memory_sqlite(db_url) {
        connect_in_memory_sqlite(db_url).await?
    } else {
        let mut opt = ConnectOptions::new(db_url.to_owned());
        opt.max_connections(10)
            .min_connections(2)
            .connect_timeout(CONNECT_TIMEOUT)
            .acquire_timeout(CONNECT_TIMEOUT)
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Info);
        Database::connect(opt).await?
    };
    install_schema(&db).await?;

    info!(
        "Database connection established ({:?}).",
        db.get_database_backend()
    );

    Ok(db)
}

/// Every pooled connection to an in-memory SQLite database is a separate
/// database, so the pool holds exactly one connection and never recycles it.
async fn connect_in_memory_sqlite(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let conn_err = |e| DbErr::Conn(RuntimeErr::SqlxError(e));
    let options = db_url
        .parse::<SqliteConnectOptions>()
        .map_err(conn_err)?
        .log_statements(log::LevelFilter::Info);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .acquire_timeout(CONNECT_TIMEOUT)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(conn_err)?;
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

fn is_in_memory_sqlite(db_url: &str) -> bool {
    db_url.starts_with("sqlite::memory:") || db_url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_in_memory_sqlite_urls() {
        assert!(is_in_memory_sqlite("sqlite::memory:"));
        assert!(is_in_memory_sqlite("sqlite://file:test?mode=memory&cache=shared"));
        assert!(!is_in_memory_sqlite("sqlite://fundamentals.db?mode=rwc"));
        assert!(!is_in_memory_sqlite("postgres://user:pw@localhost:5432/db"));
    }

    #[tokio::test]
    async fn in_memory_pool_keeps_its_only_connection() {
        let db = establish_connection("sqlite::memory:").await.unwrap();
        let options = db.get_sqlite_connection_pool().options();
        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_idle_timeout(), None);
        assert_eq!(options.get_max_lifetime(), None);
    }

    #[tokio::test]
    async fn schema_install_is_idempotent() {
        let db = establish_connection("sqlite::memory:").await.unwrap();
        install_schema(&db).await.unwrap();
        install_schema(&db).await.unwrap();
    }
}
