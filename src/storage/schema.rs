use log::info;
use sea_orm::{ConnectionTrait, DatabaseBackend, DbErr};

const POSTGRES_SCHEMA: &[&str] = &[
    r#"DO $$ BEGIN
    CREATE TYPE financial_statement_type AS ENUM (
        'per_share_data_array',
        'common_size_ratios',
        'income_statement',
        'balance_sheet',
        'cashflow_statement',
        'valuation_ratios',
        'valuation_and_quality',
        'other'
    );
EXCEPTION WHEN duplicate_object THEN NULL;
END $$;"#,
    r#"DO $$ BEGIN
    CREATE TYPE period_type AS ENUM ('annuals', 'quarterly');
EXCEPTION WHEN duplicate_object THEN NULL;
END $$;"#,
    r#"CREATE TABLE IF NOT EXISTS fundamental_data_type (
    id BIGSERIAL PRIMARY KEY,
    type financial_statement_type NOT NULL,
    name VARCHAR(50) NOT NULL
);"#,
    r#"CREATE TABLE IF NOT EXISTS fundamental_data (
    id BIGSERIAL PRIMARY KEY,
    ticker VARCHAR(30) NOT NULL,
    period period_type NOT NULL,
    year VARCHAR(5) NOT NULL,
    month VARCHAR(3) NOT NULL,
    fundamental_data_type_id BIGINT NOT NULL
        REFERENCES fundamental_data_type(id) ON DELETE CASCADE,
    value NUMERIC NOT NULL,
    CONSTRAINT fundamental_data_unique
        UNIQUE (ticker, period, year, month, fundamental_data_type_id)
);"#,
    "CREATE INDEX IF NOT EXISTS idx_fundamental_data_ticker ON fundamental_data (ticker);",
    "CREATE INDEX IF NOT EXISTS idx_fundamental_data_ticker_period_year ON fundamental_data (ticker, period, year);",
    "CREATE INDEX IF NOT EXISTS idx_fundamental_data_type_id ON fundamental_data (fundamental_data_type_id);",
];

// SQLite has no enum types or enforced VARCHAR widths; CHECK constraints stand in for both.
const SQLITE_SCHEMA: &[&str] = &[
    "PRAGMA foreign_keys = ON;",
    r#"CREATE TABLE IF NOT EXISTS fundamental_data_type (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type TEXT NOT NULL CHECK (type IN (
        'per_share_data_array',
        'common_size_ratios',
        'income_statement',
        'balance_sheet',
        'cashflow_statement',
        'valuation_ratios',
        'valuation_and_quality',
        'other'
    )),
    name TEXT NOT NULL CHECK (length(name) <= 50)
);"#,
    r#"CREATE TABLE IF NOT EXISTS fundamental_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ticker TEXT NOT NULL CHECK (length(ticker) <= 30),
    period TEXT NOT NULL CHECK (period IN ('annuals', 'quarterly')),
    year TEXT NOT NULL CHECK (length(year) <= 5),
    month TEXT NOT NULL CHECK (length(month) <= 3),
    fundamental_data_type_id INTEGER NOT NULL
        REFERENCES fundamental_data_type(id) ON DELETE CASCADE,
    value REAL NOT NULL,
    CONSTRAINT fundamental_data_unique
        UNIQUE (ticker, period, year, month, fundamental_data_type_id)
);"#,
    "CREATE INDEX IF NOT EXISTS idx_fundamental_data_ticker ON fundamental_data (ticker);",
    "CREATE INDEX IF NOT EXISTS idx_fundamental_data_ticker_period_year ON fundamental_data (ticker, period, year);",
    "CREATE INDEX IF NOT EXISTS idx_fundamental_data_type_id ON fundamental_data (fundamental_data_type_id);",
];

/// Creates enum types, tables and indexes if they are missing. Safe to run on every start.
pub async fn install_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let statements = match backend {
        DatabaseBackend::Postgres => POSTGRES_SCHEMA,
        DatabaseBackend::Sqlite => SQLITE_SCHEMA,
        other => {
            return Err(DbErr::Custom(format!(
                "unsupported database backend: {:?}",
                other
            )))
        }
    };

    for sql in statements {
        db.execute_unprepared(sql).await?;
    }

    info!("Schema installed ({:?}, {} statements).", backend, statements.len());
    Ok(())
}
