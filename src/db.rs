use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

pub type DbPool = Pool<SqliteConnectionManager>;

pub fn init_pool(path: &str, max_size: u32) -> Result<DbPool, Box<dyn std::error::Error>> {
    let manager = SqliteConnectionManager::file(path);
    let pool = Pool::builder().max_size(max_size.max(1)).build(manager)?;

    // Enable WAL mode for better concurrent read performance
    let conn = pool.get()?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    Ok(pool)
}

/// Same as `init_pool` but with the error flattened to a string, for store constructors.
pub fn init_pool_at(path: &str, max_size: u32) -> Result<DbPool, String> {
    init_pool(path, max_size).map_err(|e| e.to_string())
}

pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    conn.execute_batch(
        "
        -- Section content, one row per (shape, type, subtype)
        CREATE TABLE IF NOT EXISTS form_data (
            id INTEGER PRIMARY KEY,
            shape TEXT NOT NULL DEFAULT 'list',
            type TEXT NOT NULL,
            subtype TEXT NOT NULL,
            values_json TEXT NOT NULL DEFAULT '[]',
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(shape, type, subtype)
        );

        CREATE INDEX IF NOT EXISTS idx_form_data_subtype ON form_data(subtype);
        ",
    )?;

    Ok(())
}
