#![allow(dead_code)]
use waggle::database::Database;

pub async fn setup_test_db() -> Database {
    // Install drivers for AnyPool (required for tests)
    sqlx::any::install_default_drivers();

    // Use file-based SQLite for tests (unique UUID per test for parallel execution)
    use uuid::Uuid;
    let temp_file = format!("test_{}.db", Uuid::new_v4());
    // Use file:// URL scheme for proper SQLite URL format
    let db_url = format!("sqlite://{}?mode=rwc", temp_file);

    let db = Database::connect(&db_url)
        .await
        .expect("Failed to connect to test database");

    // Create the schema manually
    setup_schema(&db).await;

    db
}

async fn setup_schema(db: &Database) {
    let pool = db.pool();

    // Create jobs table
    sqlx::query(
        "CREATE TABLE jobs (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            queue_name TEXT NOT NULL,
            data TEXT NOT NULL,
            priority INTEGER NOT NULL DEFAULT 0,
            max_attempts INTEGER NOT NULL DEFAULT 3,
            attempts INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'pending' CHECK(status IN ('pending', 'processing', 'completed', 'failed')),
            scheduled_at TEXT NOT NULL,
            processed_at TEXT,
            created_at TEXT NOT NULL,
            error TEXT
        )"
    )
    .execute(pool)
    .await
    .expect("Failed to create jobs table");

    sqlx::query("CREATE INDEX idx_jobs_status_scheduled_at ON jobs(status, scheduled_at)")
        .execute(pool)
        .await
        .ok();

    sqlx::query("CREATE INDEX idx_jobs_queue_name ON jobs(queue_name)")
        .execute(pool)
        .await
        .ok();

    sqlx::query("CREATE INDEX idx_jobs_created_at ON jobs(created_at)")
        .execute(pool)
        .await
        .ok();
}

pub async fn teardown_test_db(db: Database) {
    // Close the connection
    drop(db);
    // Note: Test database files will be cleaned up manually or by .gitignore
}
