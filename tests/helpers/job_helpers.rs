#![allow(dead_code)]
use serde_json::Value;
use uuid::Uuid;
use waggle::database::Database;
use waggle::models::JobStatus;

/// Insert a pending job row that is already due, returning its id.
pub async fn insert_due_job(db: &Database, name: &str, queue_name: &str, data: Value) -> String {
    let past = (chrono::Utc::now() - chrono::Duration::seconds(60)).to_rfc3339();
    insert_job_row(db, name, queue_name, data, JobStatus::Pending, &past, 0, 3).await
}

/// Insert a job row with explicit status, schedule and attempt counters.
pub async fn insert_job_row(
    db: &Database,
    name: &str,
    queue_name: &str,
    data: Value,
    status: JobStatus,
    scheduled_at: &str,
    attempts: i64,
    max_attempts: i64,
) -> String {
    let pool = db.pool();
    let id = Uuid::new_v4().to_string();
    let data_json = serde_json::to_string(&data).expect("Failed to serialize job data");
    let created_at = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO jobs (id, name, queue_name, data, priority, max_attempts, attempts, status, scheduled_at, created_at)
         VALUES (?, ?, ?, ?, 0, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(name)
    .bind(queue_name)
    .bind(&data_json)
    .bind(max_attempts)
    .bind(attempts)
    .bind(status.as_str())
    .bind(scheduled_at)
    .bind(&created_at)
    .execute(pool)
    .await
    .expect("Failed to insert test job");

    id
}

/// Insert a terminal job row created `days_old` days ago, for retention tests.
pub async fn insert_aged_job(db: &Database, status: JobStatus, days_old: i64) -> String {
    let pool = db.pool();
    let id = Uuid::new_v4().to_string();
    let aged = (chrono::Utc::now() - chrono::Duration::days(days_old)).to_rfc3339();

    sqlx::query(
        "INSERT INTO jobs (id, name, queue_name, data, status, scheduled_at, created_at)
         VALUES (?, 'student.birthdate.daily', 'student', '{}', ?, ?, ?)",
    )
    .bind(&id)
    .bind(status.as_str())
    .bind(&aged)
    .bind(&aged)
    .execute(pool)
    .await
    .expect("Failed to insert aged test job");

    id
}
