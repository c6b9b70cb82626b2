use serde_json::Value;
use sqlx::Row;
use uuid::Uuid;

use crate::{Database, Job, JobError, JobStats, JobStatus, NewJob};

impl Database {
    /// Insert a pending job row and return it.
    pub async fn create_job(&self, new_job: &NewJob) -> Result<Job, JobError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().to_rfc3339();

        let data_json = serde_json::to_string(&new_job.data)
            .map_err(|e| JobError::Persistence(sqlx::Error::Encode(Box::new(e))))?;

        sqlx::query(
            "INSERT INTO jobs (id, name, queue_name, data, priority, max_attempts, attempts, status, scheduled_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, 0, 'pending', ?, ?)",
        )
        .bind(&id)
        .bind(&new_job.name)
        .bind(&new_job.queue_name)
        .bind(&data_json)
        .bind(new_job.priority)
        .bind(new_job.max_attempts)
        .bind(&new_job.scheduled_at)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        Ok(Job {
            id,
            name: new_job.name.clone(),
            queue_name: new_job.queue_name.clone(),
            data: new_job.data.clone(),
            priority: new_job.priority,
            max_attempts: new_job.max_attempts,
            attempts: 0,
            status: JobStatus::Pending,
            scheduled_at: new_job.scheduled_at.clone(),
            processed_at: None,
            created_at,
            error: None,
        })
    }

    /// Pending jobs whose `scheduled_at` has passed, highest priority first,
    /// oldest first within a priority.
    pub async fn due_jobs(&self, limit: i64) -> Result<Vec<Job>, JobError> {
        let now = chrono::Utc::now().to_rfc3339();

        let rows = sqlx::query(
            "SELECT id, name, queue_name, data, priority, max_attempts, attempts, status, scheduled_at, processed_at, created_at, error
             FROM jobs
             WHERE status = 'pending' AND scheduled_at <= ?
             ORDER BY priority DESC, created_at ASC
             LIMIT ?",
        )
        .bind(&now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut jobs = Vec::new();
        for row in rows {
            let data_str: String = row.try_get("data")?;
            let data: Value = serde_json::from_str(&data_str)
                .map_err(|e| JobError::Persistence(sqlx::Error::Decode(Box::new(e))))?;

            jobs.push(Job {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                queue_name: row.try_get("queue_name")?,
                data,
                priority: row.try_get("priority")?,
                max_attempts: row.try_get("max_attempts")?,
                attempts: row.try_get("attempts")?,
                status: JobStatus::from(row.try_get::<String, _>("status")?),
                scheduled_at: row.try_get("scheduled_at")?,
                processed_at: row.try_get("processed_at").ok(),
                created_at: row.try_get("created_at")?,
                error: row.try_get("error").ok(),
            });
        }

        Ok(jobs)
    }

    /// Move a pending job to `processing`, bumping its attempt counter.
    ///
    /// Returns `false` when the row was not pending anymore, i.e. another
    /// runner claimed it first.
    pub async fn claim_job(&self, id: &str) -> Result<bool, JobError> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "UPDATE jobs
             SET status = 'processing', attempts = attempts + 1, processed_at = ?
             WHERE id = ? AND status = 'pending'",
        )
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn complete_job(&self, id: &str) -> Result<(), JobError> {
        sqlx::query("UPDATE jobs SET status = 'completed' WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Record a failed attempt. `status` is `pending` when the job will be
    /// retried, `failed` when it is out of attempts.
    pub async fn fail_job(&self, id: &str, status: JobStatus, error: &str) -> Result<(), JobError> {
        sqlx::query("UPDATE jobs SET status = ?, error = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(error)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get_job_by_id(&self, id: &str) -> Result<Option<Job>, JobError> {
        let row = sqlx::query(
            "SELECT id, name, queue_name, data, priority, max_attempts, attempts, status, scheduled_at, processed_at, created_at, error
             FROM jobs
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            let data_str: String = row.try_get("data")?;
            let data: Value = serde_json::from_str(&data_str)
                .map_err(|e| JobError::Persistence(sqlx::Error::Decode(Box::new(e))))?;

            Ok(Some(Job {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                queue_name: row.try_get("queue_name")?,
                data,
                priority: row.try_get("priority")?,
                max_attempts: row.try_get("max_attempts")?,
                attempts: row.try_get("attempts")?,
                status: JobStatus::from(row.try_get::<String, _>("status")?),
                scheduled_at: row.try_get("scheduled_at")?,
                processed_at: row.try_get("processed_at").ok(),
                created_at: row.try_get("created_at")?,
                error: row.try_get("error").ok(),
            }))
        } else {
            Ok(None)
        }
    }

    /// List jobs with optional status and queue filters, newest first.
    pub async fn list_jobs(
        &self,
        status: Option<JobStatus>,
        queue_name: Option<String>,
        limit: i64,
    ) -> Result<Vec<Job>, JobError> {
        let mut query = String::from(
            "SELECT id, name, queue_name, data, priority, max_attempts, attempts, status, scheduled_at, processed_at, created_at, error
             FROM jobs
             WHERE 1=1",
        );

        // Add filters
        if status.is_some() {
            query.push_str(" AND status = ?");
        }
        if queue_name.is_some() {
            query.push_str(" AND queue_name = ?");
        }

        query.push_str(" ORDER BY created_at DESC LIMIT ?");

        let mut sql_query = sqlx::query(&query);

        // Bind filter parameters
        if let Some(s) = status {
            sql_query = sql_query.bind(s.to_string());
        }
        if let Some(queue) = queue_name {
            sql_query = sql_query.bind(queue);
        }

        sql_query = sql_query.bind(limit);

        let rows = sql_query.fetch_all(&self.pool).await?;

        let mut jobs = Vec::new();
        for row in rows {
            let data_str: String = row.try_get("data")?;
            let data: Value = serde_json::from_str(&data_str)
                .map_err(|e| JobError::Persistence(sqlx::Error::Decode(Box::new(e))))?;

            jobs.push(Job {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                queue_name: row.try_get("queue_name")?,
                data,
                priority: row.try_get("priority")?,
                max_attempts: row.try_get("max_attempts")?,
                attempts: row.try_get("attempts")?,
                status: JobStatus::from(row.try_get::<String, _>("status")?),
                scheduled_at: row.try_get("scheduled_at")?,
                processed_at: row.try_get("processed_at").ok(),
                created_at: row.try_get("created_at")?,
                error: row.try_get("error").ok(),
            });
        }

        Ok(jobs)
    }

    /// Job counts per status.
    pub async fn job_stats(&self) -> Result<JobStats, JobError> {
        let rows = sqlx::query("SELECT status, COUNT(*) as count FROM jobs GROUP BY status")
            .fetch_all(&self.pool)
            .await?;

        let mut stats = JobStats::default();
        for row in rows {
            let status: String = row.try_get("status")?;
            let count: i64 = row.try_get("count")?;

            match status.as_str() {
                "pending" => stats.pending = count,
                "processing" => stats.processing = count,
                "completed" => stats.completed = count,
                "failed" => stats.failed = count,
                _ => {}
            }
            stats.total += count;
        }

        Ok(stats)
    }

    /// Delete completed and failed jobs created more than `older_than_days`
    /// days ago. Returns the number of rows removed.
    pub async fn delete_old_jobs(&self, older_than_days: i64) -> Result<u64, JobError> {
        let cutoff = (chrono::Utc::now() - chrono::Duration::days(older_than_days)).to_rfc3339();

        let result = sqlx::query(
            "DELETE FROM jobs
             WHERE status IN ('completed', 'failed') AND created_at < ?",
        )
        .bind(&cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
