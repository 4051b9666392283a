//! Job repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use docmail_core::error::{AppError, ErrorKind};
use docmail_core::result::AppResult;
use docmail_entity::job::{JobRecord, QueuedJob};

/// Repository for the `jobs` table backing the PostgreSQL queue.
#[derive(Debug, Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    /// Create a new job repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a job by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobRecord>> {
        sqlx::query_as::<_, JobRecord>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find job", e))
    }

    /// Insert a pending job.
    pub async fn create(&self, job: &QueuedJob) -> AppResult<JobRecord> {
        sqlx::query_as::<_, JobRecord>(
            "INSERT INTO jobs (id, queue, task, kwargs, status, created_at) \
             VALUES ($1, $2, $3, $4, 'pending', $5) RETURNING *",
        )
        .bind(job.id.into_uuid())
        .bind(&job.queue)
        .bind(&job.task)
        .bind(&job.kwargs)
        .bind(job.enqueued_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create job", e))
    }

    /// Insert several pending jobs in one transaction. Either every job is
    /// stored or none is.
    pub async fn create_many(&self, jobs: &[QueuedJob]) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        for job in jobs {
            sqlx::query(
                "INSERT INTO jobs (id, queue, task, kwargs, status, created_at) \
                 VALUES ($1, $2, $3, $4, 'pending', $5)",
            )
            .bind(job.id.into_uuid())
            .bind(&job.queue)
            .bind(&job.task)
            .bind(&job.kwargs)
            .bind(job.enqueued_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create job", e))?;
        }
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit jobs", e)
        })
    }

    /// Claim the oldest pending job of a queue (SKIP LOCKED for concurrency).
    pub async fn dequeue(&self, queue: &str, worker_id: &str) -> AppResult<Option<JobRecord>> {
        sqlx::query_as::<_, JobRecord>(
            "UPDATE jobs SET status = 'running', started_at = NOW(), worker_id = $2 \
             WHERE id = ( \
                SELECT id FROM jobs \
                WHERE queue = $1 AND status = 'pending' \
                ORDER BY created_at ASC \
                FOR UPDATE SKIP LOCKED \
                LIMIT 1 \
             ) RETURNING *",
        )
        .bind(queue)
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to dequeue job", e))
    }

    /// Mark a job as completed.
    pub async fn complete(&self, job_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE jobs SET status = 'completed', completed_at = NOW() WHERE id = $1")
            .bind(job_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to complete job", e)
            })?;
        Ok(())
    }

    /// Mark a job as failed. Failed jobs are never picked up again.
    pub async fn fail(&self, job_id: Uuid, error_message: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'failed', error_message = $2, completed_at = NOW() \
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(error_message)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark job as failed", e)
        })?;
        Ok(())
    }
}
