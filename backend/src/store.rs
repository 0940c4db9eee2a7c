use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::debug;

use shared::fraud::CandidateVote;
use shared::models::{format_timestamp, parse_timestamp, Vote, VoteSnapshot};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate entry detected in the database!")]
    Duplicate,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Stored timestamp is corrupt: {0}")]
    CorruptTimestamp(#[from] time::error::Parse),
    #[error("Timestamp could not be formatted: {0}")]
    FormatTimestamp(#[from] time::error::Format),
}

/// Creates the votes table on first run. The two UNIQUE columns are the
/// authoritative duplicate defense; the fraud check is only a pre-filter.
pub async fn init(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS votes (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             voter_id TEXT NOT NULL UNIQUE,
             candidate TEXT NOT NULL,
             location TEXT NOT NULL,
             timestamp TEXT NOT NULL,
             biometric_hash TEXT NOT NULL UNIQUE
         )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

fn vote_from_row(row: &SqliteRow) -> Result<Vote, StoreError> {
    let timestamp: String = row.try_get("timestamp")?;
    Ok(Vote {
        id: row.try_get("id")?,
        voter_id: row.try_get("voter_id")?,
        candidate: row.try_get("candidate")?,
        location: row.try_get("location")?,
        timestamp: parse_timestamp(&timestamp)?,
        biometric_hash: row.try_get("biometric_hash")?,
    })
}

/// Inserts under the UNIQUE constraints. A constraint violation means a
/// concurrent submission won the race after the fraud check had already
/// passed; it surfaces as `StoreError::Duplicate`.
pub async fn insert_vote(pool: &SqlitePool, candidate: &CandidateVote) -> Result<Vote, StoreError> {
    let timestamp = format_timestamp(candidate.timestamp)?;

    let result = sqlx::query(
        "INSERT INTO votes (voter_id, candidate, location, timestamp, biometric_hash)
         VALUES (?1, ?2, ?3, ?4, ?5)
         RETURNING id",
    )
    .bind(&candidate.voter_id)
    .bind(&candidate.candidate)
    .bind(&candidate.location)
    .bind(&timestamp)
    .bind(&candidate.biometric_hash)
    .fetch_one(pool)
    .await;

    let row = result.map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            debug!("Insert lost the uniqueness race for voter {}", candidate.voter_id);
            StoreError::Duplicate
        }
        other => StoreError::Database(other),
    })?;

    Ok(Vote {
        id: row.try_get("id")?,
        voter_id: candidate.voter_id.clone(),
        candidate: candidate.candidate.clone(),
        location: candidate.location.clone(),
        timestamp: candidate.timestamp,
        biometric_hash: candidate.biometric_hash.clone(),
    })
}

/// All stored votes in insertion order.
pub async fn fetch_all_votes(pool: &SqlitePool) -> Result<Vec<Vote>, StoreError> {
    let rows = sqlx::query(
        "SELECT id, voter_id, candidate, location, timestamp, biometric_hash
         FROM votes ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(vote_from_row).collect()
}

pub async fn count_votes(pool: &SqlitePool) -> Result<i64, StoreError> {
    let row = sqlx::query("SELECT COUNT(*) AS total FROM votes")
        .fetch_one(pool)
        .await?;
    Ok(row.try_get("total")?)
}

/// Count plus full list, the payload returned by `GET /get_votes` and
/// pushed to real-time subscribers.
pub async fn snapshot(pool: &SqlitePool) -> Result<VoteSnapshot, StoreError> {
    let total_votes = count_votes(pool).await?;
    let votes = fetch_all_votes(pool).await?;
    Ok(VoteSnapshot { total_votes, votes })
}
