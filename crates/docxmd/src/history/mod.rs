//! Append-only log of processing results.
//!
//! Uses rusqlite (SQLite) with a thread-safe `HistoryStore` handle. All
//! access is serialized through a `Mutex<Connection>`; the batch collector
//! is the only writer during a run.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};
use serde::Serialize;

pub mod error;
pub mod migrations;

pub use error::HistoryError;

use crate::report::{ProcessingResult, ProcessingStatus, SkipReason};

#[derive(Clone)]
pub struct HistoryStore {
    conn: Arc<Mutex<Connection>>,
}

impl HistoryStore {
    /// Opens (or creates) the store at the given path and runs all pending
    /// migrations.
    pub fn open(path: &Path) -> Result<Self, HistoryError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| HistoryError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        migrations::run_all(&conn)?;

        log::info!("History store opened at {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory store for testing.
    pub fn open_in_memory() -> Result<Self, HistoryError> {
        let conn = Connection::open_in_memory()?;
        migrations::run_all(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, HistoryError>
    where
        F: FnOnce(&Connection) -> Result<T, HistoryError>,
    {
        let conn = self.conn.lock().map_err(|_| HistoryError::LockPoisoned)?;
        f(&conn)
    }

    pub fn append(&self, run_id: &str, result: &ProcessingResult) -> Result<(), HistoryError> {
        let (status, skip_reason, error_message) = match &result.status {
            ProcessingStatus::Processed => ("processed", None, None),
            ProcessingStatus::Skipped { reason } => ("skipped", Some(skip_reason_name(*reason)), None),
            ProcessingStatus::Error { message } => ("error", None, Some(message.as_str())),
        };
        let assessment = result.assessment.as_ref();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO processing_history (run_id, job_id, path, status, skip_reason,
                 error_message, document_type, confidence, quality_bucket, overall_score,
                 word_count, warning_count, started_at, duration_ms)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    run_id,
                    result.job_id,
                    result.path.to_string_lossy(),
                    status,
                    skip_reason,
                    error_message,
                    result.document_type.map(|t| t.slug()),
                    result.confidence,
                    assessment.map(|a| a.bucket.as_str()),
                    assessment.map(|a| a.overall),
                    assessment.map(|a| a.word_count as i64),
                    result.warnings.len() as i64,
                    result.started_at.to_rfc3339(),
                    result.duration_ms as i64,
                ],
            )?;
            Ok(())
        })
    }

    pub fn statistics(&self) -> Result<HistoryStatistics, HistoryError> {
        self.with_conn(|conn| {
            let (total, processed, skipped, errors, runs, average_score, average_duration_ms): (
                i64,
                i64,
                i64,
                i64,
                i64,
                Option<f64>,
                f64,
            ) = conn.query_row(
                "SELECT COUNT(*),
                 COALESCE(SUM(status = 'processed'), 0),
                 COALESCE(SUM(status = 'skipped'), 0),
                 COALESCE(SUM(status = 'error'), 0),
                 COUNT(DISTINCT run_id),
                 AVG(overall_score),
                 COALESCE(AVG(duration_ms), 0)
                 FROM processing_history",
                [],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                    ))
                },
            )?;

            let mut stmt = conn.prepare(
                "SELECT document_type, COUNT(*), AVG(overall_score)
                 FROM processing_history
                 WHERE status = 'processed' AND document_type IS NOT NULL
                 GROUP BY document_type ORDER BY COUNT(*) DESC, document_type",
            )?;
            let by_type: Vec<TypeStatistics> = stmt
                .query_map([], |row| {
                    Ok(TypeStatistics {
                        document_type: row.get(0)?,
                        count: row.get(1)?,
                        average_score: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            let mut stmt = conn.prepare(
                "SELECT quality_bucket, COUNT(*) FROM processing_history
                 WHERE quality_bucket IS NOT NULL
                 GROUP BY quality_bucket ORDER BY quality_bucket",
            )?;
            let by_bucket: Vec<(String, i64)> = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(HistoryStatistics {
                total,
                processed,
                skipped,
                errors,
                runs,
                average_score,
                average_duration_ms,
                by_type,
                by_bucket,
            })
        })
    }
}

fn skip_reason_name(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::Protected => "protected",
        SkipReason::AlreadyProcessed => "already_processed",
        SkipReason::DryRun => "dry_run",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeStatistics {
    pub document_type: String,
    pub count: i64,
    pub average_score: f64,
}

/// Aggregates over every recorded result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStatistics {
    pub total: i64,
    pub processed: i64,
    pub skipped: i64,
    pub errors: i64,
    pub runs: i64,
    pub average_score: Option<f64>,
    pub average_duration_ms: f64,
    pub by_type: Vec<TypeStatistics>,
    pub by_bucket: Vec<(String, i64)>,
}

/// Returns the default store path: `~/.docxmd/history.db`.
pub fn default_history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".docxmd").join("history.db"))
}
