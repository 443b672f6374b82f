//! Ownership catalog: one row per repository per ingestion run.
//!
//! # Invariants
//! - A run and all of its repository rows are written in one transaction.
//! - `status`, `owner_kind` and `owner_display` columns mirror the stored
//!   resolution JSON so reports can filter without decoding it.

use crate::db::DbError;
use crate::ingest::IngestedRepo;
use crate::model::owner::OwnerKind;
use crate::model::ownership::{OwnershipParseResult, OwnershipStatus};
use crate::model::profile::RepoProfile;
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RunId = Uuid;
pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug)]
pub enum CatalogError {
    Db(DbError),
    RunNotFound(RunId),
    InvalidData(String),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::RunNotFound(id) => write!(f, "ingest run not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid catalog data: {message}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::RunNotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for CatalogError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One recorded ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub id: RunId,
    pub org: String,
    /// Unix epoch milliseconds.
    pub started_at: i64,
    pub repo_count: u32,
}

/// One repository's stored decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRecord {
    pub full_name: String,
    pub status: OwnershipStatus,
    pub owner_kind: OwnerKind,
    pub owner_display: String,
    pub ownership: OwnershipParseResult,
}

pub trait OwnershipCatalog {
    /// Stores every repository of one run and returns the new run id.
    fn record_run(&mut self, org: &str, repos: &[IngestedRepo]) -> CatalogResult<RunId>;
    /// Most recently recorded run, if any.
    fn latest_run(&self) -> CatalogResult<Option<RunSummary>>;
    /// Decisions of `run_id` sorted by full name, optionally one status only.
    fn list_resolutions(
        &self,
        run_id: RunId,
        status: Option<OwnershipStatus>,
    ) -> CatalogResult<Vec<ResolutionRecord>>;
    fn status_counts(&self, run_id: RunId) -> CatalogResult<BTreeMap<OwnershipStatus, u32>>;
    /// Profiles of `run_id` sorted by full name.
    fn load_profiles(&self, run_id: RunId) -> CatalogResult<Vec<RepoProfile>>;
}

pub struct SqliteOwnershipCatalog<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteOwnershipCatalog<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    fn ensure_run_exists(&self, run_id: RunId) -> CatalogResult<()> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM ingest_runs WHERE id = ?1);",
            [run_id.to_string()],
            |row| row.get(0),
        )?;
        if exists {
            Ok(())
        } else {
            Err(CatalogError::RunNotFound(run_id))
        }
    }
}

impl OwnershipCatalog for SqliteOwnershipCatalog<'_> {
    fn record_run(&mut self, org: &str, repos: &[IngestedRepo]) -> CatalogResult<RunId> {
        let run_id = Uuid::new_v4();
        let run_id_text = run_id.to_string();
        let repo_count = u32::try_from(repos.len())
            .map_err(|_| CatalogError::InvalidData(format!("too many repos: {}", repos.len())))?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO ingest_runs (id, org, repo_count) VALUES (?1, ?2, ?3);",
            params![run_id_text.as_str(), org, repo_count],
        )?;

        {
            let mut insert = tx.prepare(
                "INSERT INTO repo_ownership (
                    run_id,
                    full_name,
                    status,
                    owner_kind,
                    owner_display,
                    profile_json,
                    resolution_json
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            )?;
            for repo in repos {
                let resolved = &repo.ownership.resolved;
                insert.execute(params![
                    run_id_text.as_str(),
                    repo.profile.full_name(),
                    resolved.status.as_str(),
                    resolved.resolved_owner.kind().as_str(),
                    resolved.resolved_owner.display(),
                    to_json(&repo.profile)?,
                    to_json(&repo.ownership)?,
                ])?;
            }
        }
        tx.commit()?;

        info!(
            "event=catalog_record_run module=repo status=ok run_id={} org={} repos={}",
            run_id, org, repo_count
        );
        Ok(run_id)
    }

    fn latest_run(&self) -> CatalogResult<Option<RunSummary>> {
        self.conn
            .query_row(
                "SELECT id, org, started_at, repo_count
                 FROM ingest_runs
                 ORDER BY started_at DESC, rowid DESC
                 LIMIT 1;",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>("id")?,
                        row.get::<_, String>("org")?,
                        row.get::<_, i64>("started_at")?,
                        row.get::<_, u32>("repo_count")?,
                    ))
                },
            )
            .optional()?
            .map(|(id, org, started_at, repo_count)| -> CatalogResult<RunSummary> {
                Ok(RunSummary {
                    id: parse_run_id(&id)?,
                    org,
                    started_at,
                    repo_count,
                })
            })
            .transpose()
    }

    fn list_resolutions(
        &self,
        run_id: RunId,
        status: Option<OwnershipStatus>,
    ) -> CatalogResult<Vec<ResolutionRecord>> {
        self.ensure_run_exists(run_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT full_name, status, owner_kind, owner_display, resolution_json
             FROM repo_ownership
             WHERE run_id = ?1
               AND (?2 IS NULL OR status = ?2)
             ORDER BY full_name ASC;",
        )?;
        let mut rows = stmt.query(params![run_id.to_string(), status.map(|s| s.as_str())])?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_resolution_row(row)?);
        }
        Ok(records)
    }

    fn status_counts(&self, run_id: RunId) -> CatalogResult<BTreeMap<OwnershipStatus, u32>> {
        self.ensure_run_exists(run_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*) AS total
             FROM repo_ownership
             WHERE run_id = ?1
             GROUP BY status;",
        )?;
        let mut rows = stmt.query([run_id.to_string()])?;

        let mut counts = BTreeMap::new();
        while let Some(row) = rows.next()? {
            let status_text: String = row.get("status")?;
            counts.insert(parse_status(&status_text)?, row.get::<_, u32>("total")?);
        }
        Ok(counts)
    }

    fn load_profiles(&self, run_id: RunId) -> CatalogResult<Vec<RepoProfile>> {
        self.ensure_run_exists(run_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT profile_json
             FROM repo_ownership
             WHERE run_id = ?1
             ORDER BY full_name ASC;",
        )?;
        let mut rows = stmt.query([run_id.to_string()])?;

        let mut profiles = Vec::new();
        while let Some(row) = rows.next()? {
            let json: String = row.get("profile_json")?;
            profiles.push(from_json(&json)?);
        }
        Ok(profiles)
    }
}

fn parse_resolution_row(row: &Row<'_>) -> CatalogResult<ResolutionRecord> {
    let full_name: String = row.get("full_name")?;
    let status_text: String = row.get("status")?;
    let kind_text: String = row.get("owner_kind")?;
    let resolution_json: String = row.get("resolution_json")?;

    let record = ResolutionRecord {
        status: parse_status(&status_text)?,
        owner_kind: parse_owner_kind(&kind_text)?,
        owner_display: row.get("owner_display")?,
        ownership: from_json(&resolution_json)?,
        full_name,
    };
    if record.ownership.resolved.status != record.status {
        return Err(CatalogError::InvalidData(format!(
            "status column `{}` disagrees with stored resolution for {}",
            record.status, record.full_name
        )));
    }
    Ok(record)
}

fn parse_run_id(value: &str) -> CatalogResult<RunId> {
    Uuid::parse_str(value)
        .map_err(|err| CatalogError::InvalidData(format!("invalid run id `{value}`: {err}")))
}

fn parse_status(value: &str) -> CatalogResult<OwnershipStatus> {
    value.parse().map_err(CatalogError::InvalidData)
}

fn parse_owner_kind(value: &str) -> CatalogResult<OwnerKind> {
    match value {
        "team" => Ok(OwnerKind::Team),
        "person" => Ok(OwnerKind::Person),
        "unknown" => Ok(OwnerKind::Unknown),
        other => Err(CatalogError::InvalidData(format!(
            "invalid owner kind `{other}`"
        ))),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> CatalogResult<String> {
    serde_json::to_string(value)
        .map_err(|err| CatalogError::InvalidData(format!("failed to encode row: {err}")))
}

fn from_json<T: serde::de::DeserializeOwned>(json: &str) -> CatalogResult<T> {
    serde_json::from_str(json)
        .map_err(|err| CatalogError::InvalidData(format!("failed to decode row: {err}")))
}
