//! SQLite package index
//!
//! Built wholesale by `makecache` and read by `add` and `search`. The store
//! is opened for the duration of one command and never shared.

use std::path::{Path, PathBuf};

use apm_schema::{MAX_RESULTS, PackageRecord, rank_by_relevance};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

/// Records inserted per transaction during a rebuild.
const BATCH_SIZE: usize = 500;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("no local package index at {}; generate it with 'apm makecache'", .0.display())]
    Missing(PathBuf),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A record that could not be written during a rebuild.
#[derive(Debug)]
pub struct RecordError {
    pub name: String,
    pub error: rusqlite::Error,
}

/// Outcome of [`PackageIndex::rebuild`].
#[derive(Debug, Default)]
pub struct RebuildReport {
    pub inserted: usize,
    pub errors: Vec<RecordError>,
}

/// Outcome of [`PackageIndex::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    NotExists,
}

#[derive(Debug)]
pub struct PackageIndex {
    conn: Connection,
}

impl PackageIndex {
    /// Open an existing index. A missing file or table is [`IndexError::Missing`].
    pub fn open(path: &Path) -> Result<Self, IndexError> {
        if !path.exists() {
            return Err(IndexError::Missing(path.to_path_buf()));
        }
        let conn = Connection::open(path)?;
        let has_table: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'packages'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        if has_table.is_none() {
            return Err(IndexError::Missing(path.to_path_buf()));
        }
        Ok(Self { conn })
    }

    /// Replace the whole index at `path` with `records`.
    ///
    /// The old file is deleted before anything is written. Records are
    /// inserted in batches; a record that fails is reported and skipped, so an
    /// interrupted rebuild leaves only the records written so far.
    pub fn rebuild(
        path: &Path,
        records: impl IntoIterator<Item = PackageRecord>,
    ) -> Result<(Self, RebuildReport), IndexError> {
        Self::remove(path)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| IndexError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut conn = Connection::open(path)?;
        conn.execute_batch(
            "
            CREATE TABLE packages (
                name TEXT PRIMARY KEY,
                version TEXT NOT NULL,
                description TEXT NOT NULL
            );
            ",
        )?;

        let mut report = RebuildReport::default();
        let records: Vec<PackageRecord> = records.into_iter().collect();
        for batch in records.chunks(BATCH_SIZE) {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO packages (name, version, description) VALUES (?1, ?2, ?3)",
                )?;
                for record in batch {
                    match stmt.execute(params![record.name, record.version, record.description]) {
                        Ok(_) => report.inserted += 1,
                        Err(error) => {
                            tracing::warn!("skipping {}: {error}", record.name);
                            report.errors.push(RecordError {
                                name: record.name.clone(),
                                error,
                            });
                        }
                    }
                }
            }
            tx.commit()?;
            tracing::debug!("{} records written", report.inserted);
        }

        Ok((Self { conn }, report))
    }

    /// Exact lookup by name.
    pub fn exists(&self, name: &str) -> Result<bool, IndexError> {
        let hit: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM packages WHERE name = ?1 LIMIT 1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(hit.is_some())
    }

    /// Up to [`MAX_RESULTS`] records whose name contains `query`, ranked
    /// exact / prefix / contains and alphabetical within each tier.
    pub fn search(&self, query: &str) -> Result<Vec<PackageRecord>, IndexError> {
        let pattern = format!("%{}%", escape_like(query));
        let mut stmt = self.conn.prepare(
            "SELECT name, version, description FROM packages
             WHERE name LIKE ?1 ESCAPE '\\' ORDER BY name",
        )?;
        let rows = stmt
            .query_map(params![pattern], |row| {
                Ok(PackageRecord::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rank_by_relevance(rows, query, PackageRecord::name, MAX_RESULTS))
    }

    /// Number of records in the index.
    pub fn count(&self) -> Result<usize, IndexError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM packages", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Delete the index file at `path`.
    pub fn remove(path: &Path) -> Result<Removal, IndexError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(Removal::Removed),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Removal::NotExists),
            Err(source) => Err(IndexError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

fn escape_like(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(name: &str) -> PackageRecord {
        PackageRecord::new(name, "1.0", format!("{name} description"))
    }

    #[test]
    fn test_open_missing_index() {
        let dir = tempdir().unwrap();
        let err = PackageIndex::open(&dir.path().join("apm.db")).unwrap_err();
        assert!(matches!(err, IndexError::Missing(_)));
        assert!(err.to_string().contains("apm makecache"));
    }

    #[test]
    fn test_rebuild_replaces_previous_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache").join("apm.db");

        let (_, first) = PackageIndex::rebuild(&path, vec![record("old")]).unwrap();
        assert_eq!(first.inserted, 1);

        let (index, second) =
            PackageIndex::rebuild(&path, vec![record("firefox"), record("git")]).unwrap();
        assert_eq!(second.inserted, 2);
        assert!(index.exists("firefox").unwrap());
        assert!(!index.exists("old").unwrap());
        assert_eq!(index.count().unwrap(), 2);
    }

    #[test]
    fn test_rebuild_collects_record_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apm.db");
        let (index, report) =
            PackageIndex::rebuild(&path, vec![record("jq"), record("jq"), record("yq")]).unwrap();

        assert_eq!(report.inserted, 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].name, "jq");
        assert!(index.exists("yq").unwrap());
    }

    #[test]
    fn test_exists_is_exact() {
        let dir = tempdir().unwrap();
        let (index, _) =
            PackageIndex::rebuild(&dir.path().join("apm.db"), vec![record("ripgrep")]).unwrap();
        assert!(index.exists("ripgrep").unwrap());
        assert!(!index.exists("ripgre").unwrap());
        assert!(!index.exists("pkgs.ripgrep").unwrap());
    }

    #[test]
    fn test_search_tiers() {
        let dir = tempdir().unwrap();
        let names = [
            "zzzcontainsexactmatchzzz",
            "prefixexactmatch",
            "exactmatch-suffix",
            "unrelated",
            "exactmatch",
        ];
        let (index, _) = PackageIndex::rebuild(
            &dir.path().join("apm.db"),
            names.iter().map(|n| record(n)),
        )
        .unwrap();

        let found: Vec<String> = index
            .search("exactmatch")
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(
            found,
            vec![
                "exactmatch",
                "exactmatch-suffix",
                "prefixexactmatch",
                "zzzcontainsexactmatchzzz"
            ]
        );
    }

    #[test]
    fn test_search_caps_results_and_escapes_wildcards() {
        let dir = tempdir().unwrap();
        let (index, _) = PackageIndex::rebuild(
            &dir.path().join("apm.db"),
            (0..25)
                .map(|i| record(&format!("lib{i:02}")))
                .chain([record("a_b"), record("axb")]),
        )
        .unwrap();

        assert_eq!(index.search("lib").unwrap().len(), MAX_RESULTS);
        let underscore: Vec<String> = index
            .search("a_b")
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(underscore, vec!["a_b"]);
    }

    #[test]
    fn test_remove_reports_not_exists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apm.db");
        PackageIndex::rebuild(&path, vec![record("x")]).unwrap();

        assert_eq!(PackageIndex::remove(&path).unwrap(), Removal::Removed);
        assert_eq!(PackageIndex::remove(&path).unwrap(), Removal::NotExists);
    }
}
