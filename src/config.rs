use std::env;
use std::path::PathBuf;

use crate::digest::DEFAULT_DIGEST_SIZE;
use crate::generator::DEFAULT_JOB_COUNT;
use crate::store::Database;

/// Runtime configuration loaded from environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// SQLite file holding all persisted state.
    /// Default: platform data directory, e.g. ~/.local/share/jobtrack/jobtrack.db
    pub database_path: PathBuf,

    /// Number of postings in a generated dataset. Default: 60
    pub job_count: usize,

    /// Number of postings in a daily digest. Default: 10
    pub digest_size: usize,
}

impl Config {
    /// Optional environment variables:
    /// - JOBTRACK_DB: path to the database file
    /// - JOBTRACK_JOB_COUNT: dataset size
    /// - JOBTRACK_DIGEST_SIZE: digest length
    ///
    /// A `.env` file in the working directory is loaded first when present.
    /// Unparseable numbers fall back to their defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_path = lookup("JOBTRACK_DB")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(Database::default_path);

        let job_count = lookup("JOBTRACK_JOB_COUNT")
            .and_then(|s| s.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_JOB_COUNT);

        let digest_size = lookup("JOBTRACK_DIGEST_SIZE")
            .and_then(|s| s.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_DIGEST_SIZE);

        Config {
            database_path,
            job_count,
            digest_size,
        }
    }
}
