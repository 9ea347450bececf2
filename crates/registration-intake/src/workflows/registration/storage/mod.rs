//! Persistence backends for submitted applications.
//!
//! JSON files are the default. The `SQLite` store keeps the same records in a
//! single `applications` table for deployments that prefer a database.

mod file;
pub mod schema;
mod sqlite;

pub use file::FileApplicationRepository;
pub use sqlite::SqliteApplicationRepository;

use super::domain::{Application, ApplicationId};
use super::repository::{ApplicationRepository, RepositoryError};
use crate::config::{StorageBackend, StorageConfig};

/// Backend chosen at startup from [`StorageConfig`].
#[derive(Debug)]
pub enum ConfiguredRepository {
    File(FileApplicationRepository),
    Sqlite(SqliteApplicationRepository),
}

impl ConfiguredRepository {
    pub fn open(config: &StorageConfig) -> Result<Self, RepositoryError> {
        match config.backend {
            StorageBackend::File => Ok(Self::File(FileApplicationRepository::new(
                config.data_dir.clone(),
            ))),
            StorageBackend::Sqlite => Ok(Self::Sqlite(SqliteApplicationRepository::open(
                &config.database_path,
            )?)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::File(repo) => format!("json files in {}", repo.dir().display()),
            Self::Sqlite(repo) => format!("sqlite database {}", repo.path().display()),
        }
    }
}

impl ApplicationRepository for ConfiguredRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        match self {
            Self::File(repo) => repo.insert(application),
            Self::Sqlite(repo) => repo.insert(application),
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        match self {
            Self::File(repo) => repo.fetch(id),
            Self::Sqlite(repo) => repo.fetch(id),
        }
    }

    fn list(&self, limit: usize) -> Result<Vec<Application>, RepositoryError> {
        match self {
            Self::File(repo) => repo.list(limit),
            Self::Sqlite(repo) => repo.list(limit),
        }
    }
}
