use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::workflows::registration::domain::{Application, ApplicationId};
use crate::workflows::registration::repository::{ApplicationRepository, RepositoryError};

const FILE_PREFIX: &str = "application_";
const FILE_SUFFIX: &str = ".json";

/// One pretty-printed JSON document per application under a data directory.
#[derive(Debug, Clone)]
pub struct FileApplicationRepository {
    dir: PathBuf,
}

impl FileApplicationRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/application_<id>.json`
    pub fn path_for(&self, id: &ApplicationId) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{id}{FILE_SUFFIX}"))
    }

    fn read(path: &Path) -> Result<Option<Application>, RepositoryError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(unavailable(path, err)),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| unavailable(path, err))
    }
}

impl ApplicationRepository for FileApplicationRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        if !application.application_id.is_well_formed() {
            return Err(RepositoryError::Unavailable(format!(
                "refusing to store malformed id '{}'",
                application.application_id
            )));
        }

        fs::create_dir_all(&self.dir).map_err(|err| unavailable(&self.dir, err))?;

        let path = self.path_for(&application.application_id);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                return Err(RepositoryError::Conflict)
            }
            Err(err) => return Err(unavailable(&path, err)),
        };

        let written = serde_json::to_vec_pretty(&application)
            .map_err(io::Error::from)
            .and_then(|mut payload| {
                payload.push(b'\n');
                file.write_all(&payload)
            })
            .and_then(|()| file.sync_all());
        if let Err(err) = written {
            // A half-written record would shadow the id forever.
            if let Err(cleanup) = fs::remove_file(&path) {
                warn!(path = %path.display(), %cleanup, "failed to remove partial application");
            }
            return Err(unavailable(&path, err));
        }

        debug!(path = %path.display(), "application written");
        Ok(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        if !id.is_well_formed() {
            return Ok(None);
        }
        Self::read(&self.path_for(id))
    }

    fn list(&self, limit: usize) -> Result<Vec<Application>, RepositoryError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(unavailable(&self.dir, err)),
        };

        let mut applications = Vec::new();
        for entry in entries {
            let path = entry.map_err(|err| unavailable(&self.dir, err))?.path();
            let is_record = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX));
            if !is_record {
                continue;
            }
            match Self::read(&path) {
                Ok(Some(application)) => applications.push(application),
                Ok(None) => {}
                Err(err) => warn!(path = %path.display(), %err, "skipping unreadable application"),
            }
        }

        applications.sort_by(|a, b| {
            b.submitted_date
                .cmp(&a.submitted_date)
                .then_with(|| b.application_id.cmp(&a.application_id))
        });
        applications.truncate(limit);
        Ok(applications)
    }
}

fn unavailable(path: &Path, err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Unavailable(format!("{}: {err}", path.display()))
}
