use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{ffi, params, Connection, ErrorCode, OptionalExtension};
use tracing::{debug, info};

use super::schema::{SCHEMA_STATEMENTS, SELECT_COLUMNS};
use crate::workflows::registration::domain::{
    format_submitted_date, parse_submitted_date, Application, ApplicationId,
};
use crate::workflows::registration::repository::{ApplicationRepository, RepositoryError};

/// `SQLite`-backed store using the `applications` table.
#[derive(Debug)]
pub struct SqliteApplicationRepository {
    path: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteApplicationRepository {
    /// Open or create the database, creating parent directories and the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| {
                RepositoryError::Unavailable(format!("{}: {err}", parent.display()))
            })?;
        }

        debug!("opening application database at {}", path.display());
        let conn = Connection::open(&path).map_err(storage_error)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(storage_error)?;
        initialize_schema(&conn)?;

        info!(path = %path.display(), "application database ready");
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory().map_err(storage_error)?;
        initialize_schema(&conn)?;
        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::Unavailable("database lock poisoned".to_string()))
    }

    fn row_to_application(row: &rusqlite::Row) -> rusqlite::Result<Application> {
        let dob: String = row.get(3)?;
        let skills: Option<String> = row.get(16)?;
        let submitted: String = row.get(19)?;

        let dob = NaiveDate::parse_from_str(&dob, "%Y-%m-%d").map_err(|err| conversion(3, err))?;
        let skills = match skills {
            Some(raw) if !raw.is_empty() => {
                serde_json::from_str(&raw).map_err(|err| conversion(16, err))?
            }
            _ => Vec::new(),
        };
        let submitted_date = parse_submitted_date(&submitted).map_err(|err| conversion(19, err))?;

        Ok(Application {
            application_id: ApplicationId(row.get(0)?),
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            dob,
            gender: row.get(4)?,
            email: row.get(5)?,
            phone: row.get(6)?,
            alt_phone: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
            address: row.get(8)?,
            city: row.get(9)?,
            state: row.get(10)?,
            pincode: row.get(11)?,
            qualification: row.get(12)?,
            institution: row.get(13)?,
            percentage: row.get(14)?,
            course: row.get(15)?,
            skills,
            experience: row.get::<_, Option<String>>(17)?.unwrap_or_default(),
            why_join: row.get(18)?,
            submitted_date,
        })
    }
}

impl ApplicationRepository for SqliteApplicationRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let skills = serde_json::to_string(&application.skills)
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
        let conn = self.conn()?;

        let result = conn.execute(
            r"
            INSERT INTO applications (
                application_id, first_name, last_name, dob, gender, email,
                phone, alt_phone, address, city, state, pincode,
                qualification, institution, percentage, course,
                skills, experience, why_join, submitted_date
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20
            )
            ",
            params![
                application.application_id.as_str(),
                application.first_name,
                application.last_name,
                application.dob.format("%Y-%m-%d").to_string(),
                application.gender,
                application.email,
                application.phone,
                application.alt_phone,
                application.address,
                application.city,
                application.state,
                application.pincode,
                application.qualification,
                application.institution,
                application.percentage,
                application.course,
                skills,
                application.experience,
                application.why_join,
                format_submitted_date(&application.submitted_date),
            ],
        );

        match result {
            Ok(_) => {
                debug!(application_id = %application.application_id, "application row inserted");
                Ok(application)
            }
            Err(err) if is_unique_violation(&err) => Err(RepositoryError::Conflict),
            Err(err) => Err(storage_error(err)),
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {SELECT_COLUMNS} FROM applications WHERE application_id = ?1"),
            [id.as_str()],
            Self::row_to_application,
        )
        .optional()
        .map_err(storage_error)
    }

    fn list(&self, limit: usize) -> Result<Vec<Application>, RepositoryError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM applications \
                 ORDER BY submitted_date DESC, application_id DESC LIMIT ?1"
            ))
            .map_err(storage_error)?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let applications = stmt
            .query_map([limit], Self::row_to_application)
            .map_err(storage_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_error)?;
        Ok(applications)
    }
}

fn initialize_schema(conn: &Connection) -> Result<(), RepositoryError> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, []).map_err(storage_error)?;
    }
    Ok(())
}

// Only a duplicate application id is a conflict; other constraint failures are storage faults.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn storage_error(err: rusqlite::Error) -> RepositoryError {
    RepositoryError::Unavailable(format!("sqlite: {err}"))
}

fn conversion<E>(index: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err))
}
