/// Applications table. `skills` holds a JSON array; `submitted_date` uses `YYYY-MM-DD HH:MM:SS`.
pub const CREATE_APPLICATIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS applications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    application_id TEXT UNIQUE NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    dob TEXT NOT NULL,
    gender TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT NOT NULL,
    alt_phone TEXT,
    address TEXT NOT NULL,
    city TEXT NOT NULL,
    state TEXT NOT NULL,
    pincode TEXT NOT NULL,
    qualification TEXT NOT NULL,
    institution TEXT NOT NULL,
    percentage TEXT NOT NULL,
    course TEXT NOT NULL,
    skills TEXT,
    experience TEXT,
    why_join TEXT NOT NULL,
    submitted_date TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

pub const CREATE_SUBMITTED_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_applications_submitted ON applications(submitted_date DESC)
";

pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_APPLICATIONS_TABLE, CREATE_SUBMITTED_INDEX];

pub(crate) const SELECT_COLUMNS: &str = "application_id, first_name, last_name, dob, gender, \
     email, phone, alt_phone, address, city, state, pincode, qualification, institution, \
     percentage, course, skills, experience, why_join, submitted_date";
