use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Format used for `submittedDate` on stored records.
pub const SUBMITTED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Server-generated token identifying one submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ids are `APP` followed by digits; anything else never names a stored record.
    pub fn is_well_formed(&self) -> bool {
        let Some(digits) = self.0.strip_prefix("APP") else {
            return false;
        };
        !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw payload as posted by the browser form or an API client.
///
/// Every field tolerates being absent or `null` so validation can report all
/// missing fields at once instead of failing on the first deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationForm {
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dob: String,
    #[serde(deserialize_with = "null_as_default")]
    pub gender: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub alt_phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pincode: String,
    #[serde(deserialize_with = "null_as_default")]
    pub qualification: String,
    #[serde(deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(deserialize_with = "null_as_default")]
    pub percentage: String,
    #[serde(deserialize_with = "null_as_default")]
    pub course: String,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: String,
    #[serde(deserialize_with = "null_as_default")]
    pub why_join: String,
}

impl ApplicationForm {
    /// Build a form from urlencoded pairs. Repeated `skills`/`skills[]` keys collect into the list.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            let value = value.into();
            match key.as_ref() {
                "firstName" => form.first_name = value,
                "lastName" => form.last_name = value,
                "dob" => form.dob = value,
                "gender" => form.gender = value,
                "email" => form.email = value,
                "phone" => form.phone = value,
                "altPhone" => form.alt_phone = value,
                "address" => form.address = value,
                "city" => form.city = value,
                "state" => form.state = value,
                "pincode" => form.pincode = value,
                "qualification" => form.qualification = value,
                "institution" => form.institution = value,
                "percentage" => form.percentage = value,
                "course" => form.course = value,
                "skills" | "skills[]" => form.skills.push(value),
                "experience" => form.experience = value,
                "whyJoin" => form.why_join = value,
                _ => {}
            }
        }
        form
    }
}

/// A validated, persisted registration record. Never mutated after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub alt_phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub qualification: String,
    pub institution: String,
    pub percentage: String,
    pub course: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub why_join: String,
    pub application_id: ApplicationId,
    #[serde(
        serialize_with = "serialize_submitted_date",
        deserialize_with = "deserialize_submitted_date"
    )]
    pub submitted_date: NaiveDateTime,
}

impl Application {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Applicant fields that passed validation, waiting for an id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub alt_phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub qualification: String,
    pub institution: String,
    pub percentage: String,
    pub course: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub why_join: String,
}

impl ValidatedForm {
    pub fn into_application(
        self,
        application_id: ApplicationId,
        submitted_date: NaiveDateTime,
    ) -> Application {
        Application {
            first_name: self.first_name,
            last_name: self.last_name,
            dob: self.dob,
            gender: self.gender,
            email: self.email,
            phone: self.phone,
            alt_phone: self.alt_phone,
            address: self.address,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            qualification: self.qualification,
            institution: self.institution,
            percentage: self.percentage,
            course: self.course,
            skills: self.skills,
            experience: self.experience,
            why_join: self.why_join,
            application_id,
            submitted_date,
        }
    }
}

pub(crate) fn format_submitted_date(value: &NaiveDateTime) -> String {
    value.format(SUBMITTED_DATE_FORMAT).to_string()
}

pub(crate) fn parse_submitted_date(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw.trim(), SUBMITTED_DATE_FORMAT)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn serialize_submitted_date<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_submitted_date(value))
}

fn deserialize_submitted_date<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_submitted_date(&raw).map_err(serde::de::Error::custom)
}
