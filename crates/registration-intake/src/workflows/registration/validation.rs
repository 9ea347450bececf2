use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use super::domain::{ApplicationForm, ValidatedForm};
use super::sanitize::{sanitize_email, sanitize_input, sanitize_skills};

const NAME_PATTERN: &str = r"^[a-zA-Z\s]+$";
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const PHONE_PATTERN: &str = r"^[0-9]{10}$";
const PINCODE_PATTERN: &str = r"^[0-9]{6}$";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// How the browser should treat a field while the applicant types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Name,
    Email,
    Digits,
    Date,
}

/// One entry of the shared rule table. Served verbatim to the client script.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<&'static str>,
    /// Limit on the trimmed value as typed, before HTML escaping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    pub required_message: &'static str,
    pub invalid_message: &'static str,
    pub too_long_message: &'static str,
}

const fn required(
    field: &'static str,
    kind: FieldKind,
    max_length: usize,
    message: &'static str,
    too_long_message: &'static str,
) -> FieldRule {
    FieldRule {
        field,
        kind,
        required: true,
        pattern: None,
        max_length: Some(max_length),
        required_message: message,
        invalid_message: message,
        too_long_message,
    }
}

static RULES: [FieldRule; 18] = [
    FieldRule {
        pattern: Some(NAME_PATTERN),
        invalid_message: "First name may contain letters and spaces only",
        ..required(
            "firstName",
            FieldKind::Name,
            100,
            "First name is required",
            "First name must be at most 100 characters",
        )
    },
    FieldRule {
        pattern: Some(NAME_PATTERN),
        invalid_message: "Last name may contain letters and spaces only",
        ..required(
            "lastName",
            FieldKind::Name,
            100,
            "Last name is required",
            "Last name must be at most 100 characters",
        )
    },
    FieldRule {
        pattern: Some(EMAIL_PATTERN),
        ..required(
            "email",
            FieldKind::Email,
            255,
            "Valid email is required",
            "Email must be at most 255 characters",
        )
    },
    FieldRule {
        pattern: Some(PHONE_PATTERN),
        ..required(
            "phone",
            FieldKind::Digits,
            15,
            "Valid 10-digit phone number is required",
            "Phone number must be at most 15 digits",
        )
    },
    FieldRule {
        field: "altPhone",
        kind: FieldKind::Digits,
        required: false,
        pattern: Some(PHONE_PATTERN),
        max_length: Some(15),
        required_message: "",
        invalid_message: "Alternate phone must be a 10-digit number",
        too_long_message: "Alternate phone must be at most 15 digits",
    },
    FieldRule {
        invalid_message: "Date of birth must be a valid past date (YYYY-MM-DD)",
        ..required(
            "dob",
            FieldKind::Date,
            10,
            "Date of birth is required",
            "Date of birth must be a valid past date (YYYY-MM-DD)",
        )
    },
    required(
        "gender",
        FieldKind::Text,
        20,
        "Gender is required",
        "Gender must be at most 20 characters",
    ),
    required(
        "address",
        FieldKind::Text,
        1000,
        "Address is required",
        "Address must be at most 1000 characters",
    ),
    required(
        "city",
        FieldKind::Name,
        100,
        "City is required",
        "City must be at most 100 characters",
    ),
    required(
        "state",
        FieldKind::Name,
        100,
        "State is required",
        "State must be at most 100 characters",
    ),
    FieldRule {
        pattern: Some(PINCODE_PATTERN),
        ..required(
            "pincode",
            FieldKind::Digits,
            10,
            "Valid 6-digit pincode is required",
            "Pincode must be at most 10 digits",
        )
    },
    required(
        "qualification",
        FieldKind::Text,
        100,
        "Qualification is required",
        "Qualification must be at most 100 characters",
    ),
    required(
        "institution",
        FieldKind::Text,
        255,
        "Institution name is required",
        "Institution name must be at most 255 characters",
    ),
    required(
        "percentage",
        FieldKind::Text,
        50,
        "Percentage/CGPA is required",
        "Percentage/CGPA must be at most 50 characters",
    ),
    required(
        "course",
        FieldKind::Text,
        255,
        "Course selection is required",
        "Course selection must be at most 255 characters",
    ),
    FieldRule {
        field: "skills",
        kind: FieldKind::Text,
        required: false,
        pattern: None,
        max_length: None,
        required_message: "",
        invalid_message: "",
        too_long_message: "",
    },
    FieldRule {
        field: "experience",
        kind: FieldKind::Text,
        required: false,
        pattern: None,
        max_length: Some(5000),
        required_message: "",
        invalid_message: "",
        too_long_message: "Experience must be at most 5000 characters",
    },
    required(
        "whyJoin",
        FieldKind::Text,
        5000,
        "Please tell us why you want to join",
        "Please keep your answer within 5000 characters",
    ),
];

/// The rule table in field order.
pub fn field_rules() -> &'static [FieldRule] {
    &RULES
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every rule failure for one submission, in rule-table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|error| error.field).collect()
    }

    pub fn joined(&self) -> String {
        self.errors
            .iter()
            .map(|error| error.message.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Server-side validator enforcing the shared rule table.
#[derive(Debug)]
pub struct FormValidator {
    patterns: Vec<Option<Regex>>,
}

impl Default for FormValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl FormValidator {
    /// # Panics
    ///
    /// Panics if a built-in rule pattern fails to compile.
    pub fn new() -> Self {
        let patterns = RULES
            .iter()
            .map(|rule| {
                rule.pattern
                    .map(|pattern| Regex::new(pattern).expect("invalid built-in field pattern"))
            })
            .collect();
        Self { patterns }
    }

    /// Process-wide validator so regexes compile once.
    pub fn shared() -> &'static FormValidator {
        static VALIDATOR: OnceLock<FormValidator> = OnceLock::new();
        VALIDATOR.get_or_init(FormValidator::new)
    }

    /// Sanitize the form and check it against every rule. `today` bounds the date of birth.
    pub fn validate(
        &self,
        form: &ApplicationForm,
        today: NaiveDate,
    ) -> Result<ValidatedForm, ValidationErrors> {
        let clean = sanitize_form(form);
        let mut errors = Vec::new();

        for (rule, pattern) in RULES.iter().zip(&self.patterns) {
            let (Some(value), Some(typed)) =
                (field_value(&clean, rule.field), field_value(form, rule.field))
            else {
                continue;
            };

            if value.is_empty() {
                if rule.required {
                    errors.push(FieldError {
                        field: rule.field,
                        message: rule.required_message.to_string(),
                    });
                }
                continue;
            }

            // Length is counted on the typed value, before escaping.
            if let Some(max) = rule.max_length {
                if typed.trim().chars().count() > max {
                    errors.push(FieldError {
                        field: rule.field,
                        message: rule.too_long_message.to_string(),
                    });
                    continue;
                }
            }

            let pattern_ok = pattern.as_ref().map_or(true, |regex| regex.is_match(value));
            let kind_ok = match rule.kind {
                FieldKind::Date => parse_past_date(value, today).is_some(),
                _ => true,
            };
            if !pattern_ok || !kind_ok {
                errors.push(FieldError {
                    field: rule.field,
                    message: rule.invalid_message.to_string(),
                });
            }
        }

        if !errors.is_empty() {
            return Err(ValidationErrors { errors });
        }

        let Some(dob) = parse_past_date(&clean.dob, today) else {
            return Err(ValidationErrors {
                errors: vec![FieldError {
                    field: "dob",
                    message: "Date of birth is required".to_string(),
                }],
            });
        };

        Ok(ValidatedForm {
            first_name: clean.first_name,
            last_name: clean.last_name,
            dob,
            gender: clean.gender,
            email: clean.email,
            phone: clean.phone,
            alt_phone: clean.alt_phone,
            address: clean.address,
            city: clean.city,
            state: clean.state,
            pincode: clean.pincode,
            qualification: clean.qualification,
            institution: clean.institution,
            percentage: clean.percentage,
            course: clean.course,
            skills: clean.skills,
            experience: clean.experience,
            why_join: clean.why_join,
        })
    }
}

fn sanitize_form(form: &ApplicationForm) -> ApplicationForm {
    ApplicationForm {
        first_name: sanitize_input(&form.first_name),
        last_name: sanitize_input(&form.last_name),
        dob: sanitize_input(&form.dob),
        gender: sanitize_input(&form.gender),
        email: sanitize_email(&form.email),
        phone: sanitize_input(&form.phone),
        alt_phone: sanitize_input(&form.alt_phone),
        address: sanitize_input(&form.address),
        city: sanitize_input(&form.city),
        state: sanitize_input(&form.state),
        pincode: sanitize_input(&form.pincode),
        qualification: sanitize_input(&form.qualification),
        institution: sanitize_input(&form.institution),
        percentage: sanitize_input(&form.percentage),
        course: sanitize_input(&form.course),
        skills: sanitize_skills(&form.skills),
        experience: sanitize_input(&form.experience),
        why_join: sanitize_input(&form.why_join),
    }
}

// Skills are a list; the table only carries them so the client knows the key.
fn field_value<'a>(form: &'a ApplicationForm, field: &str) -> Option<&'a str> {
    let value = match field {
        "firstName" => &form.first_name,
        "lastName" => &form.last_name,
        "dob" => &form.dob,
        "gender" => &form.gender,
        "email" => &form.email,
        "phone" => &form.phone,
        "altPhone" => &form.alt_phone,
        "address" => &form.address,
        "city" => &form.city,
        "state" => &form.state,
        "pincode" => &form.pincode,
        "qualification" => &form.qualification,
        "institution" => &form.institution,
        "percentage" => &form.percentage,
        "course" => &form.course,
        "experience" => &form.experience,
        "whyJoin" => &form.why_join,
        _ => return None,
    };
    Some(value.as_str())
}

fn parse_past_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .filter(|date| *date <= today)
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

impl std::error::Error for ValidationErrors {}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
