//! Input normalization applied to every inbound field before validation.

/// Trim, drop backslash escapes, and HTML-escape a free-text field.
pub fn sanitize_input(raw: &str) -> String {
    escape_html(&strip_slashes(raw.trim()))
}

/// Keep only the characters permitted in an e-mail address.
pub fn sanitize_email(raw: &str) -> String {
    raw.chars().filter(|c| is_email_char(*c)).collect()
}

/// Sanitize each skill tag, dropping the ones left empty.
pub fn sanitize_skills(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|skill| sanitize_input(skill))
        .filter(|skill| !skill.is_empty())
        .collect()
}

fn strip_slashes(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('0') => out.push('\0'),
                Some(next) => out.push(next),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

fn is_email_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-=?^_`{|}~@.[]".contains(c)
}
