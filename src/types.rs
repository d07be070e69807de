use chrono::{DateTime, Utc};

use crate::error::{RepopageError, Result};

/// GitHub logins are at most 39 characters.
const MAX_LOGIN_LEN: usize = 39;

/// One repository summary as shown in the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub url: String,
    pub stars: u32,
    pub fork: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Repository {
    pub fn full_name(&self) -> String {
        if self.owner.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.owner, self.name)
        }
    }
}

/// Check a login before any request is made for it.
///
/// Logins consist of ASCII alphanumerics and single hyphens, and may not
/// start or end with a hyphen. Surrounding whitespace is trimmed.
pub fn validate_user(user: &str) -> Result<String> {
    let user = user.trim();

    if user.is_empty() {
        return Err(RepopageError::InvalidUser("user name is empty".to_string()));
    }
    if user.len() > MAX_LOGIN_LEN {
        return Err(RepopageError::InvalidUser(format!(
            "'{}' is longer than {} characters",
            user, MAX_LOGIN_LEN
        )));
    }
    if !user.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(RepopageError::InvalidUser(format!(
            "'{}' contains characters not allowed in a login",
            user
        )));
    }
    if user.starts_with('-') || user.ends_with('-') || user.contains("--") {
        return Err(RepopageError::InvalidUser(format!(
            "'{}' has a misplaced hyphen",
            user
        )));
    }

    Ok(user.to_string())
}

/// Short relative age like "3d", "5h", "now"
pub fn format_age(dt: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(dt);

    if duration.num_days() > 365 {
        format!("{}y", duration.num_days() / 365)
    } else if duration.num_days() > 0 {
        format!("{}d", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m", duration.num_minutes())
    } else {
        "now".to_string()
    }
}
