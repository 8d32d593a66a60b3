use serde::Serialize;

use crate::sections::detail::SectionDetail;

/// A single field-level validation failure, rendered inline by clients.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for e in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 30;
pub const TITLE_MAX: usize = 200;
pub const CONTENT_MAX: usize = 100_000;

/// Route prefixes and service words a profile must not shadow.
const RESERVED_USERNAMES: &[&str] = &[
    "admin", "api", "health", "profiles", "posts", "sections", "new", "edit", "settings", "zest",
];

/// Usernames are lowercase alphanumerics and hyphens, no edge hyphens.
pub fn check_username(errors: &mut ValidationErrors, username: &str) {
    if username.len() < USERNAME_MIN || username.len() > USERNAME_MAX {
        errors.push(
            "username",
            format!("must be {USERNAME_MIN}-{USERNAME_MAX} characters"),
        );
        return;
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        errors.push(
            "username",
            "only lowercase letters, digits and hyphens are allowed",
        );
        return;
    }
    if username.starts_with('-') || username.ends_with('-') {
        errors.push("username", "cannot start or end with a hyphen");
        return;
    }
    if RESERVED_USERNAMES.contains(&username) {
        errors.push("username", "this username is reserved");
    }
}

pub fn check_required(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(field, "is required");
    } else if value.len() > TITLE_MAX {
        errors.push(field, format!("must be at most {TITLE_MAX} characters"));
    }
}

/// URLs must be absolute http(s) and free of whitespace.
pub fn check_url(errors: &mut ValidationErrors, field: &str, url: &str) {
    let url = url.trim();
    if url.is_empty() {
        errors.push(field, "is required");
        return;
    }
    let has_scheme = url.starts_with("http://") || url.starts_with("https://");
    let host_len = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .len();
    if !has_scheme || host_len == 0 || url.chars().any(char::is_whitespace) {
        errors.push(field, "must be a valid http(s) URL");
    }
}

fn check_url_opt(errors: &mut ValidationErrors, field: &str, url: Option<&str>) {
    if let Some(url) = url {
        if !url.trim().is_empty() {
            check_url(errors, field, url);
        }
    }
}

/// Years are free text but must start with a four-digit year, e.g.
/// "2020", "2019-2021", "2018 - present".
pub fn check_year(errors: &mut ValidationErrors, field: &str, year: &str) {
    let year = year.trim();
    if year.is_empty() {
        errors.push(field, "is required");
        return;
    }
    let leading_digits = year.chars().take_while(|c| c.is_ascii_digit()).count();
    if leading_digits != 4 || year.len() > 32 {
        errors.push(field, "must start with a four-digit year");
    }
}

fn check_year_opt(errors: &mut ValidationErrors, field: &str, year: Option<&str>) {
    if let Some(year) = year {
        if !year.trim().is_empty() {
            check_year(errors, field, year);
        }
    }
}

/// Validates a section payload field-by-field before it reaches the store.
pub fn validate_detail(detail: &SectionDetail) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    match detail {
        SectionDetail::WorkExperience(d) => {
            check_required(&mut errors, "title", &d.title);
            check_required(&mut errors, "company", &d.company);
            check_year(&mut errors, "year_start", &d.year_start);
            check_year_opt(&mut errors, "year_end", d.year_end.as_deref());
            check_url_opt(&mut errors, "url", d.url.as_deref());
        }
        SectionDetail::Projects(d) => {
            check_required(&mut errors, "title", &d.title);
            check_year(&mut errors, "year", &d.year);
            check_url_opt(&mut errors, "url", d.url.as_deref());
        }
        SectionDetail::SideProjects(d) => {
            check_required(&mut errors, "title", &d.title);
            check_year(&mut errors, "year", &d.year);
            check_url_opt(&mut errors, "url", d.url.as_deref());
        }
        SectionDetail::Exhibitions(d) => {
            check_required(&mut errors, "title", &d.title);
            check_required(&mut errors, "venue", &d.venue);
            check_year(&mut errors, "year", &d.year);
            check_url_opt(&mut errors, "url", d.url.as_deref());
        }
        SectionDetail::Speaking(d) => {
            check_required(&mut errors, "title", &d.title);
            check_required(&mut errors, "event", &d.event);
            check_year(&mut errors, "year", &d.year);
            check_url_opt(&mut errors, "url", d.url.as_deref());
        }
        SectionDetail::Writing(d) => {
            check_required(&mut errors, "title", &d.title);
            check_required(&mut errors, "publisher", &d.publisher);
            check_year(&mut errors, "year", &d.year);
            check_url_opt(&mut errors, "url", d.url.as_deref());
        }
        SectionDetail::Awards(d) => {
            check_required(&mut errors, "title", &d.title);
            check_required(&mut errors, "presented_by", &d.presented_by);
            check_year(&mut errors, "year", &d.year);
            check_url_opt(&mut errors, "url", d.url.as_deref());
        }
        SectionDetail::Features(d) => {
            check_required(&mut errors, "title", &d.title);
            check_required(&mut errors, "publisher", &d.publisher);
            check_year(&mut errors, "year", &d.year);
            check_url_opt(&mut errors, "url", d.url.as_deref());
        }
        SectionDetail::Volunteering(d) => {
            check_required(&mut errors, "title", &d.title);
            check_required(&mut errors, "organization", &d.organization);
            check_year(&mut errors, "year_start", &d.year_start);
            check_year_opt(&mut errors, "year_end", d.year_end.as_deref());
            check_url_opt(&mut errors, "url", d.url.as_deref());
        }
        SectionDetail::Education(d) => {
            check_required(&mut errors, "school", &d.school);
            check_year(&mut errors, "year_start", &d.year_start);
            check_year_opt(&mut errors, "year_end", d.year_end.as_deref());
            check_url_opt(&mut errors, "url", d.url.as_deref());
        }
        SectionDetail::Certifications(d) => {
            check_required(&mut errors, "title", &d.title);
            check_required(&mut errors, "organization", &d.organization);
            check_year(&mut errors, "year", &d.year);
            check_url_opt(&mut errors, "url", d.url.as_deref());
        }
        SectionDetail::Links(d) => {
            check_required(&mut errors, "title", &d.title);
            check_url(&mut errors, "url", &d.url);
        }
    }

    errors.into_result()
}

/// Validates post fields shared by create and edit.
pub fn validate_post_fields(title: &str, content: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_required(&mut errors, "title", title);
    if content.len() > CONTENT_MAX {
        errors.push("content", format!("must be at most {CONTENT_MAX} characters"));
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::detail::{LinkDetail, ProjectDetail};

    fn username_errors(name: &str) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        check_username(&mut errors, name);
        errors
    }

    #[test]
    fn test_username_accepts_simple_handles() {
        assert!(username_errors("alice").is_empty());
        assert!(username_errors("jo-2024").is_empty());
        assert!(username_errors("abc").is_empty());
    }

    #[test]
    fn test_username_rejects_too_short() {
        assert!(!username_errors("ab").is_empty());
    }

    #[test]
    fn test_username_rejects_uppercase_and_symbols() {
        assert!(!username_errors("Alice").is_empty());
        assert!(!username_errors("al ice").is_empty());
        assert!(!username_errors("al_ice").is_empty());
    }

    #[test]
    fn test_username_rejects_edge_hyphens() {
        assert!(!username_errors("-alice").is_empty());
        assert!(!username_errors("alice-").is_empty());
    }

    #[test]
    fn test_username_rejects_reserved() {
        assert!(!username_errors("admin").is_empty());
        assert!(!username_errors("api").is_empty());
    }

    #[test]
    fn test_url_accepts_http_and_https() {
        let mut errors = ValidationErrors::default();
        check_url(&mut errors, "url", "https://zest.example/path?q=1");
        check_url(&mut errors, "url", "http://localhost:3000");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_url_rejects_missing_scheme_and_whitespace() {
        let mut errors = ValidationErrors::default();
        check_url(&mut errors, "url", "zest.example");
        check_url(&mut errors, "url", "https://bad domain.example");
        check_url(&mut errors, "url", "https://");
        assert_eq!(errors.fields.len(), 3);
    }

    #[test]
    fn test_year_accepts_single_and_range() {
        let mut errors = ValidationErrors::default();
        check_year(&mut errors, "year", "2020");
        check_year(&mut errors, "year", "2019-2021");
        check_year(&mut errors, "year", "2018 - present");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_year_rejects_garbage() {
        let mut errors = ValidationErrors::default();
        check_year(&mut errors, "year", "twenty-twenty");
        check_year(&mut errors, "year", "20");
        check_year(&mut errors, "year", "");
        assert_eq!(errors.fields.len(), 3);
    }

    #[test]
    fn test_detail_missing_title_fails() {
        let detail = SectionDetail::Projects(ProjectDetail {
            title: "  ".to_string(),
            client: None,
            year: "2020".to_string(),
            url: None,
            description: None,
        });
        let err = validate_detail(&detail).unwrap_err();
        assert_eq!(err.fields[0].field, "title");
    }

    #[test]
    fn test_link_requires_url() {
        let detail = SectionDetail::Links(LinkDetail {
            title: "Dribbble".to_string(),
            url: "dribbble.com/alice".to_string(),
        });
        let err = validate_detail(&detail).unwrap_err();
        assert_eq!(err.fields[0].field, "url");
    }

    #[test]
    fn test_valid_project_passes() {
        let detail = SectionDetail::Projects(ProjectDetail {
            title: "X".to_string(),
            client: Some("Acme".to_string()),
            year: "2020".to_string(),
            url: Some("https://x.example".to_string()),
            description: Some("Brand site".to_string()),
        });
        assert!(validate_detail(&detail).is_ok());
    }

    #[test]
    fn test_post_fields_require_title() {
        assert!(validate_post_fields("", "body").is_err());
        assert!(validate_post_fields("Title", "body").is_ok());
    }
}
