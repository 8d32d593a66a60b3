use serde::{Deserialize, Serialize};

/// The closed set of CV section types a profile can carry.
///
/// The declaration order of `ALL` is the canonical default rendering order
/// used whenever a profile has not chosen its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    WorkExperience,
    Projects,
    SideProjects,
    Exhibitions,
    Speaking,
    Writing,
    Awards,
    Features,
    Volunteering,
    Education,
    Certifications,
    Links,
}

impl SectionKind {
    /// Every kind, in default rendering order.
    pub const ALL: &'static [SectionKind] = &[
        SectionKind::WorkExperience,
        SectionKind::Projects,
        SectionKind::SideProjects,
        SectionKind::Exhibitions,
        SectionKind::Speaking,
        SectionKind::Writing,
        SectionKind::Awards,
        SectionKind::Features,
        SectionKind::Volunteering,
        SectionKind::Education,
        SectionKind::Certifications,
        SectionKind::Links,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::WorkExperience => "work_experience",
            SectionKind::Projects => "projects",
            SectionKind::SideProjects => "side_projects",
            SectionKind::Exhibitions => "exhibitions",
            SectionKind::Speaking => "speaking",
            SectionKind::Writing => "writing",
            SectionKind::Awards => "awards",
            SectionKind::Features => "features",
            SectionKind::Volunteering => "volunteering",
            SectionKind::Education => "education",
            SectionKind::Certifications => "certifications",
            SectionKind::Links => "links",
        }
    }

    /// Parses a stored or path-supplied identifier. Unknown strings are
    /// `None`, never an error value that could leak into rendering.
    pub fn parse(raw: &str) -> Option<SectionKind> {
        SectionKind::ALL.iter().copied().find(|k| k.as_str() == raw)
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_twelve_kinds() {
        assert_eq!(SectionKind::ALL.len(), 12);
    }

    #[test]
    fn test_parse_roundtrip() {
        for kind in SectionKind::ALL {
            assert_eq!(SectionKind::parse(kind.as_str()), Some(*kind));
        }
    }

    #[test]
    fn test_parse_unknown_is_none() {
        assert_eq!(SectionKind::parse("podcasts"), None);
        assert_eq!(SectionKind::parse(""), None);
        assert_eq!(SectionKind::parse("Projects"), None);
    }

    #[test]
    fn test_serde_matches_as_str() {
        for kind in SectionKind::ALL {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
