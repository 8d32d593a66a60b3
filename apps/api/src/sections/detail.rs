use serde::{Deserialize, Serialize};

use crate::sections::kind::SectionKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkExperienceDetail {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub year_start: String,
    pub year_end: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectDetail {
    pub title: String,
    pub client: Option<String>,
    pub year: String,
    pub url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SideProjectDetail {
    pub title: String,
    pub year: String,
    pub url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExhibitionDetail {
    pub title: String,
    pub venue: String,
    pub year: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeakingDetail {
    pub title: String,
    pub event: String,
    pub year: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WritingDetail {
    pub title: String,
    pub publisher: String,
    pub year: String,
    pub url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AwardDetail {
    pub title: String,
    pub presented_by: String,
    pub year: String,
    pub url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureDetail {
    pub title: String,
    pub publisher: String,
    pub year: String,
    pub url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VolunteeringDetail {
    pub title: String,
    pub organization: String,
    pub location: Option<String>,
    pub year_start: String,
    pub year_end: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EducationDetail {
    pub school: String,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub location: Option<String>,
    pub year_start: String,
    pub year_end: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CertificationDetail {
    pub title: String,
    pub organization: String,
    pub year: String,
    pub url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkDetail {
    pub title: String,
    pub url: String,
}

/// Kind-specific section payload, stored in the `data` JSONB column.
/// The serde tag matches [`SectionKind::as_str`], so a stored row's `kind`
/// column and its `data` discriminator can never disagree silently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionDetail {
    WorkExperience(WorkExperienceDetail),
    Projects(ProjectDetail),
    SideProjects(SideProjectDetail),
    Exhibitions(ExhibitionDetail),
    Speaking(SpeakingDetail),
    Writing(WritingDetail),
    Awards(AwardDetail),
    Features(FeatureDetail),
    Volunteering(VolunteeringDetail),
    Education(EducationDetail),
    Certifications(CertificationDetail),
    Links(LinkDetail),
}

impl SectionDetail {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionDetail::WorkExperience(_) => SectionKind::WorkExperience,
            SectionDetail::Projects(_) => SectionKind::Projects,
            SectionDetail::SideProjects(_) => SectionKind::SideProjects,
            SectionDetail::Exhibitions(_) => SectionKind::Exhibitions,
            SectionDetail::Speaking(_) => SectionKind::Speaking,
            SectionDetail::Writing(_) => SectionKind::Writing,
            SectionDetail::Awards(_) => SectionKind::Awards,
            SectionDetail::Features(_) => SectionKind::Features,
            SectionDetail::Volunteering(_) => SectionKind::Volunteering,
            SectionDetail::Education(_) => SectionKind::Education,
            SectionDetail::Certifications(_) => SectionKind::Certifications,
            SectionDetail::Links(_) => SectionKind::Links,
        }
    }

    /// The headline shown in list views, mirrored into the `title` column.
    pub fn title(&self) -> &str {
        match self {
            SectionDetail::WorkExperience(d) => &d.title,
            SectionDetail::Projects(d) => &d.title,
            SectionDetail::SideProjects(d) => &d.title,
            SectionDetail::Exhibitions(d) => &d.title,
            SectionDetail::Speaking(d) => &d.title,
            SectionDetail::Writing(d) => &d.title,
            SectionDetail::Awards(d) => &d.title,
            SectionDetail::Features(d) => &d.title,
            SectionDetail::Volunteering(d) => &d.title,
            SectionDetail::Education(d) => &d.school,
            SectionDetail::Certifications(d) => &d.title,
            SectionDetail::Links(d) => &d.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_matches_kind_str() {
        let detail = SectionDetail::Awards(AwardDetail {
            title: "Site of the Day".to_string(),
            presented_by: "Awwwards".to_string(),
            year: "2021".to_string(),
            url: None,
            description: None,
        });
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["kind"], "awards");
        assert_eq!(detail.kind(), SectionKind::Awards);
    }

    #[test]
    fn test_roundtrip_work_experience() {
        let detail = SectionDetail::WorkExperience(WorkExperienceDetail {
            title: "Design Lead".to_string(),
            company: "Studio North".to_string(),
            location: Some("Oslo".to_string()),
            year_start: "2019".to_string(),
            year_end: None,
            url: Some("https://studionorth.example".to_string()),
            description: None,
        });
        let json = serde_json::to_string(&detail).unwrap();
        let back: SectionDetail = serde_json::from_str(&json).unwrap();
        assert_eq!(back, detail);
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let raw = r#"{"kind":"podcasts","title":"Ep 1"}"#;
        assert!(serde_json::from_str::<SectionDetail>(raw).is_err());
    }

    #[test]
    fn test_education_title_is_school() {
        let detail = SectionDetail::Education(EducationDetail {
            school: "RISD".to_string(),
            degree: Some("BFA".to_string()),
            field_of_study: None,
            location: None,
            year_start: "2012".to_string(),
            year_end: Some("2016".to_string()),
            url: None,
            description: None,
        });
        assert_eq!(detail.title(), "RISD");
    }
}
