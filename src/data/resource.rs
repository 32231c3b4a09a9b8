//! Resource kinds served by the Harvey API
//!
//! Each kind maps to one path segment below `/api/`.

use std::fmt;
use std::str::FromStr;

use crate::error::HarveyError;

/// A classification domain exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Isco,
    IscoEsco,
    IscoWorkArea,
    IscoRevision,
    EscoSkill,
    Isced,
    Sknace,
    Kov,
    KovSchool,
    School,
    SchoolType,
    EducationLevel,
    EducationForm,
    Region,
    District,
    Municipality,
    Country,
    Organization,
    Position,
    PositionGroup,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 20] = [
        ResourceKind::Isco,
        ResourceKind::IscoEsco,
        ResourceKind::IscoWorkArea,
        ResourceKind::IscoRevision,
        ResourceKind::EscoSkill,
        ResourceKind::Isced,
        ResourceKind::Sknace,
        ResourceKind::Kov,
        ResourceKind::KovSchool,
        ResourceKind::School,
        ResourceKind::SchoolType,
        ResourceKind::EducationLevel,
        ResourceKind::EducationForm,
        ResourceKind::Region,
        ResourceKind::District,
        ResourceKind::Municipality,
        ResourceKind::Country,
        ResourceKind::Organization,
        ResourceKind::Position,
        ResourceKind::PositionGroup,
    ];

    /// Path segment below `/api/`, also used as the record cache key prefix
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Isco => "isco",
            ResourceKind::IscoEsco => "isco-esco",
            ResourceKind::IscoWorkArea => "isco-work-area",
            ResourceKind::IscoRevision => "isco-revision",
            ResourceKind::EscoSkill => "esco-skill",
            ResourceKind::Isced => "isced",
            ResourceKind::Sknace => "sknace",
            ResourceKind::Kov => "kov",
            ResourceKind::KovSchool => "kov-school",
            ResourceKind::School => "school",
            ResourceKind::SchoolType => "school-type",
            ResourceKind::EducationLevel => "education-level",
            ResourceKind::EducationForm => "education-form",
            ResourceKind::Region => "region",
            ResourceKind::District => "district",
            ResourceKind::Municipality => "municipality",
            ResourceKind::Country => "country",
            ResourceKind::Organization => "organization",
            ResourceKind::Position => "position",
            ResourceKind::PositionGroup => "position-group",
        }
    }

    /// Human-readable description
    pub fn description(self) -> &'static str {
        match self {
            ResourceKind::Isco => "ISCO occupations",
            ResourceKind::IscoEsco => "ISCO to ESCO occupation mapping",
            ResourceKind::IscoWorkArea => "ISCO work areas",
            ResourceKind::IscoRevision => "ISCO classification revisions",
            ResourceKind::EscoSkill => "ESCO skills",
            ResourceKind::Isced => "ISCED education classification",
            ResourceKind::Sknace => "SK NACE economic activities",
            ResourceKind::Kov => "KOV study programme codes",
            ResourceKind::KovSchool => "Study programmes offered by schools",
            ResourceKind::School => "Schools",
            ResourceKind::SchoolType => "School types",
            ResourceKind::EducationLevel => "Education levels",
            ResourceKind::EducationForm => "Forms of study",
            ResourceKind::Region => "Regions",
            ResourceKind::District => "Districts",
            ResourceKind::Municipality => "Municipalities",
            ResourceKind::Country => "Countries",
            ResourceKind::Organization => "Organizations",
            ResourceKind::Position => "Job positions",
            ResourceKind::PositionGroup => "Job position groups",
        }
    }

    /// Finds the kind whose path segment is `path`
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.path() == path)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for ResourceKind {
    type Err = HarveyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path(s).ok_or_else(|| HarveyError::UnknownResource(s.to_string()))
    }
}
