use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;

/// The independently saveable sections of a profile, declared in canonical order.
/// `Ord` follows declaration order, so a `BTreeSet<SectionName>` iterates canonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionName {
    #[serde(rename = "basicInfo")]
    BasicInfo,
    #[serde(rename = "education")]
    Education,
    #[serde(rename = "skills")]
    Skills,
    #[serde(rename = "interests")]
    Interests,
    #[serde(rename = "personality")]
    Personality,
    #[serde(rename = "strengthsWeaknesses")]
    StrengthsWeaknesses,
    #[serde(rename = "learningPreferences")]
    LearningPreferences,
    #[serde(rename = "workenvironment")]
    WorkEnvironment,
    #[serde(rename = "salary")]
    Salary,
    #[serde(rename = "certifications")]
    Certifications,
}

impl SectionName {
    pub const ALL: [SectionName; 10] = [
        SectionName::BasicInfo,
        SectionName::Education,
        SectionName::Skills,
        SectionName::Interests,
        SectionName::Personality,
        SectionName::StrengthsWeaknesses,
        SectionName::LearningPreferences,
        SectionName::WorkEnvironment,
        SectionName::Salary,
        SectionName::Certifications,
    ];

    /// Wire key of the section inside the stored profile document.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionName::BasicInfo => "basicInfo",
            SectionName::Education => "education",
            SectionName::Skills => "skills",
            SectionName::Interests => "interests",
            SectionName::Personality => "personality",
            SectionName::StrengthsWeaknesses => "strengthsWeaknesses",
            SectionName::LearningPreferences => "learningPreferences",
            SectionName::WorkEnvironment => "workenvironment",
            SectionName::Salary => "salary",
            SectionName::Certifications => "certifications",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SectionName::BasicInfo => "Basic Info",
            SectionName::Education => "Education",
            SectionName::Skills => "Skills",
            SectionName::Interests => "Interests",
            SectionName::Personality => "Personality",
            SectionName::StrengthsWeaknesses => "Strengths & Weaknesses",
            SectionName::LearningPreferences => "Learning Preferences",
            SectionName::WorkEnvironment => "Work Environment",
            SectionName::Salary => "Salary Expectations",
            SectionName::Certifications => "Certifications",
        }
    }

    /// The section that follows this one, `None` for the terminal section.
    pub fn next(&self) -> Option<SectionName> {
        let index = Self::ALL.iter().position(|s| s == self)?;
        Self::ALL.get(index + 1).copied()
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionName::ALL
            .iter()
            .copied()
            .find(|section| section.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::Validation(format!("Unknown section '{s}'")))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub full_name: String,
    pub age: Option<u32>,
    pub gender: String,
    pub current_education: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchoolRecord {
    pub state: String,
    pub board: String,
    pub score: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeniorSecondary {
    pub state: String,
    pub board: String,
    pub stream: String,
    pub score: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diploma {
    pub state: String,
    pub institute: String,
    pub branch: String,
    pub score: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Undergrad {
    pub state: String,
    pub institute: String,
    pub degree: String,
    pub branch: String,
    pub cgpa: String,
}

/// `class12` and `diploma` are mutually exclusive; `ug` only for undergraduates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub class10: SchoolRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class12: Option<SeniorSecondary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diploma: Option<Diploma>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ug: Option<Undergrad>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interests {
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Personality {
    pub work_type: String,
    pub work_style: String,
    pub environment_preference: String,
    pub stress_level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrengthsWeaknesses {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningPreferences {
    pub formats: Vec<String>,
    pub pace: String,
    pub mode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkEnvironment {
    pub environment: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    pub expected: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub name: String,
    pub org: String,
    pub issue_date: String,
    pub expiry_date: String,
    pub id: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certifications {
    pub certifications: Vec<Certification>,
}

/// One section's payload, as sent to the save endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionData {
    BasicInfo(BasicInfo),
    Education(Education),
    Skills(Skills),
    Interests(Interests),
    Personality(Personality),
    StrengthsWeaknesses(StrengthsWeaknesses),
    LearningPreferences(LearningPreferences),
    WorkEnvironment(WorkEnvironment),
    Salary(Salary),
    Certifications(Certifications),
}

impl SectionData {
    pub fn section(&self) -> SectionName {
        match self {
            SectionData::BasicInfo(_) => SectionName::BasicInfo,
            SectionData::Education(_) => SectionName::Education,
            SectionData::Skills(_) => SectionName::Skills,
            SectionData::Interests(_) => SectionName::Interests,
            SectionData::Personality(_) => SectionName::Personality,
            SectionData::StrengthsWeaknesses(_) => SectionName::StrengthsWeaknesses,
            SectionData::LearningPreferences(_) => SectionName::LearningPreferences,
            SectionData::WorkEnvironment(_) => SectionName::WorkEnvironment,
            SectionData::Salary(_) => SectionName::Salary,
            SectionData::Certifications(_) => SectionName::Certifications,
        }
    }

    pub fn to_value(&self) -> Result<Value, AppError> {
        Ok(serde_json::to_value(self)?)
    }
}
