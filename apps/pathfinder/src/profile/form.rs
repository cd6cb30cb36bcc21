//! Typed form state for the profile editor.
//!
//! `FormState` is the only source of truth for field values; `collect` is a pure
//! projection of it into the payload a section save sends.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::chips::{ChipCollection, ChipKind, OptionToggle, SingleChoice, MAX_CHIPS};
use crate::errors::AppError;
use crate::profile::education::{TwelfthTrack, Visibility};
use crate::profile::legacy;
use crate::profile::merge::deep_merge;
use crate::profile::models::{
    BasicInfo, Certification, Certifications, Diploma, Education, Interests, LearningPreferences,
    Personality, Salary, SchoolRecord, SectionData, SectionName, SeniorSecondary, Skills,
    StrengthsWeaknesses, Undergrad, WorkEnvironment,
};
use crate::profile::validation::{parse_age, validate_certification, CertificationDraft};

pub const LEARNING_FORMATS: &[&str] = &[
    "Video",
    "Reading",
    "Hands-on Projects",
    "Interactive Courses",
    "Mentorship",
];

pub const WORK_ENVIRONMENTS: &[&str] = &["Remote", "Hybrid", "On-site", "Startup", "Corporate"];

pub const SALARY_RANGES: &[&str] = &["0-5 LPA", "5-10 LPA", "10-15 LPA", "15-25 LPA", "25+ LPA"];

/// Certifications keyed by position. Removing one shifts every later index down.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CertificationList {
    items: Vec<Certification>,
}

impl CertificationList {
    pub fn add(&mut self, draft: &CertificationDraft) -> Result<&Certification, AppError> {
        let cert = validate_certification(draft)?;
        self.items.push(cert);
        let index = self.items.len() - 1;
        Ok(&self.items[index])
    }

    pub fn remove(&mut self, index: usize) -> Option<Certification> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn items(&self) -> &[Certification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormState {
    pub full_name: String,
    /// Kept as typed; parsed on collect.
    pub age: String,
    pub gender: String,
    pub current_education: String,

    pub class10: SchoolRecord,
    pub track: TwelfthTrack,
    pub class12: SeniorSecondary,
    pub diploma: Diploma,
    pub ug: Undergrad,

    pub skills: ChipCollection,
    pub interests: ChipCollection,
    pub strengths: ChipCollection,
    pub weaknesses: ChipCollection,

    pub personality: Personality,

    pub learning_formats: OptionToggle,
    pub learning_pace: String,
    pub learning_mode: String,

    pub work_environment: OptionToggle,
    pub salary: SingleChoice,
    pub certifications: CertificationList,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            age: String::new(),
            gender: String::new(),
            current_education: String::new(),
            class10: SchoolRecord::default(),
            track: TwelfthTrack::default(),
            class12: SeniorSecondary::default(),
            diploma: Diploma::default(),
            ug: Undergrad::default(),
            skills: ChipCollection::new(),
            interests: ChipCollection::new(),
            strengths: ChipCollection::new(),
            weaknesses: ChipCollection::new(),
            personality: Personality::default(),
            learning_formats: OptionToggle::new(LEARNING_FORMATS),
            learning_pace: String::new(),
            learning_mode: String::new(),
            work_environment: OptionToggle::new(WORK_ENVIRONMENTS),
            salary: SingleChoice::new(SALARY_RANGES),
            certifications: CertificationList::default(),
        }
    }
}

impl FormState {
    /// Populates every field from a stored profile, nested shape first with the
    /// legacy flat fields as fallback.
    pub fn from_profile(profile: &Value) -> Self {
        let p = legacy::normalize(profile);
        let mut form = FormState::default();

        form.full_name = text(&p, &["basicInfo.fullName"]);
        form.age = age_text(p.pointer("/basicInfo/age"));
        form.gender = text(&p, &["basicInfo.gender"]);
        form.current_education = text(&p, &["basicInfo.currentEducation"]);

        form.class10 = SchoolRecord {
            state: text(&p, &["education.class10.state", "education.class10.school"]),
            board: text(&p, &["education.class10.board"]),
            score: text(&p, &["education.class10.score"]),
        };
        form.class12 = SeniorSecondary {
            state: text(&p, &["education.class12.state", "education.class12.institute"]),
            board: text(&p, &["education.class12.board"]),
            stream: text(&p, &["education.class12.stream"]),
            score: text(&p, &["education.class12.score"]),
        };
        form.diploma = Diploma {
            state: text(&p, &["education.diploma.state"]),
            institute: text(&p, &["education.diploma.institute"]),
            branch: text(&p, &["education.diploma.branch"]),
            score: text(&p, &["education.diploma.score"]),
        };
        form.ug = Undergrad {
            state: text(&p, &["education.ug.state"]),
            institute: text(&p, &["education.ug.institute", "education.ug.college"]),
            degree: text(&p, &["education.ug.degree", "education.ug.course"]),
            branch: text(&p, &["education.ug.branch"]),
            cgpa: text(&p, &["education.ug.cgpa"]),
        };
        let type12 = text(&p, &["education.type12"]);
        form.track = if !type12.is_empty() {
            TwelfthTrack::from_selector(&type12)
        } else if p.pointer("/education/diploma").map(is_object_filled).unwrap_or(false)
            && !p.pointer("/education/class12").map(is_object_filled).unwrap_or(false)
        {
            TwelfthTrack::Diploma
        } else {
            TwelfthTrack::Class12
        };

        form.skills = ChipCollection::from_items(strings(&p, "skills.skills"), MAX_CHIPS);
        form.interests = ChipCollection::from_items(strings(&p, "interests.interests"), MAX_CHIPS);
        form.strengths =
            ChipCollection::from_items(strings(&p, "strengthsWeaknesses.strengths"), MAX_CHIPS);
        form.weaknesses =
            ChipCollection::from_items(strings(&p, "strengthsWeaknesses.weaknesses"), MAX_CHIPS);

        form.personality = Personality {
            work_type: text(&p, &["personality.workType"]),
            work_style: text(&p, &["personality.workStyle"]),
            environment_preference: text(&p, &["personality.environmentPreference"]),
            stress_level: text(&p, &["personality.stressLevel"]),
        };

        form.learning_formats
            .set(strings(&p, "learningPreferences.formats"));
        form.learning_pace = text(&p, &["learningPreferences.pace"]);
        form.learning_mode = text(&p, &["learningPreferences.mode"]);
        form.work_environment
            .set(strings(&p, "workenvironment.environment"));
        form.salary.pick(&text(&p, &["salary.expected"]));

        if let Some(Value::Array(certs)) = p.pointer("/certifications/certifications") {
            form.certifications.items = certs
                .iter()
                .filter_map(|c| serde_json::from_value::<Certification>(c.clone()).ok())
                .collect();
        }

        form
    }

    /// Re-reads one section's fields from `profile`, leaving every other section's
    /// values (saved or not) as they are.
    pub fn reload_section(&mut self, section: SectionName, profile: &Value) {
        let fresh = FormState::from_profile(profile);
        match section {
            SectionName::BasicInfo => {
                self.full_name = fresh.full_name;
                self.age = fresh.age;
                self.gender = fresh.gender;
                self.current_education = fresh.current_education;
            }
            SectionName::Education => {
                self.class10 = fresh.class10;
                self.track = fresh.track;
                self.class12 = fresh.class12;
                self.diploma = fresh.diploma;
                self.ug = fresh.ug;
            }
            SectionName::Skills => self.skills = fresh.skills,
            SectionName::Interests => self.interests = fresh.interests,
            SectionName::Personality => self.personality = fresh.personality,
            SectionName::StrengthsWeaknesses => {
                self.strengths = fresh.strengths;
                self.weaknesses = fresh.weaknesses;
            }
            SectionName::LearningPreferences => {
                self.learning_formats = fresh.learning_formats;
                self.learning_pace = fresh.learning_pace;
                self.learning_mode = fresh.learning_mode;
            }
            SectionName::WorkEnvironment => self.work_environment = fresh.work_environment,
            SectionName::Salary => self.salary = fresh.salary,
            SectionName::Certifications => self.certifications = fresh.certifications,
        }
    }

    pub fn visibility(&self) -> Visibility {
        Visibility::for_level(&self.current_education)
    }

    pub fn chips(&self, kind: ChipKind) -> &ChipCollection {
        match kind {
            ChipKind::Skills => &self.skills,
            ChipKind::Interests => &self.interests,
            ChipKind::Strengths => &self.strengths,
            ChipKind::Weaknesses => &self.weaknesses,
        }
    }

    pub fn chips_mut(&mut self, kind: ChipKind) -> &mut ChipCollection {
        match kind {
            ChipKind::Skills => &mut self.skills,
            ChipKind::Interests => &mut self.interests,
            ChipKind::Strengths => &mut self.strengths,
            ChipKind::Weaknesses => &mut self.weaknesses,
        }
    }

    /// Projects one section's payload out of the form.
    pub fn collect(&self, section: SectionName) -> Result<SectionData, AppError> {
        let data = match section {
            SectionName::BasicInfo => SectionData::BasicInfo(BasicInfo {
                full_name: self.full_name.trim().to_string(),
                age: parse_age(&self.age)?,
                gender: self.gender.clone(),
                current_education: self.current_education.clone(),
            }),
            SectionName::Education => {
                let (class12, diploma) = match self.track {
                    TwelfthTrack::Class12 => (Some(self.class12.clone()), None),
                    TwelfthTrack::Diploma => (None, Some(self.diploma.clone())),
                };
                let ug = self.visibility().ug.then(|| self.ug.clone());
                SectionData::Education(Education {
                    class10: self.class10.clone(),
                    class12,
                    diploma,
                    ug,
                })
            }
            SectionName::Skills => SectionData::Skills(Skills {
                skills: self.skills.to_vec(),
            }),
            SectionName::Interests => SectionData::Interests(Interests {
                interests: self.interests.to_vec(),
            }),
            SectionName::Personality => SectionData::Personality(self.personality.clone()),
            SectionName::StrengthsWeaknesses => {
                SectionData::StrengthsWeaknesses(StrengthsWeaknesses {
                    strengths: self.strengths.to_vec(),
                    weaknesses: self.weaknesses.to_vec(),
                })
            }
            SectionName::LearningPreferences => {
                SectionData::LearningPreferences(LearningPreferences {
                    formats: self.learning_formats.selected(),
                    pace: self.learning_pace.clone(),
                    mode: self.learning_mode.clone(),
                })
            }
            SectionName::WorkEnvironment => SectionData::WorkEnvironment(WorkEnvironment {
                environment: self.work_environment.selected(),
            }),
            SectionName::Salary => SectionData::Salary(Salary {
                expected: self.salary.selected().unwrap_or_default().to_string(),
            }),
            SectionName::Certifications => SectionData::Certifications(Certifications {
                certifications: self.certifications.items().to_vec(),
            }),
        };
        Ok(data)
    }

    /// Every section collected into one nested document.
    pub fn snapshot(&self) -> Result<Value, AppError> {
        let mut doc = Value::Object(Map::new());
        for section in SectionName::ALL {
            let mut update = Map::new();
            update.insert(section.as_str().to_string(), self.collect(section)?.to_value()?);
            deep_merge(&mut doc, Value::Object(update));
        }
        Ok(doc)
    }
}

fn text(profile: &Value, paths: &[&str]) -> String {
    paths
        .iter()
        .filter_map(|path| pointer(profile, path))
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

fn strings(profile: &Value, path: &str) -> Vec<String> {
    match pointer(profile, path) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn pointer<'a>(profile: &'a Value, dotted: &str) -> Option<&'a Value> {
    profile.pointer(&format!("/{}", dotted.replace('.', "/")))
}

/// Age is stored as a JSON number or a numeric string.
fn age_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => match (n.as_u64(), n.as_f64()) {
            (Some(whole), _) => whole.to_string(),
            (None, Some(f)) if f >= 0.0 && f.fract() == 0.0 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

fn is_object_filled(value: &Value) -> bool {
    value.is_object() && crate::profile::completeness::is_filled(value)
}
