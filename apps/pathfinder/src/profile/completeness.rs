use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use crate::profile::legacy;
use crate::profile::models::SectionName;

/// How a required path must be populated for its section to count as complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirement {
    /// Present and filled (see [`is_filled`]).
    Filled,
    /// Present and not null; an empty list still counts.
    Present,
}

const SECTION_RULES: &[(SectionName, &[&str], Requirement)] = &[
    (SectionName::BasicInfo, &["basicInfo.fullName"], Requirement::Filled),
    (SectionName::Education, &["education"], Requirement::Filled),
    (SectionName::Skills, &["skills.skills"], Requirement::Filled),
    (SectionName::Interests, &["interests.interests"], Requirement::Filled),
    (SectionName::Personality, &["personality"], Requirement::Filled),
    (
        SectionName::StrengthsWeaknesses,
        &[
            "strengthsWeaknesses.strengths",
            "strengthsWeaknesses.weaknesses",
        ],
        Requirement::Filled,
    ),
    (
        SectionName::LearningPreferences,
        &["learningPreferences.formats"],
        Requirement::Filled,
    ),
    (
        SectionName::WorkEnvironment,
        &["workenvironment.environment"],
        Requirement::Filled,
    ),
    (SectionName::Salary, &["salary.expected"], Requirement::Filled),
    (
        SectionName::Certifications,
        &["certifications.certifications"],
        Requirement::Present,
    ),
];

/// The set of sections currently considered complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompletionState {
    complete: BTreeSet<SectionName>,
}

impl CompletionState {
    /// Derives completion from a profile snapshot. Pure: the same document always
    /// yields the same state, and legacy flat fields are honoured.
    pub fn from_profile(profile: &Value) -> Self {
        let normalized = legacy::normalize(profile);
        let complete = SECTION_RULES
            .iter()
            .filter(|(_, paths, requirement)| {
                paths.iter().all(|path| {
                    let value = get_nested(&normalized, path);
                    match requirement {
                        Requirement::Filled => value.map(is_filled).unwrap_or(false),
                        Requirement::Present => value.map(|v| !v.is_null()).unwrap_or(false),
                    }
                })
            })
            .map(|(section, _, _)| *section)
            .collect();
        Self { complete }
    }

    pub fn is_complete(&self, section: SectionName) -> bool {
        self.complete.contains(&section)
    }

    pub fn mark(&mut self, section: SectionName) {
        self.complete.insert(section);
    }

    pub fn all_complete(&self) -> bool {
        self.complete.len() == SectionName::ALL.len()
    }

    pub fn count(&self) -> usize {
        self.complete.len()
    }

    /// Incomplete sections in canonical order.
    pub fn missing(&self) -> Vec<SectionName> {
        SectionName::ALL
            .iter()
            .copied()
            .filter(|s| !self.complete.contains(s))
            .collect()
    }

    pub fn sections(&self) -> &BTreeSet<SectionName> {
        &self.complete
    }
}

/// Walks a dotted path (`"skills.skills"`) through nested objects.
pub fn get_nested<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

/// Not null, not a blank string, not an empty array; objects need at least one
/// filled leaf.
pub fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => map.values().any(is_filled),
        Value::Bool(_) | Value::Number(_) => true,
    }
}
