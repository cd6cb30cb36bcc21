//! Chip collections: the "selected items" lists fed by suggestion search.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::AppError;
use crate::profile::models::SectionName;

pub const MAX_CHIPS: usize = 50;

/// The four suggestion-backed chip lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipKind {
    Skills,
    Interests,
    Strengths,
    Weaknesses,
}

impl ChipKind {
    pub const ALL: [ChipKind; 4] = [
        ChipKind::Skills,
        ChipKind::Interests,
        ChipKind::Strengths,
        ChipKind::Weaknesses,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChipKind::Skills => "skills",
            ChipKind::Interests => "interests",
            ChipKind::Strengths => "strengths",
            ChipKind::Weaknesses => "weaknesses",
        }
    }

    /// Profile section that stores this list.
    pub fn section(&self) -> SectionName {
        match self {
            ChipKind::Skills => SectionName::Skills,
            ChipKind::Interests => SectionName::Interests,
            ChipKind::Strengths | ChipKind::Weaknesses => SectionName::StrengthsWeaknesses,
        }
    }

    pub fn master_path(&self) -> String {
        format!("/api/get-{}", self.as_str())
    }

    /// Only skills and interests have a remote search endpoint.
    pub fn search_path(&self) -> Option<String> {
        match self {
            ChipKind::Skills | ChipKind::Interests => Some(format!("/api/search-{}", self.as_str())),
            ChipKind::Strengths | ChipKind::Weaknesses => None,
        }
    }

    pub fn cap(&self) -> usize {
        MAX_CHIPS
    }
}

impl fmt::Display for ChipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChipKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChipKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::Validation(format!("Unknown chip list '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Empty,
    Duplicate,
    MaxReached,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChipView {
    pub label: String,
    pub removable: bool,
}

/// Ordered, duplicate-free list of strings. Membership is exact after trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChipCollection {
    items: Vec<String>,
}

impl ChipCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from stored values, trimming and dropping duplicates
    /// and anything past `cap`.
    pub fn from_items<I, S>(items: I, cap: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut collection = Self::new();
        for item in items {
            collection.add(item.as_ref(), cap);
        }
        collection
    }

    pub fn add(&mut self, item: &str, cap: usize) -> AddOutcome {
        let item = item.trim();
        if item.is_empty() {
            return AddOutcome::Empty;
        }
        if self.contains(item) {
            return AddOutcome::Duplicate;
        }
        if self.items.len() >= cap {
            return AddOutcome::MaxReached;
        }
        self.items.push(item.to_string());
        AddOutcome::Added
    }

    /// Returns whether anything was removed.
    pub fn remove(&mut self, item: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|existing| existing != item);
        self.items.len() != before
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|existing| existing == item)
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn render(&self, removable: bool) -> Vec<ChipView> {
        self.items
            .iter()
            .map(|label| ChipView {
                label: label.clone(),
                removable,
            })
            .collect()
    }
}

/// Multi-select chips over a fixed option list (learning formats, work environments).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionToggle {
    options: Vec<String>,
    selected: Vec<String>,
}

impl OptionToggle {
    pub fn new(options: &[&str]) -> Self {
        Self {
            options: options.iter().map(|o| o.to_string()).collect(),
            selected: Vec::new(),
        }
    }

    /// Flips `value` on or off. Returns the new selection state of `value`.
    pub fn toggle(&mut self, value: &str) -> bool {
        let value = value.trim();
        if let Some(pos) = self.selected.iter().position(|s| s == value) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(value.to_string());
            true
        }
    }

    /// Replaces the selection, dropping blanks and duplicates.
    pub fn set<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.selected.clear();
        for value in values {
            let value = value.as_ref().trim();
            if !value.is_empty() && !self.is_selected(value) {
                self.selected.push(value.to_string());
            }
        }
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.iter().any(|s| s == value)
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> Vec<String> {
        self.selected.clone()
    }
}

/// Single-select chips: picking replaces whatever was selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SingleChoice {
    options: Vec<String>,
    selected: Option<String>,
}

impl SingleChoice {
    pub fn new(options: &[&str]) -> Self {
        Self {
            options: options.iter().map(|o| o.to_string()).collect(),
            selected: None,
        }
    }

    pub fn pick(&mut self, value: &str) {
        let value = value.trim();
        self.selected = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }
}
