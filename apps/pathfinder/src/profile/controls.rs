use std::collections::BTreeSet;

use serde::Serialize;

use crate::profile::completeness::CompletionState;
use crate::profile::models::SectionName;

pub const FINALIZE_LABEL: &str = "Save Full Info";
pub const FINALIZED_LABEL: &str = "Full Info Saved ✓";

/// Which section controls are locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "sections")]
pub enum LockState {
    Open,
    Sections(BTreeSet<SectionName>),
    All,
}

impl LockState {
    /// Everything complete locks everything; otherwise only completed sections lock.
    pub fn from_completion(completion: &CompletionState) -> Self {
        if completion.all_complete() {
            LockState::All
        } else if completion.count() == 0 {
            LockState::Open
        } else {
            LockState::Sections(completion.sections().clone())
        }
    }

    pub fn locks(&self, section: SectionName) -> bool {
        match self {
            LockState::Open => false,
            LockState::Sections(locked) => locked.contains(&section),
            LockState::All => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionControls {
    pub section: SectionName,
    pub inputs_enabled: bool,
    pub save_enabled: bool,
    pub chips_removable: bool,
    pub saved: bool,
}

/// Everything a front end needs to enable or disable its controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlsView {
    pub sections: Vec<SectionControls>,
    pub active: SectionName,
    pub finalize_enabled: bool,
    pub finalize_label: &'static str,
    pub edit_visible: bool,
}

impl ControlsView {
    pub fn project(
        lock: &LockState,
        completion: &CompletionState,
        editing: bool,
        finalize_enabled: bool,
        active: SectionName,
    ) -> Self {
        let sections = SectionName::ALL
            .iter()
            .map(|&section| {
                let enabled = !lock.locks(section);
                SectionControls {
                    section,
                    inputs_enabled: enabled,
                    save_enabled: enabled,
                    chips_removable: enabled,
                    saved: completion.is_complete(section),
                }
            })
            .collect();

        let finalized = !editing && !finalize_enabled && completion.all_complete();
        Self {
            sections,
            active,
            finalize_enabled,
            finalize_label: if finalized { FINALIZED_LABEL } else { FINALIZE_LABEL },
            edit_visible: !editing && *lock != LockState::Open,
        }
    }

    pub fn section(&self, section: SectionName) -> Option<&SectionControls> {
        self.sections.iter().find(|c| c.section == section)
    }
}
