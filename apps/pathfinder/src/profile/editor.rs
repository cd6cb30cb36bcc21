use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::api_client::types::SaveResponse;
use crate::api_client::{ProfileStore, SuggestionSource};
use crate::chips::{AddOutcome, ChipKind, ChipView};
use crate::errors::AppError;
use crate::notice::Notice;
use crate::profile::completeness::CompletionState;
use crate::profile::controls::{ControlsView, LockState};
use crate::profile::education::TwelfthTrack;
use crate::profile::form::FormState;
use crate::profile::merge::{deep_merge, merge_section, stamp_updated_at};
use crate::profile::models::{Certification, SectionName};
use crate::profile::validation::{require_full_name, validate_section_data, CertificationDraft};
use crate::session::SessionStore;
use crate::suggestions::{PendingLookup, SuggestionSearch};

/// How a section save reaches the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SavePolicy {
    /// POST `{section, data}` to save-section; the server upserts.
    #[default]
    Section,
    /// Fetch, merge locally, POST the whole document to save-fullinfo.
    Merge,
}

impl fmt::Display for SavePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SavePolicy::Section => "section",
            SavePolicy::Merge => "merge",
        })
    }
}

impl FromStr for SavePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "section" => Ok(SavePolicy::Section),
            "merge" => Ok(SavePolicy::Merge),
            other => Err(AppError::Validation(format!(
                "Unknown save policy '{other}' (expected 'section' or 'merge')"
            ))),
        }
    }
}

/// Owns the profile being edited: form values, completion, lock state and the
/// queue of notices for the front end.
pub struct ProfileEditor {
    store: Arc<dyn ProfileStore>,
    suggestions: Arc<dyn SuggestionSource>,
    session: Arc<SessionStore>,
    policy: SavePolicy,
    searches: BTreeMap<ChipKind, SuggestionSearch>,

    profile: Value,
    loaded: bool,
    form: FormState,
    completion: CompletionState,
    lock: LockState,
    editing: bool,
    finalize_enabled: bool,
    active: SectionName,
    notices: Vec<Notice>,
}

impl ProfileEditor {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        suggestions: Arc<dyn SuggestionSource>,
        session: Arc<SessionStore>,
        policy: SavePolicy,
        debounce: Duration,
    ) -> Self {
        let searches = ChipKind::ALL
            .iter()
            .map(|&kind| (kind, SuggestionSearch::new(kind, debounce)))
            .collect();

        Self {
            store,
            suggestions,
            session,
            policy,
            searches,
            profile: json!({}),
            loaded: false,
            form: FormState::default(),
            completion: CompletionState::default(),
            lock: LockState::Open,
            editing: false,
            finalize_enabled: false,
            active: SectionName::BasicInfo,
            notices: Vec::new(),
        }
    }

    // ────────────────────────────────────────────────────────────
    // Loading
    // ────────────────────────────────────────────────────────────

    /// Fetches the suggestion master lists, then the stored profile.
    pub async fn init(&mut self) -> Result<(), AppError> {
        for search in self.searches.values_mut() {
            search.load_master(self.suggestions.as_ref()).await;
        }
        self.load_profile().await
    }

    pub async fn load_profile(&mut self) -> Result<(), AppError> {
        let token = self.session.require_token().map_err(|e| self.surface(e))?;

        let profile = match self.store.fetch_profile(&token).await {
            Ok(response) => {
                if !response.success {
                    debug!("get-fullinfo reported success=false, treating as empty");
                }
                response.profile
            }
            Err(AppError::NotFound(_)) => {
                info!("No stored profile yet, starting empty");
                json!({})
            }
            Err(e) => return Err(self.surface(e)),
        };

        self.profile = if profile.is_object() { profile } else { json!({}) };
        self.form = FormState::from_profile(&self.profile);
        self.loaded = true;
        let snapshot = self.profile.clone();
        self.check_completion_state(&snapshot);

        info!(
            complete = self.completion.count(),
            total = SectionName::ALL.len(),
            "Profile loaded"
        );
        Ok(())
    }

    /// Re-derives completion from `profile` and projects it onto the lock state.
    /// All complete locks every section and leaves finalize disabled (already saved).
    pub fn check_completion_state(&mut self, profile: &Value) -> &CompletionState {
        self.completion = CompletionState::from_profile(profile);
        self.lock = LockState::from_completion(&self.completion);
        self.editing = false;
        self.finalize_enabled = false;
        self.active = self
            .completion
            .missing()
            .first()
            .copied()
            .unwrap_or(SectionName::BasicInfo);
        &self.completion
    }

    // ────────────────────────────────────────────────────────────
    // Saving
    // ────────────────────────────────────────────────────────────

    /// Saves one section using the configured policy.
    pub async fn save_section(&mut self, section: SectionName, data: Value) -> Result<(), AppError> {
        let policy = self.policy;
        self.save_section_with(section, data, policy).await
    }

    /// Saves the section's current form values via fetch-merge-save.
    pub async fn save_section_merged(&mut self, section: SectionName) -> Result<(), AppError> {
        let data = self.collect_value(section)?;
        self.save_section_with(section, data, SavePolicy::Merge).await
    }

    /// Saves the section's current form values using the configured policy.
    pub async fn save_form_section(&mut self, section: SectionName) -> Result<(), AppError> {
        let data = self.collect_value(section)?;
        self.save_section(section, data).await
    }

    /// The one save pathway. Locked sections and invalid payloads never reach the network.
    pub async fn save_section_with(
        &mut self,
        section: SectionName,
        data: Value,
        policy: SavePolicy,
    ) -> Result<(), AppError> {
        if self.lock.locks(section) {
            return Err(self.surface(AppError::SectionLocked(section)));
        }
        validate_section_data(section, &data).map_err(|e| self.surface(e))?;
        let token = self.session.require_token().map_err(|e| self.surface(e))?;

        debug!(section = %section, policy = %policy, "Saving section");
        let result = match policy {
            SavePolicy::Section => self.store.save_section(&token, section, &data).await,
            SavePolicy::Merge => {
                let document = self.merged_document(&token, section, data.clone()).await;
                self.store.save_full_info(&token, &document).await
            }
        };
        let response = result.map_err(|e| self.surface(e))?;
        check_saved(response).map_err(|e| self.surface(e))?;

        self.on_section_saved(section, data);
        Ok(())
    }

    /// Current server document with `data` merged under `section`. A failed fetch
    /// merges into an empty document.
    async fn merged_document(&self, token: &str, section: SectionName, data: Value) -> Value {
        let existing = match self.store.fetch_profile(token).await {
            Ok(response) if response.profile.is_object() => response.profile,
            Ok(_) => json!({}),
            Err(e) => {
                warn!("Could not fetch profile before merge, merging into empty: {e}");
                json!({})
            }
        };
        let mut document = merge_section(existing, section, data);
        stamp_updated_at(&mut document);
        document
    }

    fn on_section_saved(&mut self, section: SectionName, data: Value) {
        let profile = std::mem::take(&mut self.profile);
        self.profile = merge_section(profile, section, data);
        self.form.reload_section(section, &self.profile);
        self.completion.mark(section);
        self.notices
            .push(Notice::success(format!("{} saved", section.title())));
        info!(section = %section, complete = self.completion.count(), "Section saved");

        if self.editing {
            self.finalize_enabled = self.completion.all_complete();
            if let Some(next) = section.next() {
                self.active = next;
            }
            return;
        }

        if self.completion.all_complete() {
            self.lock = LockState::All;
            self.finalize_enabled = true;
            self.notices.push(Notice::info(
                "All sections completed! Click 'Save Full Info' to finalize.",
            ));
            return;
        }

        self.lock = LockState::from_completion(&self.completion);
        match section.next() {
            Some(next) => self.active = next,
            None => {
                if let Some(&first_missing) = self.completion.missing().first() {
                    self.active = first_missing;
                    self.notices.push(Notice::warning(format!(
                        "Complete {} before finalizing",
                        first_missing.title()
                    )));
                }
            }
        }
    }

    /// Wholesale save of every section. Needs a full name.
    pub async fn save_all(&mut self) -> Result<(), AppError> {
        if let Err(e) = require_full_name(&self.form.full_name) {
            self.active = SectionName::BasicInfo;
            return Err(self.surface(e));
        }
        let token = self.session.require_token().map_err(|e| self.surface(e))?;
        let snapshot = self.form.snapshot().map_err(|e| self.surface(e))?;

        let mut document = self.profile.clone();
        deep_merge(&mut document, snapshot);
        stamp_updated_at(&mut document);

        let response = self
            .store
            .save_full_info(&token, &document)
            .await
            .map_err(|e| self.surface(e))?;
        check_saved(response).map_err(|e| self.surface(e))?;

        self.completion = CompletionState::from_profile(&document);
        self.profile = document;
        if self.editing {
            self.finalize_enabled = self.completion.all_complete();
        } else {
            self.lock = LockState::from_completion(&self.completion);
            self.finalize_enabled = false;
        }
        self.notices.push(Notice::success("Profile saved successfully"));
        info!("Full profile saved");
        Ok(())
    }

    /// Final save once every section is complete. Locks the editor afterwards.
    pub async fn finalize(&mut self) -> Result<(), AppError> {
        if !self.finalize_enabled || !self.completion.all_complete() {
            return Err(self.surface(AppError::ProfileIncomplete));
        }
        self.save_all().await?;
        self.editing = false;
        self.lock = LockState::All;
        self.finalize_enabled = false;
        Ok(())
    }

    // ────────────────────────────────────────────────────────────
    // Edit mode and focus
    // ────────────────────────────────────────────────────────────

    pub fn enter_edit_mode(&mut self) {
        self.editing = true;
        self.lock = LockState::Open;
        self.finalize_enabled = self.completion.all_complete();
        self.notices
            .push(Notice::info("Edit mode enabled. You can now modify your information."));
    }

    pub fn exit_edit_mode(&mut self) {
        self.editing = false;
        self.lock = LockState::All;
        self.finalize_enabled = false;
    }

    pub fn activate(&mut self, section: SectionName) {
        self.active = section;
    }

    // ────────────────────────────────────────────────────────────
    // Field edits
    // ────────────────────────────────────────────────────────────

    /// Runs `f` against the form if `section` is editable.
    pub fn edit<R>(
        &mut self,
        section: SectionName,
        f: impl FnOnce(&mut FormState) -> R,
    ) -> Result<R, AppError> {
        if self.lock.locks(section) {
            return Err(self.surface(AppError::SectionLocked(section)));
        }
        Ok(f(&mut self.form))
    }

    pub fn add_chip(&mut self, kind: ChipKind, item: &str) -> Result<AddOutcome, AppError> {
        let outcome = self.edit(kind.section(), |form| form.chips_mut(kind).add(item, kind.cap()))?;
        self.note_add_outcome(outcome);
        Ok(outcome)
    }

    pub fn remove_chip(&mut self, kind: ChipKind, item: &str) -> Result<bool, AppError> {
        self.edit(kind.section(), |form| form.chips_mut(kind).remove(item))
    }

    pub fn toggle_learning_format(&mut self, value: &str) -> Result<bool, AppError> {
        self.edit(SectionName::LearningPreferences, |form| {
            form.learning_formats.toggle(value)
        })
    }

    pub fn toggle_work_environment(&mut self, value: &str) -> Result<bool, AppError> {
        self.edit(SectionName::WorkEnvironment, |form| {
            form.work_environment.toggle(value)
        })
    }

    pub fn pick_salary(&mut self, value: &str) -> Result<(), AppError> {
        self.edit(SectionName::Salary, |form| form.salary.pick(value))
    }

    pub fn set_twelfth_track(&mut self, track: TwelfthTrack) -> Result<(), AppError> {
        self.edit(SectionName::Education, |form| form.track = track)
    }

    pub fn add_certification(&mut self, draft: &CertificationDraft) -> Result<(), AppError> {
        let added = self
            .edit(SectionName::Certifications, |form| {
                form.certifications.add(draft).map(|_| ())
            })?;
        added.map_err(|e| self.surface(e))?;
        self.notices.push(Notice::success("Certification added"));
        Ok(())
    }

    pub fn remove_certification(&mut self, index: usize) -> Result<Option<Certification>, AppError> {
        self.edit(SectionName::Certifications, |form| {
            form.certifications.remove(index)
        })
    }

    // ────────────────────────────────────────────────────────────
    // Suggestions
    // ────────────────────────────────────────────────────────────

    /// Registers a keystroke in `kind`'s search box. The returned lookup resolves to
    /// `None` when a later keystroke supersedes it.
    pub fn suggest(&mut self, kind: ChipKind, query: &str) -> Option<PendingLookup> {
        let source = self.suggestions.clone();
        let search = self.searches.get_mut(&kind)?;
        Some(search.on_input(source, query))
    }

    pub fn show_suggestions(&mut self, kind: ChipKind, results: Vec<String>) {
        if let Some(search) = self.searches.get_mut(&kind) {
            search.show(results);
        }
    }

    pub fn pick_suggestion(&mut self, kind: ChipKind, item: &str) -> Result<AddOutcome, AppError> {
        self.ensure_editable(kind.section())?;
        let outcome = match self.searches.get_mut(&kind) {
            Some(search) => search.pick(item, self.form.chips_mut(kind)),
            None => self.form.chips_mut(kind).add(item, kind.cap()),
        };
        self.note_add_outcome(outcome);
        Ok(outcome)
    }

    /// Adds the typed text verbatim (the Enter key in the search box).
    pub fn commit_typed(&mut self, kind: ChipKind, text: &str) -> Result<AddOutcome, AppError> {
        self.ensure_editable(kind.section())?;
        let outcome = match self.searches.get_mut(&kind) {
            Some(search) => {
                search.set_input(text);
                search.commit(self.form.chips_mut(kind))
            }
            None => self.form.chips_mut(kind).add(text, kind.cap()),
        };
        self.note_add_outcome(outcome);
        Ok(outcome)
    }

    pub fn search(&self, kind: ChipKind) -> Option<&SuggestionSearch> {
        self.searches.get(&kind)
    }

    // ────────────────────────────────────────────────────────────
    // Views
    // ────────────────────────────────────────────────────────────

    /// Chips carry a removal affordance only while their section is editable.
    pub fn chip_views(&self, kind: ChipKind) -> Vec<ChipView> {
        self.form
            .chips(kind)
            .render(!self.lock.locks(kind.section()))
    }

    pub fn controls(&self) -> ControlsView {
        ControlsView::project(
            &self.lock,
            &self.completion,
            self.editing,
            self.finalize_enabled,
            self.active,
        )
    }

    pub fn profile(&self) -> &Value {
        &self.profile
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn completion(&self) -> &CompletionState {
        &self.completion
    }

    pub fn lock(&self) -> &LockState {
        &self.lock
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn finalize_enabled(&self) -> bool {
        self.finalize_enabled
    }

    pub fn active(&self) -> SectionName {
        self.active
    }

    pub fn policy(&self) -> SavePolicy {
        self.policy
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ────────────────────────────────────────────────────────────
    // Helpers
    // ────────────────────────────────────────────────────────────

    fn collect_value(&mut self, section: SectionName) -> Result<Value, AppError> {
        self.form
            .collect(section)
            .and_then(|data| data.to_value())
            .map_err(|e| self.surface(e))
    }

    fn ensure_editable(&mut self, section: SectionName) -> Result<(), AppError> {
        if self.lock.locks(section) {
            return Err(self.surface(AppError::SectionLocked(section)));
        }
        Ok(())
    }

    fn note_add_outcome(&mut self, outcome: AddOutcome) {
        if outcome == AddOutcome::MaxReached {
            self.notices.push(Notice::warning("Maximum items reached"));
        }
    }

    /// Queues the error's notice and hands the error back for `?`.
    fn surface(&mut self, err: AppError) -> AppError {
        warn!(code = err.code(), "{err}");
        self.notices.push(err.notice());
        err
    }
}

fn check_saved(response: SaveResponse) -> Result<(), AppError> {
    if response.success == Some(false) {
        return Err(AppError::Server {
            status: 200,
            message: response
                .message
                .unwrap_or_else(|| "Save failed: unknown error".to_string()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::memory::MemoryBackend;
    use crate::notice::{NoticeAction, NoticeLevel};
    use crate::profile::controls::FINALIZED_LABEL;
    use crate::session::TOKEN_KEY;
    use crate::suggestions::DEFAULT_DEBOUNCE;

    fn editor(backend: &Arc<MemoryBackend>, logged_in: bool, policy: SavePolicy) -> ProfileEditor {
        let session = Arc::new(SessionStore::in_memory());
        if logged_in {
            session.set(TOKEN_KEY, "tok").unwrap();
        }
        ProfileEditor::new(
            backend.clone(),
            backend.clone(),
            session,
            policy,
            DEFAULT_DEBOUNCE,
        )
    }

    fn nine_of_ten() -> Value {
        json!({
            "basicInfo": {"fullName": "Asha Rao", "age": 20, "currentEducation": "Undergraduate"},
            "education": {"class10": {"state": "Kerala", "board": "CBSE", "score": "91"}},
            "skills": {"skills": ["Python"]},
            "interests": {"interests": ["Data"]},
            "personality": {"workType": "Team"},
            "strengthsWeaknesses": {"strengths": ["Focus"], "weaknesses": ["Delegation"]},
            "learningPreferences": {"formats": ["Video"]},
            "workenvironment": {"environment": ["Remote"]},
            "salary": {"expected": "5-10 LPA"}
        })
    }

    #[tokio::test]
    async fn test_loaded_chips_have_no_remove_control() {
        let backend = Arc::new(MemoryBackend::with_profile(
            json!({"skills": {"skills": ["Python", "SQL"]}}),
        ));
        let mut ed = editor(&backend, true, SavePolicy::Section);
        ed.load_profile().await.unwrap();

        let chips = ed.chip_views(ChipKind::Skills);
        assert_eq!(chips.len(), 2);
        assert!(chips.iter().all(|c| !c.removable));
        assert!(!ed.is_editing());
    }

    #[tokio::test]
    async fn test_saving_last_section_enables_finalize_and_locks_all() {
        let backend = Arc::new(MemoryBackend::with_profile(nine_of_ten()));
        let mut ed = editor(&backend, true, SavePolicy::Section);
        ed.load_profile().await.unwrap();

        assert_eq!(ed.completion().count(), 9);
        assert!(!ed.controls().finalize_enabled);
        assert_eq!(ed.active(), SectionName::Certifications);

        ed.save_form_section(SectionName::Certifications).await.unwrap();

        let controls = ed.controls();
        assert!(controls.finalize_enabled);
        assert!(controls.sections.iter().all(|c| !c.inputs_enabled));
        assert!(ed
            .notices()
            .iter()
            .any(|n| n.message.starts_with("All sections completed")));
    }

    #[tokio::test]
    async fn test_save_then_load_reflects_data() {
        let backend = Arc::new(MemoryBackend::new());
        let mut ed = editor(&backend, true, SavePolicy::Section);
        ed.load_profile().await.unwrap();

        ed.save_section(SectionName::Salary, json!({"expected": "10-15 LPA"}))
            .await
            .unwrap();
        assert_eq!(ed.profile()["salary"]["expected"], "10-15 LPA");
        assert_eq!(ed.active(), SectionName::Certifications);

        ed.load_profile().await.unwrap();
        assert_eq!(ed.profile()["salary"]["expected"], "10-15 LPA");
        assert_eq!(ed.form().salary.selected(), Some("10-15 LPA"));
        assert!(ed.completion().is_complete(SectionName::Salary));
    }

    #[tokio::test]
    async fn test_invalid_data_makes_no_network_call() {
        let backend = Arc::new(MemoryBackend::new());
        let mut ed = editor(&backend, true, SavePolicy::Section);

        let err = ed.save_section(SectionName::Skills, json!({})).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(backend.calls().is_empty());
        assert_eq!(
            ed.notices().last().map(|n| n.message.as_str()),
            Some("Save failed: missing data in skills")
        );
    }

    #[tokio::test]
    async fn test_missing_token_requires_login() {
        let backend = Arc::new(MemoryBackend::new());
        let mut ed = editor(&backend, false, SavePolicy::Section);

        assert!(matches!(ed.load_profile().await, Err(AppError::AuthRequired)));
        assert!(backend.calls().is_empty());
        let notice = ed.drain_notices().pop().unwrap();
        assert_eq!(notice.action, Some(NoticeAction::Login));
        assert!(ed.notices().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_is_empty_profile() {
        let backend = Arc::new(MemoryBackend::new());
        *backend.fetch_failure.lock().unwrap() = Some(404);
        let mut ed = editor(&backend, true, SavePolicy::Section);

        ed.load_profile().await.unwrap();
        assert!(ed.is_loaded());
        assert_eq!(ed.completion().count(), 0);
        assert_eq!(*ed.lock(), LockState::Open);
    }

    #[tokio::test]
    async fn test_unauthorized_fetch_surfaces_login() {
        let backend = Arc::new(MemoryBackend::new());
        *backend.fetch_failure.lock().unwrap() = Some(401);
        let mut ed = editor(&backend, true, SavePolicy::Section);
        assert!(matches!(ed.load_profile().await, Err(AppError::AuthRequired)));
    }

    #[tokio::test]
    async fn test_server_failure_leaves_state_untouched() {
        let backend = Arc::new(MemoryBackend::new());
        let mut ed = editor(&backend, true, SavePolicy::Section);
        ed.load_profile().await.unwrap();
        *backend.save_failure.lock().unwrap() = Some((500, "DB update failed".to_string()));

        let err = ed
            .save_section(SectionName::Skills, json!({"skills": ["Go"]}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Server { .. }));
        assert_eq!(ed.notices().last().unwrap().message, "DB update failed");
        assert!(!ed.completion().is_complete(SectionName::Skills));
        assert!(ed.profile().get("skills").is_none());
        assert_eq!(ed.active(), SectionName::BasicInfo);
    }

    #[tokio::test]
    async fn test_merge_policy_keeps_sibling_sections() {
        let backend = Arc::new(MemoryBackend::with_profile(json!({
            "salary": {"expected": "5-10 LPA"},
            "skills": {"skills": ["Python"]}
        })));
        let mut ed = editor(&backend, true, SavePolicy::Merge);
        ed.load_profile().await.unwrap();
        ed.enter_edit_mode();

        ed.save_section(SectionName::Salary, json!({"expected": "10-15 LPA"}))
            .await
            .unwrap();

        let stored = backend.profile();
        assert_eq!(stored["salary"]["expected"], "10-15 LPA");
        assert_eq!(stored["skills"]["skills"], json!(["Python"]));
        assert!(stored["updated_at"].is_string());
        assert_eq!(
            backend.calls(),
            vec!["get-fullinfo", "get-fullinfo", "save-fullinfo"]
        );
    }

    #[tokio::test]
    async fn test_merge_falls_back_to_empty_document() {
        let backend = Arc::new(MemoryBackend::new());
        let mut ed = editor(&backend, true, SavePolicy::Section);
        *backend.fetch_failure.lock().unwrap() = Some(500);
        ed.pick_salary("0-5 LPA").unwrap();

        ed.save_section_merged(SectionName::Salary).await.unwrap();
        let stored = backend.profile();
        assert_eq!(stored["salary"]["expected"], "0-5 LPA");
        assert!(stored.get("skills").is_none());
    }

    #[tokio::test]
    async fn test_locked_section_refuses_edits() {
        let backend = Arc::new(MemoryBackend::with_profile(
            json!({"skills": {"skills": ["Python"]}}),
        ));
        let mut ed = editor(&backend, true, SavePolicy::Section);
        ed.load_profile().await.unwrap();

        assert!(matches!(
            ed.add_chip(ChipKind::Skills, "Go"),
            Err(AppError::SectionLocked(SectionName::Skills))
        ));
        assert!(matches!(
            ed.save_section(SectionName::Skills, json!({"skills": ["Go"]})).await,
            Err(AppError::SectionLocked(_))
        ));
        assert!(ed.add_chip(ChipKind::Interests, "Music").is_ok());
    }

    #[tokio::test]
    async fn test_edit_mode_toggles_every_control() {
        let backend = Arc::new(MemoryBackend::with_profile(nine_of_ten()));
        let mut ed = editor(&backend, true, SavePolicy::Section);
        ed.load_profile().await.unwrap();

        ed.enter_edit_mode();
        let controls = ed.controls();
        assert!(controls.sections.iter().all(|c| c.inputs_enabled && c.chips_removable));
        assert!(!controls.finalize_enabled);
        assert!(ed.chip_views(ChipKind::Skills).iter().all(|c| c.removable));

        ed.exit_edit_mode();
        assert!(ed.controls().sections.iter().all(|c| !c.inputs_enabled));
        assert!(ed.chip_views(ChipKind::Skills).iter().all(|c| !c.removable));
    }

    #[tokio::test]
    async fn test_all_complete_on_load_shows_saved_label() {
        let mut profile = nine_of_ten();
        profile["certifications"] = json!({"certifications": []});
        let backend = Arc::new(MemoryBackend::with_profile(profile));
        let mut ed = editor(&backend, true, SavePolicy::Section);
        ed.load_profile().await.unwrap();

        let controls = ed.controls();
        assert!(!controls.finalize_enabled);
        assert_eq!(controls.finalize_label, FINALIZED_LABEL);
        assert!(controls.edit_visible);
    }

    #[tokio::test]
    async fn test_save_all_requires_full_name() {
        let backend = Arc::new(MemoryBackend::new());
        let mut ed = editor(&backend, true, SavePolicy::Section);
        ed.activate(SectionName::Salary);

        assert!(matches!(ed.save_all().await, Err(AppError::Validation(_))));
        assert_eq!(ed.active(), SectionName::BasicInfo);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_save_all_keeps_sections_saved_from_raw_data() {
        let backend = Arc::new(MemoryBackend::new());
        let mut ed = editor(&backend, true, SavePolicy::Section);
        ed.load_profile().await.unwrap();
        ed.edit(SectionName::BasicInfo, |form| form.full_name = "Asha Rao".to_string())
            .unwrap();
        ed.add_chip(ChipKind::Skills, "Rust").unwrap();

        ed.save_section(SectionName::Salary, json!({"expected": "10-15 LPA"}))
            .await
            .unwrap();
        assert_eq!(ed.form().salary.selected(), Some("10-15 LPA"));
        assert!(ed.form().skills.contains("Rust"));

        ed.save_all().await.unwrap();
        let stored = backend.profile();
        assert_eq!(stored["salary"]["expected"], "10-15 LPA");
        assert_eq!(stored["basicInfo"]["fullName"], "Asha Rao");
        assert_eq!(stored["skills"]["skills"], json!(["Rust"]));
    }

    #[tokio::test]
    async fn test_save_all_refreshes_locks() {
        let backend = Arc::new(MemoryBackend::with_profile(nine_of_ten()));
        let mut ed = editor(&backend, true, SavePolicy::Section);
        ed.load_profile().await.unwrap();
        assert!(matches!(ed.lock(), LockState::Sections(_)));

        ed.add_certification(&CertificationDraft {
            name: "AWS Cloud Practitioner".to_string(),
            org: "Amazon".to_string(),
            issue_date: "2024-03-01".to_string(),
            ..Default::default()
        })
        .unwrap();
        ed.save_all().await.unwrap();

        assert!(ed.completion().all_complete());
        assert!(matches!(ed.lock(), LockState::All));
        assert!(!ed.finalize_enabled());
        assert_eq!(ed.controls().finalize_label, FINALIZED_LABEL);
    }

    #[tokio::test]
    async fn test_save_all_in_edit_mode_stays_open() {
        let backend = Arc::new(MemoryBackend::with_profile(nine_of_ten()));
        let mut ed = editor(&backend, true, SavePolicy::Section);
        ed.load_profile().await.unwrap();
        ed.enter_edit_mode();

        ed.save_all().await.unwrap();
        assert!(ed.completion().all_complete());
        assert!(matches!(ed.lock(), LockState::Open));
        assert!(ed.finalize_enabled());
        assert!(ed.is_editing());
    }

    #[tokio::test]
    async fn test_finalize_requires_every_section() {
        let backend = Arc::new(MemoryBackend::with_profile(nine_of_ten()));
        let mut ed = editor(&backend, true, SavePolicy::Section);
        ed.load_profile().await.unwrap();

        assert!(matches!(ed.finalize().await, Err(AppError::ProfileIncomplete)));
        assert_eq!(
            ed.notices().last().unwrap().action,
            Some(NoticeAction::CompleteProfile)
        );
    }

    #[tokio::test]
    async fn test_finalize_saves_everything_and_locks() {
        let backend = Arc::new(MemoryBackend::with_profile(nine_of_ten()));
        let mut ed = editor(&backend, true, SavePolicy::Section);
        ed.load_profile().await.unwrap();
        ed.add_certification(&CertificationDraft {
            name: "AWS CCP".to_string(),
            org: "AWS".to_string(),
            issue_date: "2024-03-01".to_string(),
            ..Default::default()
        })
        .unwrap();
        ed.save_form_section(SectionName::Certifications).await.unwrap();

        ed.finalize().await.unwrap();
        let stored = backend.profile();
        assert_eq!(stored["certifications"]["certifications"][0]["name"], "AWS CCP");
        assert_eq!(stored["basicInfo"]["fullName"], "Asha Rao");
        assert!(stored["updated_at"].is_string());

        let controls = ed.controls();
        assert!(!controls.finalize_enabled);
        assert_eq!(controls.finalize_label, FINALIZED_LABEL);
        assert_eq!(*ed.lock(), LockState::All);
    }

    #[tokio::test]
    async fn test_terminal_save_with_gaps_points_to_first_missing() {
        let backend = Arc::new(MemoryBackend::new());
        let mut ed = editor(&backend, true, SavePolicy::Section);
        ed.load_profile().await.unwrap();

        ed.save_form_section(SectionName::Certifications).await.unwrap();
        assert!(!ed.finalize_enabled());
        assert_eq!(ed.active(), SectionName::BasicInfo);
        assert_eq!(ed.notices().last().unwrap().level, NoticeLevel::Warning);
    }

    #[tokio::test]
    async fn test_cap_reached_warns() {
        let backend = Arc::new(MemoryBackend::new());
        let mut ed = editor(&backend, true, SavePolicy::Section);
        for i in 0..ChipKind::Skills.cap() {
            ed.add_chip(ChipKind::Skills, &format!("skill-{i}")).unwrap();
        }
        assert_eq!(
            ed.add_chip(ChipKind::Skills, "one-more").unwrap(),
            AddOutcome::MaxReached
        );
        assert_eq!(ed.notices().last().unwrap().message, "Maximum items reached");
    }

    #[tokio::test]
    async fn test_invalid_certification_is_surfaced() {
        let backend = Arc::new(MemoryBackend::new());
        let mut ed = editor(&backend, true, SavePolicy::Section);
        let draft = CertificationDraft {
            name: "CCNA".to_string(),
            ..Default::default()
        };
        assert!(ed.add_certification(&draft).is_err());
        assert_eq!(ed.notices().last().unwrap().message, "Please fill required fields");
        assert!(ed.form().certifications.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggest_and_pick() {
        let backend = Arc::new(MemoryBackend::new());
        backend.masters.lock().unwrap().insert(
            ChipKind::Interests,
            vec!["Music".to_string(), "Robotics".to_string()],
        );
        let mut ed = editor(&backend, true, SavePolicy::Section);
        ed.init().await.unwrap();

        let shown = ed
            .suggest(ChipKind::Interests, "rob")
            .unwrap()
            .resolve()
            .await
            .unwrap();
        assert_eq!(shown, vec!["Robotics".to_string()]);
        ed.show_suggestions(ChipKind::Interests, shown);
        assert_eq!(ed.search(ChipKind::Interests).unwrap().shown(), &["Robotics".to_string()]);
        ed.pick_suggestion(ChipKind::Interests, "Robotics").unwrap();
        ed.commit_typed(ChipKind::Interests, "Astronomy").unwrap();
        assert_eq!(
            ed.form().interests.items(),
            &["Robotics".to_string(), "Astronomy".to_string()]
        );
        assert_eq!(ed.search(ChipKind::Interests).unwrap().input(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_suggestions_search_once() {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .remote
            .lock()
            .unwrap()
            .insert(ChipKind::Skills, vec!["Kotlin".to_string()]);
        let mut ed = editor(&backend, true, SavePolicy::Section);

        let first = ed.suggest(ChipKind::Skills, "ko").unwrap();
        let second = ed.suggest(ChipKind::Skills, "kot").unwrap();
        let (a, b) = tokio::join!(first.resolve(), second.resolve());
        assert_eq!(a, None);
        assert_eq!(b, Some(vec!["Kotlin".to_string()]));
        assert_eq!(backend.calls(), vec!["search-skills:kot".to_string()]);
    }

    #[test]
    fn test_save_policy_parse() {
        assert_eq!("merge".parse::<SavePolicy>().unwrap(), SavePolicy::Merge);
        assert_eq!(" Section ".parse::<SavePolicy>().unwrap(), SavePolicy::Section);
        assert!("bulk".parse::<SavePolicy>().is_err());
    }
}
