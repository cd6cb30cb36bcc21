//! Career recommendations and the personalised roadmap view.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::api_client::types::{CareerMatch, Course, Phase, Roadmap, Task};
use crate::api_client::{CareerAdvisor, ProfileStore};
use crate::errors::AppError;
use crate::notice::Notice;
use crate::session::SessionStore;

pub const TOP_MATCHES: usize = 3;

const NO_CORE_GAPS: &str = "You already cover most core skills.";
const NO_NICE_GAPS: &str = "You are already strong on nice-to-have skills.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationCard {
    pub rank: usize,
    pub career: String,
    /// 0-100.
    pub match_strength: u8,
}

impl RecommendationCard {
    fn from_match(rank: usize, item: &CareerMatch) -> Self {
        Self {
            rank,
            career: item.career.clone(),
            match_strength: match_strength(item.score),
        }
    }
}

/// `round(score * 100)` clamped to 0..=100. NaN reads as 0.
pub fn match_strength(score: f64) -> u8 {
    let pct = (score * 100.0).round();
    if pct.is_nan() {
        0
    } else {
        pct.clamp(0.0, 100.0) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    /// Anything other than `high` or `low` is medium.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("high") => TaskPriority::High,
            Some("low") => TaskPriority::Low,
            _ => TaskPriority::Medium,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::High => "High priority",
            TaskPriority::Medium => "Medium focus",
            TaskPriority::Low => "Already strong",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskView {
    pub title: String,
    pub description: Option<String>,
    pub level: Option<String>,
    pub priority: TaskPriority,
    pub status: Option<String>,
    pub format_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseView {
    pub number: usize,
    pub title: String,
    pub duration: String,
    pub tasks: Vec<TaskView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapView {
    pub career: String,
    pub summary: Option<String>,
    pub core_gaps: String,
    pub nice_gaps: String,
    pub phases: Vec<PhaseView>,
    pub courses: Vec<Course>,
}

impl RoadmapView {
    pub fn build(career: &str, roadmap: Roadmap) -> Self {
        let phases = roadmap
            .phases
            .iter()
            .enumerate()
            .map(|(idx, phase)| phase_view(idx + 1, phase))
            .collect();

        Self {
            career: roadmap
                .career
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| career.to_string()),
            summary: non_blank(roadmap.short_description),
            core_gaps: gap_text(&roadmap.skill_gaps.core_missing, NO_CORE_GAPS),
            nice_gaps: gap_text(&roadmap.skill_gaps.nice_to_have_missing, NO_NICE_GAPS),
            phases,
            courses: roadmap.recommended_courses,
        }
    }
}

fn phase_view(number: usize, phase: &Phase) -> PhaseView {
    PhaseView {
        number,
        title: phase.title.clone(),
        duration: phase_duration(phase),
        tasks: phase.tasks.iter().map(task_view).collect(),
    }
}

fn task_view(task: &Task) -> TaskView {
    TaskView {
        title: task.title.clone(),
        description: non_blank(task.description.clone()),
        level: non_blank(task.level.clone()),
        priority: TaskPriority::parse(task.priority.as_deref()),
        status: non_blank(task.status.clone()),
        format_hint: non_blank(task.preferred_format_hint.clone()),
    }
}

/// Personalised duration, else recommended, else `"?"`. Zero counts as missing.
fn phase_duration(phase: &Phase) -> String {
    [
        phase.personalized_duration_months,
        phase.recommended_duration_months,
    ]
    .into_iter()
    .flatten()
    .find(|months| *months > 0.0)
    .map(format_months)
    .unwrap_or_else(|| "?".to_string())
}

fn format_months(months: f64) -> String {
    if months.fract() == 0.0 {
        format!("{}", months as i64)
    } else {
        format!("{months}")
    }
}

fn gap_text(skills: &[String], fallback: &str) -> String {
    if skills.is_empty() {
        fallback.to_string()
    } else {
        skills
            .iter()
            .map(|s| title_case(s))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `"data_science"` becomes `"Data Science"`.
pub fn title_case(value: &str) -> String {
    value
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fetches recommendations for the stored profile and the roadmap for a chosen career.
pub struct RecommendationView {
    store: Arc<dyn ProfileStore>,
    advisor: Arc<dyn CareerAdvisor>,
    session: Arc<SessionStore>,
    profile: Option<Value>,
    cards: Vec<RecommendationCard>,
    roadmap: Option<RoadmapView>,
    notices: Vec<Notice>,
}

impl RecommendationView {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        advisor: Arc<dyn CareerAdvisor>,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            store,
            advisor,
            session,
            profile: None,
            cards: Vec::new(),
            roadmap: None,
            notices: Vec::new(),
        }
    }

    /// Loads the profile used for roadmap requests. Failures are logged only.
    pub async fn load_user_profile(&mut self) -> bool {
        let Some(token) = self.session.token() else {
            warn!("No token found, profile not loaded");
            return false;
        };
        match self.store.fetch_profile(&token).await {
            Ok(response) if response.profile.is_object() => {
                self.profile = Some(response.profile);
                true
            }
            Ok(_) => {
                warn!("get-fullinfo returned no profile");
                false
            }
            Err(e) => {
                warn!("Failed to load profile: {e}");
                false
            }
        }
    }

    pub async fn run_recommendations(&mut self) -> Result<&[RecommendationCard], AppError> {
        let token = self.session.require_token().map_err(|e| self.surface(e))?;

        let response = self
            .store
            .fetch_profile(&token)
            .await
            .map_err(|e| self.surface(e))?;
        let has_profile = response
            .profile
            .as_object()
            .map(|map| !map.is_empty())
            .unwrap_or(false);
        if !response.success || !has_profile {
            return Err(self.surface(AppError::ProfileIncomplete));
        }
        self.profile = Some(response.profile);

        let profile = self.profile.as_ref().ok_or(AppError::ProfileNotLoaded)?;
        let reco = self
            .advisor
            .recommend(&token, profile)
            .await
            .map_err(|e| self.surface(e))?;
        if !reco.success || reco.results.is_empty() {
            return Err(self.surface(AppError::Server {
                status: 200,
                message: "Unable to generate recommendations.".to_string(),
            }));
        }

        self.cards = reco
            .results
            .iter()
            .take(TOP_MATCHES)
            .enumerate()
            .map(|(idx, item)| RecommendationCard::from_match(idx + 1, item))
            .collect();
        info!(matches = self.cards.len(), "Recommendations ready");
        Ok(&self.cards)
    }

    pub async fn handle_roadmap_click(&mut self, career: &str) -> Result<&RoadmapView, AppError> {
        if self.profile.is_none() {
            return Err(self.surface(AppError::ProfileNotLoaded));
        }
        let profile = self.profile.as_ref().ok_or(AppError::ProfileNotLoaded)?;
        let roadmap = self
            .advisor
            .roadmap(career, profile)
            .await
            .map_err(|e| self.surface(e))?;

        info!(career, phases = roadmap.phases.len(), "Roadmap loaded");
        Ok(&*self.roadmap.insert(RoadmapView::build(career, roadmap)))
    }

    pub fn cards(&self) -> &[RecommendationCard] {
        &self.cards
    }

    pub fn roadmap(&self) -> Option<&RoadmapView> {
        self.roadmap.as_ref()
    }

    pub fn profile(&self) -> Option<&Value> {
        self.profile.as_ref()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn surface(&mut self, err: AppError) -> AppError {
        warn!(code = err.code(), "{err}");
        self.notices.push(err.notice());
        err
    }
}
