use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct FullInfoResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub profile: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveResponse {
    pub success: Option<bool>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveSectionRequest<'a> {
    pub section: &'a str,
    pub data: &'a Value,
}

/// Master lists arrive either as a bare array or wrapped in `{suggestions}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SuggestionPayload {
    List(Vec<String>),
    Wrapped {
        #[serde(default)]
        suggestions: Vec<String>,
    },
}

impl SuggestionPayload {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            SuggestionPayload::List(items) => items,
            SuggestionPayload::Wrapped { suggestions } => suggestions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendRequest<'a> {
    pub profile: &'a Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub results: Vec<CareerMatch>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CareerMatch {
    pub career: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub top_skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RoadmapRequest<'a> {
    pub career: &'a str,
    pub profile: &'a Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Roadmap {
    pub career: Option<String>,
    pub slug: Option<String>,
    pub short_description: Option<String>,
    pub skill_gaps: SkillGaps,
    pub phases: Vec<Phase>,
    pub recommended_courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SkillGaps {
    pub core_missing: Vec<String>,
    pub nice_to_have_missing: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Phase {
    pub id: Option<Value>,
    pub title: String,
    pub recommended_duration_months: Option<f64>,
    pub personalized_duration_months: Option<f64>,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Task {
    pub id: Option<Value>,
    pub title: String,
    pub description: Option<String>,
    pub level: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub preferred_format_hint: Option<String>,
    pub related_skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Course {
    pub title: String,
    pub provider: String,
    pub platform: String,
    pub url: String,
    pub level: String,
    pub focus: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub fullname: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct GoogleLoginRequest<'a> {
    pub credential: &'a str,
}

/// Stored under the `user` session key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthResponse {
    pub success: bool,
    pub token: Option<String>,
    pub user: Option<UserInfo>,
    pub message: Option<String>,
    pub msg: Option<String>,
}

/// Error bodies use whichever of these keys the endpoint prefers.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub msg: Option<String>,
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}
