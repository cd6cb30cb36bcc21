//! Lifts legacy flat profile fields into the nested by-section shape.
//!
//! Older saves wrote `fullName`, `skills: [...]`, `salary_expectation` and friends at
//! the top level. A nested section always wins; flat fields are only consulted when
//! the section object is absent.

use serde_json::{Map, Value};

/// Returns a copy of `profile` where every section that was stored in a legacy flat
/// form is available under its nested key. Non-object input yields `{}`.
pub fn normalize(profile: &Value) -> Value {
    let flat = match profile {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    let mut out = flat.clone();

    if !is_object(out.get("basicInfo")) {
        let mut basic = Map::new();
        copy_first(&flat, &mut basic, "fullName", &["fullName", "full_name"]);
        copy_first(&flat, &mut basic, "age", &["age"]);
        copy_first(&flat, &mut basic, "gender", &["gender"]);
        copy_first(
            &flat,
            &mut basic,
            "currentEducation",
            &["currentEducation", "current_education"],
        );
        insert_if_any(&mut out, "basicInfo", basic);
    }

    wrap_list(&mut out, "skills", "skills");
    wrap_list(&mut out, "interests", "interests");
    wrap_list(&mut out, "certifications", "certifications");

    if !is_object(out.get("strengthsWeaknesses")) {
        let mut sw = Map::new();
        copy_first(&flat, &mut sw, "strengths", &["strengths"]);
        copy_first(&flat, &mut sw, "weaknesses", &["weaknesses"]);
        insert_if_any(&mut out, "strengthsWeaknesses", sw);
    }

    if let Some(Value::Object(personality)) = out.get("personality") {
        let mut renamed = personality.clone();
        for (camel, snake) in [
            ("workType", "work_type"),
            ("workStyle", "work_style"),
            ("environmentPreference", "environment"),
            ("stressLevel", "stress_level"),
        ] {
            if !renamed.contains_key(camel) {
                if let Some(v) = personality.get(snake) {
                    renamed.insert(camel.to_string(), v.clone());
                }
            }
        }
        out.insert("personality".to_string(), Value::Object(renamed));
    }

    if !is_object(out.get("learningPreferences")) {
        if let Some(lp) = ["learningPreference", "learning_preferences"]
            .iter()
            .filter_map(|k| flat.get(*k))
            .find(|v| v.is_object())
        {
            out.insert("learningPreferences".to_string(), lp.clone());
        }
    }

    match out.get("workenvironment") {
        Some(Value::Object(env)) => {
            if let Some(Value::String(single)) = env.get("environment") {
                let mut env = env.clone();
                env.insert(
                    "environment".to_string(),
                    Value::Array(vec![Value::String(single.clone())]),
                );
                out.insert("workenvironment".to_string(), Value::Object(env));
            }
        }
        _ => {
            if let Some(list) = ["work_environment", "environment"]
                .iter()
                .filter_map(|k| flat.get(*k))
                .find(|v| v.is_array())
            {
                let mut env = Map::new();
                env.insert("environment".to_string(), list.clone());
                out.insert("workenvironment".to_string(), Value::Object(env));
            }
        }
    }

    if !is_object(out.get("salary")) {
        if let Some(Value::String(expected)) = flat.get("salary_expectation") {
            let mut salary = Map::new();
            salary.insert("expected".to_string(), Value::String(expected.clone()));
            out.insert("salary".to_string(), Value::Object(salary));
        }
    }

    Value::Object(out)
}

fn is_object(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Object(_)))
}

fn copy_first(from: &Map<String, Value>, to: &mut Map<String, Value>, key: &str, aliases: &[&str]) {
    if let Some(v) = aliases
        .iter()
        .filter_map(|alias| from.get(*alias))
        .find(|v| !v.is_null())
    {
        to.insert(key.to_string(), v.clone());
    }
}

fn insert_if_any(out: &mut Map<String, Value>, key: &str, section: Map<String, Value>) {
    if !section.is_empty() {
        out.insert(key.to_string(), Value::Object(section));
    }
}

/// `{"skills": [..]}` stays as is; a bare `"skills": [..]` becomes `{"skills": {"skills": [..]}}`.
fn wrap_list(out: &mut Map<String, Value>, section: &str, field: &str) {
    if let Some(Value::Array(items)) = out.get(section) {
        let mut wrapped = Map::new();
        wrapped.insert(field.to_string(), Value::Array(items.clone()));
        out.insert(section.to_string(), Value::Object(wrapped));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_profile_passes_through() {
        let profile = json!({
            "basicInfo": {"fullName": "Ravi"},
            "skills": {"skills": ["Python"]}
        });
        assert_eq!(normalize(&profile), profile);
    }

    #[test]
    fn test_flat_basic_info_is_lifted() {
        let profile = json!({"full_name": "Ravi", "age": 21, "current_education": "Class 12"});
        let normalized = normalize(&profile);
        assert_eq!(normalized["basicInfo"]["fullName"], "Ravi");
        assert_eq!(normalized["basicInfo"]["age"], 21);
        assert_eq!(normalized["basicInfo"]["currentEducation"], "Class 12");
    }

    #[test]
    fn test_nested_section_wins_over_flat_fields() {
        let profile = json!({"fullName": "Old", "basicInfo": {"fullName": "New"}});
        assert_eq!(normalize(&profile)["basicInfo"]["fullName"], "New");
    }

    #[test]
    fn test_flat_lists_are_wrapped() {
        let profile = json!({
            "skills": ["SQL"],
            "interests": ["Robotics"],
            "strengths": ["Patience"],
            "weaknesses": ["Public speaking"],
            "certifications": [{"name": "CCNA"}]
        });
        let normalized = normalize(&profile);
        assert_eq!(normalized["skills"]["skills"], json!(["SQL"]));
        assert_eq!(normalized["interests"]["interests"], json!(["Robotics"]));
        assert_eq!(
            normalized["strengthsWeaknesses"]["weaknesses"],
            json!(["Public speaking"])
        );
        assert_eq!(
            normalized["certifications"]["certifications"][0]["name"],
            "CCNA"
        );
    }

    #[test]
    fn test_single_environment_string_becomes_list() {
        let profile = json!({"workenvironment": {"environment": "Remote"}});
        assert_eq!(
            normalize(&profile)["workenvironment"]["environment"],
            json!(["Remote"])
        );
    }

    #[test]
    fn test_flat_environment_and_salary() {
        let profile = json!({"work_environment": ["Hybrid"], "salary_expectation": "5-10 LPA"});
        let normalized = normalize(&profile);
        assert_eq!(normalized["workenvironment"]["environment"], json!(["Hybrid"]));
        assert_eq!(normalized["salary"]["expected"], "5-10 LPA");
    }

    #[test]
    fn test_learning_preference_aliases() {
        let profile = json!({"learningPreference": {"pace": "fast", "formats": ["Video"]}});
        assert_eq!(normalize(&profile)["learningPreferences"]["pace"], "fast");
    }

    #[test]
    fn test_snake_case_personality_keys() {
        let profile = json!({"personality": {"work_type": "Team", "stress_level": "Low"}});
        let normalized = normalize(&profile);
        assert_eq!(normalized["personality"]["workType"], "Team");
        assert_eq!(normalized["personality"]["stressLevel"], "Low");
    }

    #[test]
    fn test_non_object_yields_empty() {
        assert_eq!(normalize(&Value::Null), json!({}));
    }
}
