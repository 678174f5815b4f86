use serde::{Deserialize, Serialize};

/// Optional user context used to enrich classifier prompts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub life_stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub is_student: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    pub interests: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UserProfile {
    /// Single-line rendering for the prompt. `None` when nothing is set.
    pub fn prompt_line(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(age) = self.age {
            parts.push(format!("age {age}"));
        }
        let labelled = [
            ("life stage", &self.life_stage),
            ("location", &self.location),
            ("education", &self.education_level),
            ("occupation", &self.occupation),
        ];
        for (label, value) in labelled {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                parts.push(format!("{label} {value}"));
            }
        }
        if self.is_student {
            parts.push("student".to_string());
        }
        if !self.interests.is_empty() {
            parts.push(format!("interests: {}", self.interests.join(", ")));
        }
        if let Some(notes) = self.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            parts.push(format!("notes: {notes}"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(format!("User context: {}", parts.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_profile_renders_nothing() {
        assert_eq!(UserProfile::default().prompt_line(), None);
    }

    #[test]
    fn renders_set_fields() {
        let profile = UserProfile {
            age: Some(29),
            occupation: Some("nurse".into()),
            is_student: true,
            interests: vec!["hiking".into(), "film".into()],
            ..Default::default()
        };
        assert_eq!(
            profile.prompt_line().unwrap(),
            "User context: age 29; occupation nurse; student; interests: hiking, film"
        );
    }
}
