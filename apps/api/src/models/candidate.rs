use serde::{Deserialize, Serialize};

/// Personal-information form exactly as the client submitted it.
/// Every field is mandatory; blanks are reported by `missing_fields`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub desired_position: String,
    #[serde(default)]
    pub location: String,
    /// Reference returned by the resume upload endpoint (or any client-side handle).
    #[serde(default)]
    pub resume: String,
}

impl ProfileForm {
    /// Names of mandatory fields that are empty after trimming, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("full_name", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("experience", &self.experience),
            ("desired_position", &self.desired_position),
            ("location", &self.location),
            ("resume", &self.resume),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn into_profile(self) -> CandidateProfile {
        CandidateProfile {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            experience: self.experience.trim().to_string(),
            desired_position: self.desired_position.trim().to_string(),
            location: self.location.trim().to_string(),
            resume: self.resume.trim().to_string(),
        }
    }
}

/// Candidate details accepted at the greeting stage. Never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// Years of experience, kept as entered (validated as a number in [0, 50]).
    pub experience: String,
    pub desired_position: String,
    pub location: String,
    pub resume: String,
}

/// A resume file uploaded during the greeting stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeAttachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub size_bytes: usize,
    /// Plain text pulled out of PDF uploads; `None` for Word documents or unreadable PDFs.
    #[serde(skip)]
    pub extracted_text: Option<String>,
}

impl ResumeAttachment {
    pub fn has_text(&self) -> bool {
        self.extracted_text
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> ProfileForm {
        ProfileForm {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+14155550123".to_string(),
            experience: "7".to_string(),
            desired_position: "Backend Engineer".to_string(),
            location: "London".to_string(),
            resume: "ada_cv.pdf".to_string(),
        }
    }

    #[test]
    fn test_complete_form_has_no_missing_fields() {
        assert!(complete_form().missing_fields().is_empty());
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let mut form = complete_form();
        form.email = "   ".to_string();
        form.resume = String::new();
        assert_eq!(form.missing_fields(), vec!["email", "resume"]);
    }

    #[test]
    fn test_empty_form_reports_every_field_in_order() {
        let missing = ProfileForm::default().missing_fields();
        assert_eq!(missing.len(), 7);
        assert_eq!(missing[0], "full_name");
        assert_eq!(missing[6], "resume");
    }

    #[test]
    fn test_into_profile_trims_values() {
        let mut form = complete_form();
        form.full_name = "  Ada Lovelace ".to_string();
        let profile = form.into_profile();
        assert_eq!(profile.full_name, "Ada Lovelace");
    }

    #[test]
    fn test_profile_form_deserializes_with_absent_fields() {
        let form: ProfileForm = serde_json::from_str(r#"{"full_name": "Ada"}"#).unwrap();
        assert_eq!(form.full_name, "Ada");
        assert!(form.missing_fields().contains(&"email"));
    }
}
