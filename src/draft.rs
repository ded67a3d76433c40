use reqwest::multipart::{Form, Part};

use crate::error::{ClientError, ClientResult};

/// File attachment collected from the user. Contents are opaque to the
/// client; type/size policy is the backend's concern.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Transient, unsubmitted project being assembled from form input.
/// Discarded on successful submit or navigation away.
#[derive(Debug, Clone, Default)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub academic_year: String,
    pub thumbnail: String,
    pub video_url: String,
    tags: Vec<String>,
    files: Vec<Attachment>,
}

impl ProjectDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add tags from raw input. Input may be comma-separated; each tag is
    /// trimmed, empties and duplicates are silently ignored, insertion
    /// order of the rest is preserved.
    pub fn add_tags(&mut self, input: &str) {
        for tag in input.split(',') {
            let tag = tag.trim();
            if !tag.is_empty() && !self.tags.iter().any(|t| t == tag) {
                self.tags.push(tag.to_string());
            }
        }
    }

    /// Remove a tag by value equality; unknown values are a no-op.
    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn attach_file(&mut self, name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) {
        self.files.push(Attachment { name: name.into(), mime: mime.into(), bytes });
    }

    pub fn files(&self) -> &[Attachment] {
        &self.files
    }

    /// Required-field check, run before any network call. A draft with only
    /// files and no text is rejected here.
    pub fn validate(&self) -> ClientResult<()> {
        if self.title.trim().is_empty()
            || self.description.trim().is_empty()
            || self.category.trim().is_empty()
            || self.academic_year.trim().is_empty()
        {
            return Err(ClientError::validation("Please fill in all required fields"));
        }
        Ok(())
    }

    /// Package every field (text + binary) into one multipart payload.
    /// Field layout matches what the backend's upload handler expects:
    /// text fields by name, `tags` as a JSON array string, each attachment
    /// as a `projectFiles` part.
    pub fn into_form(self) -> ClientResult<Form> {
        self.validate()?;
        let tags_json = serde_json::to_string(&self.tags)
            .map_err(|e| ClientError::validation(format!("could not encode tags: {e}")))?;
        let mut form = Form::new()
            .text("title", self.title.trim().to_string())
            .text("description", self.description.trim().to_string())
            .text("category", self.category.trim().to_string())
            .text("academicYear", self.academic_year.trim().to_string())
            .text("tags", tags_json);
        if !self.video_url.trim().is_empty() {
            form = form.text("videoUrl", self.video_url.trim().to_string());
        }
        if !self.thumbnail.trim().is_empty() {
            form = form.text("thumbnail", self.thumbnail.trim().to_string());
        }
        for file in self.files {
            let part = Part::bytes(file.bytes)
                .file_name(file.name)
                .mime_str(&file.mime)
                .map_err(|e| ClientError::validation(format!("invalid attachment type: {e}")))?;
            form = form.part("projectFiles", part);
        }
        Ok(form)
    }
}

/// Signup form state. Password confirmation is checked locally before the
/// request is sent.
#[derive(Debug, Clone, Default)]
pub struct SignupDraft {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupDraft {
    pub fn validate(&self) -> ClientResult<()> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
        {
            return Err(ClientError::validation("Please fill in all required fields"));
        }
        if self.password != self.confirm_password {
            return Err(ClientError::validation("Passwords do not match"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> ProjectDraft {
        let mut d = ProjectDraft::new();
        d.title = "X".into();
        d.description = "Y".into();
        d.category = "web".into();
        d.academic_year = "2024".into();
        d
    }

    #[test]
    fn add_then_remove_tag_round_trips() {
        let mut d = valid_draft();
        d.add_tags("rust, embedded");
        let before = d.tags().to_vec();
        d.add_tags("sensors");
        d.remove_tag("sensors");
        assert_eq!(d.tags(), before.as_slice());
    }

    #[test]
    fn duplicate_tags_are_ignored() {
        let mut d = valid_draft();
        d.add_tags("rust, rust , web");
        d.add_tags("rust");
        assert_eq!(d.tags(), ["rust", "web"]);
    }

    #[test]
    fn missing_title_is_rejected() {
        let mut d = valid_draft();
        d.title.clear();
        assert!(matches!(d.validate(), Err(ClientError::Validation(_))));
        assert!(matches!(d.into_form(), Err(ClientError::Validation(_))));
    }

    #[test]
    fn files_alone_do_not_make_a_submittable_draft() {
        let mut d = ProjectDraft::new();
        d.attach_file("report.pdf", "application/pdf", vec![1, 2, 3]);
        assert!(d.validate().is_err());
    }

    #[test]
    fn attachments_keep_order() {
        let mut d = valid_draft();
        d.attach_file("a.pdf", "application/pdf", vec![1]);
        d.attach_file("b.zip", "application/zip", vec![2]);
        let names: Vec<_> = d.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.pdf", "b.zip"]);
    }

    #[test]
    fn signup_rejects_password_mismatch() {
        let d = SignupDraft {
            name: "Ada".into(),
            email: "ada@example.edu".into(),
            password: "secret-1".into(),
            confirm_password: "secret-2".into(),
        };
        match d.validate() {
            Err(ClientError::Validation(msg)) => assert_eq!(msg, "Passwords do not match"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
