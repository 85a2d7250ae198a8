//! Email template domain model.

use serde::{Deserialize, Serialize};

use super::shell::{TemplateShell, unwrap_html};

/// A reusable email with merge-tag placeholders.
///
/// `html` is the persisted, wrapped form sent to recipients. `content`
/// keeps the author's fragment so a re-save re-wraps the fragment instead of
/// nesting shells. Either field may be edited before a save; an `html` that
/// no longer matches the stored record wins over `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub wrapped: bool,
}

impl EmailTemplate {
    /// Creates an unsaved template. The id is assigned on save.
    pub fn new(name: impl Into<String>, subject: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            id: String::new(),
            name: name.into(),
            subject: subject.into(),
            html: content.clone(),
            content: Some(content),
            wrapped: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// The author's fragment.
    ///
    /// Falls back to stripping the shell from legacy records that stored only
    /// wrapped html, and finally to `html` as-is.
    pub fn raw_content(&self) -> String {
        if let Some(content) = &self.content {
            return content.clone();
        }
        unwrap_html(&self.html).unwrap_or_else(|| self.html.clone())
    }

    /// The fragment to persist, given the currently stored version of this
    /// template. An edited, non-empty `html` is taken as the new fragment,
    /// minus its shell when it still carries one.
    pub fn edited_content(&self, stored: Option<&EmailTemplate>) -> String {
        match stored {
            Some(prev) if !self.html.is_empty() && prev.html != self.html => {
                unwrap_html(&self.html).unwrap_or_else(|| self.html.clone())
            }
            _ => self.raw_content(),
        }
    }

    /// Produces the persisted form: `html` rebuilt from the edited fragment
    /// with exactly one shell, and an id synthesised from the name if
    /// missing.
    pub fn prepared_for_save(mut self, shell: &TemplateShell, stored: Option<&EmailTemplate>) -> Self {
        let raw = self.edited_content(stored);
        self.html = shell.wrap(&raw);
        self.content = Some(raw);
        self.wrapped = true;
        if self.id.trim().is_empty() {
            self.id = generate_template_id(&self.name);
        }
        self
    }
}

/// Lowercase, ascii-alphanumeric slug with single dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// `<slug>-<8 hex chars>`, or `template-<8 hex chars>` for an empty name.
pub fn generate_template_id(name: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let slug = slugify(name);
    let slug = if slug.is_empty() { "template" } else { slug.as_str() };
    format!("{}-{}", slug, &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::super::shell::shell_depth;
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Welcome: New Client!"), "welcome-new-client");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn test_generated_id_has_slug_and_suffix() {
        let id = generate_template_id("Consult Reminder");
        assert!(id.starts_with("consult-reminder-"));
        assert_eq!(id.len(), "consult-reminder-".len() + 8);
    }

    #[test]
    fn test_resave_does_not_nest_shell() {
        let shell = TemplateShell::default();
        let saved = EmailTemplate::new("Welcome", "Hi {{name}}", "<p>Welcome</p>").prepared_for_save(&shell, None);
        assert!(saved.wrapped);

        let mut edited = saved.clone();
        edited.subject = "Welcome aboard".to_string();
        let resaved = edited.prepared_for_save(&shell, Some(&saved));

        assert_eq!(shell_depth(&resaved.html), 1);
        assert_eq!(resaved.id, saved.id);
        assert_eq!(resaved.content.as_deref(), Some("<p>Welcome</p>"));
    }

    #[test]
    fn test_legacy_wrapped_html_is_unwrapped_first() {
        let shell = TemplateShell::default();
        let legacy = EmailTemplate {
            id: "legacy".to_string(),
            name: "Legacy".to_string(),
            subject: String::new(),
            html: shell.wrap("<p>Old</p>"),
            content: None,
            wrapped: false,
        };
        let resaved = legacy.prepared_for_save(&shell, None);
        assert_eq!(shell_depth(&resaved.html), 1);
        assert_eq!(resaved.content.as_deref(), Some("<p>Old</p>"));
    }

    #[test]
    fn test_html_edit_replaces_stored_fragment() {
        let shell = TemplateShell::default();
        let saved = EmailTemplate::new("Welcome", "Hi", "<p>old</p>").prepared_for_save(&shell, None);

        let mut edited = saved.clone();
        edited.html = "<p>new body</p>".to_string();
        let resaved = edited.prepared_for_save(&shell, Some(&saved));
        assert_eq!(resaved.content.as_deref(), Some("<p>new body</p>"));
        assert!(resaved.html.contains("<p>new body</p>"));
        assert!(!resaved.html.contains("<p>old</p>"));
        assert_eq!(shell_depth(&resaved.html), 1);

        // an edit made inside the existing shell is unwrapped, not nested
        let mut edited = resaved.clone();
        edited.html = resaved.html.replace("new body", "newer body");
        let again = edited.prepared_for_save(&shell, Some(&resaved));
        assert_eq!(again.content.as_deref(), Some("<p>newer body</p>"));
        assert_eq!(shell_depth(&again.html), 1);
    }

    #[test]
    fn test_content_edit_applies_when_html_untouched() {
        let shell = TemplateShell::default();
        let saved = EmailTemplate::new("Welcome", "Hi", "<p>old</p>").prepared_for_save(&shell, None);

        let mut edited = saved.clone();
        edited.content = Some("<p>fresh</p>".to_string());
        let resaved = edited.prepared_for_save(&shell, Some(&saved));
        assert!(resaved.html.contains("<p>fresh</p>"));
        assert!(!resaved.html.contains("<p>old</p>"));
    }
}
