//! Branded header/footer shell applied to email templates at save time.

use serde::{Deserialize, Serialize};

use crate::site_config::SiteConfig;

const HEADER_OPEN: &str = "<!-- vfo:header -->";
const HEADER_CLOSE: &str = "<!-- /vfo:header -->";
const FOOTER_OPEN: &str = "<!-- vfo:footer -->";
const FOOTER_CLOSE: &str = "<!-- /vfo:footer -->";

const DEFAULT_PRIMARY_COLOR: &str = "#3C4630";
const DEFAULT_BRAND_NAME: &str = "Wyoming Asset Protection Trust";

/// Header and footer markup placed around every saved template body.
///
/// Each block is delimited by marker comments so wrapped html can be
/// recognised and the author's fragment recovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateShell {
    pub header: String,
    pub footer: String,
}

impl Default for TemplateShell {
    fn default() -> Self {
        Self::from_site_config(&SiteConfig::default())
    }
}

impl TemplateShell {
    pub fn new(header: impl Into<String>, footer: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            footer: footer.into(),
        }
    }

    /// Builds the shell from site branding, falling back to house defaults
    /// for anything not configured.
    pub fn from_site_config(site: &SiteConfig) -> Self {
        let color = site
            .primary_color
            .as_deref()
            .unwrap_or(DEFAULT_PRIMARY_COLOR);
        let brand = site.advisor_name.as_deref().unwrap_or(DEFAULT_BRAND_NAME);

        let logo = match site.logo_path.as_deref() {
            Some(path) => format!(
                "<img src=\"{}\" alt=\"{}\" style=\"height:40px\"/>",
                path, brand
            ),
            None => format!("<strong style=\"color:#fff\">{}</strong>", brand),
        };
        let header = format!(
            "<div style=\"background:{};padding:16px 24px\">{}</div>",
            color, logo
        );

        let mut contact = Vec::new();
        if let Some(email) = site.contact_email.as_deref() {
            contact.push(email.to_string());
        }
        if let Some(phone) = site.contact_phone.as_deref() {
            contact.push(phone.to_string());
        }
        let footer = if contact.is_empty() {
            format!(
                "<div style=\"padding:16px 24px;color:#666;font-size:12px\">{}</div>",
                brand
            )
        } else {
            format!(
                "<div style=\"padding:16px 24px;color:#666;font-size:12px\">{} · {}</div>",
                brand,
                contact.join(" · ")
            )
        };

        Self { header, footer }
    }

    /// Places `raw` between the header and footer blocks.
    pub fn wrap(&self, raw: &str) -> String {
        format!(
            "{}{}{}\n{}\n{}{}{}",
            HEADER_OPEN, self.header, HEADER_CLOSE, raw, FOOTER_OPEN, self.footer, FOOTER_CLOSE
        )
    }
}

/// Recovers the author's fragment from wrapped html.
///
/// Strips the first header block and the last footer block, whichever shell
/// produced them. Returns `None` when `html` carries no complete shell.
pub fn unwrap_html(html: &str) -> Option<String> {
    let header_end = html.find(HEADER_CLOSE)? + HEADER_CLOSE.len();
    if !html[..header_end].contains(HEADER_OPEN) {
        return None;
    }
    let footer_start = html.rfind(FOOTER_OPEN)?;
    if footer_start < header_end || !html[footer_start..].contains(FOOTER_CLOSE) {
        return None;
    }
    let inner = &html[header_end..footer_start];
    let inner = inner.strip_prefix('\n').unwrap_or(inner);
    let inner = inner.strip_suffix('\n').unwrap_or(inner);
    Some(inner.to_string())
}

/// Number of header blocks in `html`. More than one means nested shells.
pub fn shell_depth(html: &str) -> usize {
    html.matches(HEADER_OPEN).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_once_has_one_header_and_footer() {
        let shell = TemplateShell::default();
        let html = shell.wrap("<p>Hello {{name}}</p>");
        assert_eq!(shell_depth(&html), 1);
        assert_eq!(html.matches(FOOTER_OPEN).count(), 1);
        assert!(html.contains("<p>Hello {{name}}</p>"));
    }

    #[test]
    fn test_wrapping_twice_nests_the_shell() {
        // The shell itself does not detect wrapped input. Callers are
        // expected to wrap the raw content, not the stored html.
        let shell = TemplateShell::default();
        let twice = shell.wrap(&shell.wrap("<p>x</p>"));
        assert_eq!(shell_depth(&twice), 2);
    }

    #[test]
    fn test_unwrap_recovers_fragment() {
        let shell = TemplateShell::new("<h1>Brand</h1>", "<small>Footer</small>");
        let raw = "<p>Body</p>\n<p>More</p>";
        assert_eq!(unwrap_html(&shell.wrap(raw)).as_deref(), Some(raw));
        assert_eq!(unwrap_html("<p>plain</p>"), None);
    }

    #[test]
    fn test_branding_flows_into_shell() {
        let site = SiteConfig {
            primary_color: Some("#112233".to_string()),
            logo_path: Some("/wy-apt-logo.png".to_string()),
            contact_email: Some("hello@example.com".to_string()),
            ..SiteConfig::default()
        };
        let shell = TemplateShell::from_site_config(&site);
        assert!(shell.header.contains("#112233"));
        assert!(shell.header.contains("/wy-apt-logo.png"));
        assert!(shell.footer.contains("hello@example.com"));
    }
}
