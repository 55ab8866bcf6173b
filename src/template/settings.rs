//! Background and header/footer styling attached to a template

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BODY_BG_COLOR: &str = "#D9D9D9";
pub const DEFAULT_CONTAINER_BG_COLOR: &str = "#FFFFFF";
pub const DEFAULT_HEADER_BG_COLOR: &str = "#33A8DF";
pub const DEFAULT_CONTENT_BG_COLOR: &str = "#FFFFFF";
pub const DEFAULT_FOOTER_BG_COLOR: &str = "#33A8DF";
pub const DEFAULT_MAX_WIDTH: &str = "650px";

/// Colors and width of the email layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundSettings {
    pub body_bg_color: String,
    pub container_bg_color: String,
    pub header_bg_color: String,
    pub content_bg_color: String,
    pub footer_bg_color: String,
    pub max_width: String,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            body_bg_color: DEFAULT_BODY_BG_COLOR.to_string(),
            container_bg_color: DEFAULT_CONTAINER_BG_COLOR.to_string(),
            header_bg_color: DEFAULT_HEADER_BG_COLOR.to_string(),
            content_bg_color: DEFAULT_CONTENT_BG_COLOR.to_string(),
            footer_bg_color: DEFAULT_FOOTER_BG_COLOR.to_string(),
            max_width: DEFAULT_MAX_WIDTH.to_string(),
        }
    }
}

/// Partial background update; empty strings count as absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBackgroundRequest {
    pub body_bg_color: Option<String>,
    pub container_bg_color: Option<String>,
    pub header_bg_color: Option<String>,
    pub content_bg_color: Option<String>,
    pub footer_bg_color: Option<String>,
    pub max_width: Option<String>,
}

impl BackgroundSettings {
    /// Overlay the non-empty fields of `update` onto `self`
    pub fn merged(mut self, update: UpdateBackgroundRequest) -> Self {
        fn apply(slot: &mut String, value: Option<String>) {
            if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
                *slot = v;
            }
        }

        apply(&mut self.body_bg_color, update.body_bg_color);
        apply(&mut self.container_bg_color, update.container_bg_color);
        apply(&mut self.header_bg_color, update.header_bg_color);
        apply(&mut self.content_bg_color, update.content_bg_color);
        apply(&mut self.footer_bg_color, update.footer_bg_color);
        apply(&mut self.max_width, update.max_width);
        self
    }
}

/// Horizontal placement of the header logo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoAlignment {
    Left,
    #[default]
    Center,
    Right,
}

impl LogoAlignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogoAlignment::Left => "left",
            LogoAlignment::Center => "center",
            LogoAlignment::Right => "right",
        }
    }
}

/// A social network link shown in the footer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl SocialLink {
    fn new(platform: &str, url: &str, enabled: bool) -> Self {
        Self {
            platform: platform.to_string(),
            url: url.to_string(),
            enabled,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Header block settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderSettings {
    pub enabled: bool,
    pub content: String,
    pub text_color: String,
    pub logo_url: Option<String>,
    pub logo_alignment: LogoAlignment,
    pub logo_width: u32,
}

impl Default for HeaderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            content: "Company Name".to_string(),
            text_color: "#FFFFFF".to_string(),
            logo_url: None,
            logo_alignment: LogoAlignment::Center,
            logo_width: 200,
        }
    }
}

/// Footer block settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterSettings {
    pub enabled: bool,
    pub content: String,
    pub text_color: String,
    pub show_social_icons: bool,
    pub social_links: Vec<SocialLink>,
    pub show_unsubscribe: bool,
    pub unsubscribe_text: String,
    pub unsubscribe_url: String,
    pub show_address: bool,
    pub address: String,
    pub copyright_text: String,
}

impl Default for FooterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            content: String::new(),
            text_color: "#FFFFFF".to_string(),
            show_social_icons: true,
            social_links: vec![
                SocialLink::new("facebook", "https://facebook.com/", true),
                SocialLink::new("twitter", "https://twitter.com/", true),
                SocialLink::new("instagram", "https://instagram.com/", true),
                SocialLink::new("linkedin", "https://linkedin.com/", false),
            ],
            show_unsubscribe: true,
            unsubscribe_text: "Unsubscribe".to_string(),
            unsubscribe_url: "{{.unsubscribeUrl}}".to_string(),
            show_address: true,
            address: "123 Main St, City, State 12345".to_string(),
            copyright_text: format!(
                "© {} Company Name. All Rights Reserved.",
                Utc::now().year()
            ),
        }
    }
}

/// Header and footer configuration for a template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderFooterSettings {
    pub header: HeaderSettings,
    pub footer: FooterSettings,
}

impl HeaderFooterSettings {
    /// Social links that should be rendered
    pub fn visible_social_links(&self) -> impl Iterator<Item = &SocialLink> {
        let show = self.footer.enabled && self.footer.show_social_icons;
        self.footer
            .social_links
            .iter()
            .filter(move |link| show && link.enabled && !link.url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_background_defaults() {
        let bg = BackgroundSettings::default();
        assert_eq!(bg.body_bg_color, "#D9D9D9");
        assert_eq!(bg.header_bg_color, "#33A8DF");
        assert_eq!(bg.max_width, "650px");
    }

    #[test]
    fn test_background_merge_skips_empty() {
        let update = UpdateBackgroundRequest {
            body_bg_color: Some("#000000".to_string()),
            max_width: Some("".to_string()),
            ..Default::default()
        };
        let merged = BackgroundSettings::default().merged(update);
        assert_eq!(merged.body_bg_color, "#000000");
        assert_eq!(merged.max_width, "650px");
        assert_eq!(merged.footer_bg_color, "#33A8DF");
    }

    #[test]
    fn test_header_footer_partial_json_fills_defaults() {
        let settings: HeaderFooterSettings = serde_json::from_value(json!({
            "header": { "content": "Acme", "logo_alignment": "left" },
            "footer": { "show_address": false }
        }))
        .unwrap();

        assert_eq!(settings.header.content, "Acme");
        assert_eq!(settings.header.logo_alignment, LogoAlignment::Left);
        assert!(settings.header.enabled);
        assert!(!settings.footer.show_address);
        assert_eq!(settings.footer.unsubscribe_url, "{{.unsubscribeUrl}}");
    }

    #[test]
    fn test_unknown_alignment_rejected() {
        let result: Result<HeaderFooterSettings, _> =
            serde_json::from_value(json!({"header": {"logo_alignment": "justify"}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_visible_social_links() {
        let mut settings = HeaderFooterSettings::default();
        let platforms: Vec<_> = settings
            .visible_social_links()
            .map(|l| l.platform.as_str())
            .collect();
        assert_eq!(platforms, vec!["facebook", "twitter", "instagram"]);

        settings.footer.show_social_icons = false;
        assert_eq!(settings.visible_social_links().count(), 0);
    }
}
