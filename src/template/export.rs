//! Export formats and email-safe HTML wrapping

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::types::{TemplateError, TemplateResult};

lazy_static! {
    static ref STYLE_ATTRIBUTE: Regex = Regex::new(r#"(?i)(\bstyle\s*=\s*)(?:"([^"]*)"|'([^']*)')"#)
        .expect("style attribute pattern is valid");
    static ref BACKGROUND_COLOR: Regex =
        Regex::new(r#"(?i)background-color:\s*[^;"']+;?"#).expect("background pattern is valid");
}

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Available export outputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Wrapped body with placeholders left in place
    #[default]
    Raw,
    /// Wrapped body resolved with preview values
    WithData,
    /// Like `WithData` with every background color forced to white
    NoBackgrounds,
    /// Resolved body inside the configured header/footer layout
    Layout,
    /// Preview values as a JSON object
    Variables,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Raw => "raw",
            ExportFormat::WithData => "with_data",
            ExportFormat::NoBackgrounds => "no_backgrounds",
            ExportFormat::Layout => "layout",
            ExportFormat::Variables => "variables",
        }
    }

    pub fn parse(value: &str) -> TemplateResult<Self> {
        match value {
            "raw" => Ok(ExportFormat::Raw),
            "with_data" => Ok(ExportFormat::WithData),
            "no_backgrounds" => Ok(ExportFormat::NoBackgrounds),
            "layout" => Ok(ExportFormat::Layout),
            "variables" => Ok(ExportFormat::Variables),
            other => Err(TemplateError::Validation(format!(
                "Unknown export format '{}'",
                other
            ))),
        }
    }

    fn file_suffix(&self) -> &'static str {
        match self {
            ExportFormat::Raw => "-template.html",
            ExportFormat::WithData => "-with-data.html",
            ExportFormat::NoBackgrounds => "-no-backgrounds.html",
            ExportFormat::Layout => "-layout.html",
            ExportFormat::Variables => "-variables.json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Variables => JSON_CONTENT_TYPE,
            _ => HTML_CONTENT_TYPE,
        }
    }
}

/// A rendered export ready to be served as a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub content: String,
}

impl ExportedFile {
    pub fn new(template_name: &str, format: ExportFormat, content: String) -> Self {
        Self {
            file_name: export_file_name(template_name, format),
            content_type: format.content_type(),
            content,
        }
    }
}

/// Wrap body HTML in a minimal XHTML document accepted by email clients
pub fn wrap_html_for_email(content: &str) -> String {
    format!(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
  <meta http-equiv="Content-Type" content="text/html; charset=utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Email Template</title>
  <style type="text/css">
    body {{ margin: 0; padding: 0; min-width: 100%; font-family: Arial, sans-serif; }}
    .variable {{ color: #2563eb; font-weight: bold; }}
  </style>
</head>
<body>
  {}
</body>
</html>"#,
        content
    )
}

/// Force every inline `background-color` declaration to white.
///
/// Only `style` attribute values are rewritten; text content and other
/// attributes pass through untouched.
pub fn strip_backgrounds(html: &str) -> String {
    STYLE_ATTRIBUTE
        .replace_all(html, |caps: &Captures| {
            let (quote, value) = match (caps.get(2), caps.get(3)) {
                (Some(value), _) => ('"', value.as_str()),
                (None, Some(value)) => ('\'', value.as_str()),
                (None, None) => return caps[0].to_string(),
            };
            let value = BACKGROUND_COLOR.replace_all(value, "background-color: #FFFFFF;");
            format!("{}{}{}{}", &caps[1], quote, value, quote)
        })
        .into_owned()
}

/// `"Welcome Email"` + `Raw` gives `"welcome-email-template.html"`.
///
/// Control characters are dropped so the name is always a valid header value.
pub fn export_file_name(template_name: &str, format: ExportFormat) -> String {
    let mut base = String::with_capacity(template_name.len());
    let mut in_whitespace = false;
    for c in template_name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                base.push('-');
            }
            in_whitespace = true;
        } else if !c.is_control() {
            base.push(c);
            in_whitespace = false;
        }
    }
    if base.is_empty() {
        base.push_str("email-template");
    }

    format!("{}{}", base, format.file_suffix())
}

/// Pretty JSON object of variable key to value, sorted by key
pub fn variables_json(values: &BTreeMap<String, String>) -> TemplateResult<String> {
    Ok(serde_json::to_string_pretty(values)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!(ExportFormat::parse("raw").unwrap(), ExportFormat::Raw);
        assert_eq!(
            ExportFormat::parse("no_backgrounds").unwrap(),
            ExportFormat::NoBackgrounds
        );
        assert!(matches!(
            ExportFormat::parse("zip"),
            Err(TemplateError::Validation(_))
        ));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            export_file_name("Welcome Email", ExportFormat::Raw),
            "welcome-email-template.html"
        );
        assert_eq!(
            export_file_name("Order   Confirmation", ExportFormat::WithData),
            "order-confirmation-with-data.html"
        );
        assert_eq!(
            export_file_name("News", ExportFormat::NoBackgrounds),
            "news-no-backgrounds.html"
        );
        assert_eq!(
            export_file_name("News", ExportFormat::Layout),
            "news-layout.html"
        );
        assert_eq!(
            export_file_name("News", ExportFormat::Variables),
            "news-variables.json"
        );
        assert_eq!(
            export_file_name("", ExportFormat::Raw),
            "email-template-template.html"
        );        assert_eq!(
            export_file_name("Promo\u{1}Deal\u{7f}", ExportFormat::Raw),
            "promodeal-template.html"
        );
    }

    #[test]
    fn test_wrap_html_for_email() {
        let html = wrap_html_for_email("<p>{{.firstName}}</p>");
        assert!(html.starts_with("<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\""));
        assert!(html.contains("<body>\n  <p>{{.firstName}}</p>\n</body>"));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn test_strip_backgrounds() {
        let html = r#"<div style="background-color: #33A8DF; color: red"><p style="BACKGROUND-COLOR:rgb(1, 2, 3);">x</p></div>"#;
        assert_eq!(
            strip_backgrounds(html),
            r#"<div style="background-color: #FFFFFF; color: red"><p style="background-color: #FFFFFF;">x</p></div>"#
        );
    }

    #[test]
    fn test_strip_backgrounds_unterminated_declaration() {
        let html = r#"<div style="background-color: red">Hello <b>Jane</b></div><p style="color: blue;">Bye</p>"#;
        assert_eq!(
            strip_backgrounds(html),
            r#"<div style="background-color: #FFFFFF;">Hello <b>Jane</b></div><p style="color: blue;">Bye</p>"#
        );
    }

    #[test]
    fn test_strip_backgrounds_leaves_text_alone() {
        let html = r#"<p>Set background-color: red; in CSS</p><td style='background-color:#000'>x</td>"#;
        assert_eq!(
            strip_backgrounds(html),
            r#"<p>Set background-color: red; in CSS</p><td style='background-color: #FFFFFF;'>x</td>"#
        );
    }

    #[test]
    fn test_variables_json_sorted() {
        let mut values = BTreeMap::new();
        values.insert("lastName".to_string(), "Doe".to_string());
        values.insert("firstName".to_string(), String::new());

        let json = variables_json(&values).unwrap();
        assert_eq!(json, "{\n  \"firstName\": \"\",\n  \"lastName\": \"Doe\"\n}");
    }

    #[test]
    fn test_content_types() {
        assert_eq!(ExportFormat::Variables.content_type(), "application/json");
        assert_eq!(ExportFormat::Layout.content_type(), "text/html; charset=utf-8");
    }
}
