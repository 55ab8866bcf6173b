//! Header / content / footer email layout built from typed settings.
//!
//! The layout is generated from scratch around the template body; the body
//! itself is inserted verbatim and never parsed.

use std::fmt::Write;

use super::settings::{BackgroundSettings, HeaderFooterSettings, HeaderSettings};

const DOCTYPE: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#;

/// Compose a complete HTML document around `content`.
///
/// Without header/footer settings only the content block is emitted.
pub fn compose_layout(
    title: &str,
    content: &str,
    background: &BackgroundSettings,
    header_footer: Option<&HeaderFooterSettings>,
) -> String {
    let mut html = String::with_capacity(content.len() + 4096);

    let _ = write!(
        html,
        r#"{doctype}
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
  <meta http-equiv="Content-Type" content="text/html; charset=utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{title}</title>
  <style type="text/css">
    body {{ margin: 0; padding: 0; min-width: 100%; font-family: Arial, sans-serif; }}
    .email-container {{ width: 100%; margin: 0 auto; max-width: {max_width}; }}
    .email-header {{ background-color: {header_bg}; padding: 20px; text-align: center; }}
    .email-body {{ background-color: {content_bg}; padding: 40px 20px; }}
    .email-footer {{ background-color: {footer_bg}; padding: 20px; text-align: center; }}
  </style>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: {body_bg};">
  <div style="width: 100%; margin: 0 auto; background-color: {body_bg};">
    <div class="email-container" style="margin: 0 auto; max-width: {max_width}; background-color: {container_bg};">
"#,
        doctype = DOCTYPE,
        title = if title.is_empty() { "Email Template" } else { title },
        max_width = background.max_width,
        header_bg = background.header_bg_color,
        content_bg = background.content_bg_color,
        footer_bg = background.footer_bg_color,
        body_bg = background.body_bg_color,
        container_bg = background.container_bg_color,
    );

    if let Some(settings) = header_footer.filter(|s| s.header.enabled) {
        push_header(&mut html, &settings.header, background);
    }

    let _ = write!(
        html,
        r#"      <div class="email-body" style="padding: 40px 20px; background-color: {};">
        {}
      </div>
"#,
        background.content_bg_color, content
    );

    if let Some(settings) = header_footer.filter(|s| s.footer.enabled) {
        push_footer(&mut html, settings, background);
    }

    html.push_str("    </div>\n  </div>\n</body>\n</html>\n");
    html
}

fn push_header(html: &mut String, header: &HeaderSettings, background: &BackgroundSettings) {
    let _ = writeln!(
        html,
        r#"      <div class="email-header" style="background-color: {}; padding: 20px; text-align: center;">"#,
        background.header_bg_color
    );

    if let Some(logo_url) = header.logo_url.as_deref().filter(|url| !url.is_empty()) {
        let margin = if header.content.is_empty() { "0" } else { "10px" };
        let _ = writeln!(
            html,
            r#"        <div style="text-align: {}; margin-bottom: {};"><img src="{}" alt="Logo" style="max-width: {}px; max-height: 80px;" /></div>"#,
            header.logo_alignment.as_str(),
            margin,
            logo_url,
            header.logo_width
        );
    }

    if !header.content.is_empty() {
        let _ = writeln!(
            html,
            r#"        <div style="color: {}; font-size: 22px; font-weight: bold;">{}</div>"#,
            header.text_color, header.content
        );
    }

    html.push_str("      </div>\n");
}

fn push_footer(html: &mut String, settings: &HeaderFooterSettings, background: &BackgroundSettings) {
    let footer = &settings.footer;
    let _ = writeln!(
        html,
        r#"      <div class="email-footer" style="background-color: {}; padding: 20px; text-align: center; color: {};">"#,
        background.footer_bg_color, footer.text_color
    );

    if !footer.content.is_empty() {
        let _ = writeln!(
            html,
            r#"        <div style="margin-bottom: 15px;">{}</div>"#,
            footer.content
        );
    }

    let mut links = settings.visible_social_links().peekable();
    if links.peek().is_some() {
        html.push_str(r#"        <div style="margin-bottom: 15px;">"#);
        for link in links {
            let initial: String = link
                .platform
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect())
                .unwrap_or_default();
            let _ = write!(
                html,
                r#"<a href="{}" target="_blank" rel="noopener noreferrer" style="display: inline-block; margin: 0 10px; width: 24px; height: 24px; background-color: #FFFFFF; border-radius: 50%; text-align: center; line-height: 24px; text-decoration: none; color: #333333; font-weight: bold;">{}</a>"#,
                link.url, initial
            );
        }
        html.push_str("</div>\n");
    }

    if footer.show_address && !footer.address.is_empty() {
        let _ = writeln!(
            html,
            r#"        <div style="margin-bottom: 10px; font-size: 12px;">{}</div>"#,
            footer.address
        );
    }

    if footer.show_unsubscribe {
        let url = if footer.unsubscribe_url.is_empty() {
            "#"
        } else {
            footer.unsubscribe_url.as_str()
        };
        let text = if footer.unsubscribe_text.is_empty() {
            "Unsubscribe"
        } else {
            footer.unsubscribe_text.as_str()
        };
        let _ = writeln!(
            html,
            r#"        <div style="margin-bottom: 10px; font-size: 12px;"><a href="{}" style="color: {}; text-decoration: underline;">{}</a></div>"#,
            url, footer.text_color, text
        );
    }

    if !footer.copyright_text.is_empty() {
        let _ = writeln!(
            html,
            r#"        <div style="font-size: 12px;">{}</div>"#,
            footer.copyright_text
        );
    }

    html.push_str("      </div>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_only_without_header_footer() {
        let html = compose_layout("Welcome", "<p>Hi</p>", &BackgroundSettings::default(), None);

        assert!(html.starts_with("<!DOCTYPE html PUBLIC"));
        assert!(html.contains("<title>Welcome</title>"));
        assert!(html.contains("<p>Hi</p>"));
        assert!(html.contains("background-color: #D9D9D9;"));
        assert!(html.contains("max-width: 650px;"));
        assert!(!html.contains(r#"class="email-header""#));
        assert!(!html.contains(r#"class="email-footer""#));
    }

    #[test]
    fn test_default_header_footer_blocks() {
        let settings = HeaderFooterSettings::default();
        let html = compose_layout("", "<p>Body</p>", &BackgroundSettings::default(), Some(&settings));

        assert!(html.contains("<title>Email Template</title>"));
        assert!(html.contains(r#"class="email-header""#));
        assert!(html.contains(">Company Name</div>"));
        assert!(html.contains(r#"href="{{.unsubscribeUrl}}""#));
        assert!(html.contains("123 Main St, City, State 12345"));
        // facebook, twitter, instagram enabled; linkedin disabled
        assert!(html.contains(r#"href="https://facebook.com/""#));
        assert!(!html.contains("linkedin"));

        let header_pos = html.find(r#"class="email-header""#).unwrap();
        let body_pos = html.find("<p>Body</p>").unwrap();
        let footer_pos = html.find(r#"class="email-footer""#).unwrap();
        assert!(header_pos < body_pos && body_pos < footer_pos);
    }

    #[test]
    fn test_disabled_blocks_and_logo() {
        let mut settings = HeaderFooterSettings::default();
        settings.header.logo_url = Some("https://cdn.example.com/logo.png".to_string());
        settings.header.logo_width = 120;
        settings.footer.enabled = false;

        let html = compose_layout("T", "x", &BackgroundSettings::default(), Some(&settings));
        assert!(html.contains(r#"<img src="https://cdn.example.com/logo.png""#));
        assert!(html.contains("max-width: 120px;"));
        assert!(!html.contains(r#"class="email-footer""#));

        settings.header.enabled = false;
        let html = compose_layout("T", "x", &BackgroundSettings::default(), Some(&settings));
        assert!(!html.contains(r#"class="email-header""#));
    }

    #[test]
    fn test_custom_background_colors() {
        let background = BackgroundSettings {
            body_bg_color: "#000000".to_string(),
            header_bg_color: "#111111".to_string(),
            ..BackgroundSettings::default()
        };
        let html = compose_layout(
            "T",
            "x",
            &background,
            Some(&HeaderFooterSettings::default()),
        );
        assert!(html.contains("background-color: #000000;"));
        assert!(html.contains("background-color: #111111;"));
    }
}
