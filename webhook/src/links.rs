use crate::errors::WebhookError;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

// Slack-style hyperlink: <https://example.com|label>
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(https?://[^|>]*?)\|([^>]*?)>").expect("valid pattern"));

/// Target dialect for hyperlink rewriting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkFormat {
    Html,
    Markdown,
}

impl FromStr for LinkFormat {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(LinkFormat::Html),
            "markdown" => Ok(LinkFormat::Markdown),
            other => Err(WebhookError::UnsupportedLinkFormat(other.to_string())),
        }
    }
}

/// Rewrite every Slack-style hyperlink in `text` into the target dialect.
///
/// Text without any match is returned unchanged, so the rewrite is idempotent
/// on already-converted text.
pub fn substitute_hyperlinks(text: &str, format: LinkFormat) -> String {
    LINK_PATTERN
        .replace_all(text, |caps: &regex::Captures| {
            let url = &caps[1];
            let label = &caps[2];
            match format {
                LinkFormat::Html => format!(r#"<a href="{url}">{label}</a>"#),
                LinkFormat::Markdown => format!("[{label}]({url})"),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_links_unchanged() {
        let text = "CPU above 90% for 5 minutes";
        assert_eq!(substitute_hyperlinks(text, LinkFormat::Html), text);
        assert_eq!(substitute_hyperlinks(text, LinkFormat::Markdown), text);
    }

    #[test]
    fn test_html_substitution() {
        let text = "See <https://wiki.example.com/runbook|the runbook> for details";
        assert_eq!(
            substitute_hyperlinks(text, LinkFormat::Html),
            r#"See <a href="https://wiki.example.com/runbook">the runbook</a> for details"#
        );
    }

    #[test]
    fn test_markdown_substitution() {
        let text = "See <http://grafana.internal/d/abc|dashboard>";
        assert_eq!(
            substitute_hyperlinks(text, LinkFormat::Markdown),
            "See [dashboard](http://grafana.internal/d/abc)"
        );
    }

    #[test]
    fn test_multiple_links_all_replaced() {
        let text = "<https://a.example.com|a> and <https://b.example.com|b>";
        let converted = substitute_hyperlinks(text, LinkFormat::Markdown);
        assert_eq!(converted, "[a](https://a.example.com) and [b](https://b.example.com)");
        // No residual raw pattern
        assert!(!LINK_PATTERN.is_match(&converted));
    }

    #[test]
    fn test_idempotent_on_converted_text() {
        let text = "See <https://a.example.com|a>";
        let once = substitute_hyperlinks(text, LinkFormat::Markdown);
        let twice = substitute_hyperlinks(&once, LinkFormat::Markdown);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_non_http_scheme_not_matched() {
        let text = "<ftp://files.example.com|files>";
        assert_eq!(substitute_hyperlinks(text, LinkFormat::Html), text);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("html".parse::<LinkFormat>().unwrap(), LinkFormat::Html);
        assert_eq!(
            "markdown".parse::<LinkFormat>().unwrap(),
            LinkFormat::Markdown
        );
        assert!(matches!(
            "bbcode".parse::<LinkFormat>(),
            Err(WebhookError::UnsupportedLinkFormat(_))
        ));
    }
}
