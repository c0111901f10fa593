// simplify-captions: drop the link from a single-quoted hyperlink caption
//
//   caption='<a href="url">text</a>'  ->  caption="text"
//
// The link text is re-embedded as is. A `"` inside it breaks the attribute,
// so such captions are reported with a warning but still rewritten.

use anyhow::{Context, Result};
use regex::Regex;

use super::link_caption::LinkCaption;
use crate::rule::{Finding, Rewrite, Rule};

const SINGLE_QUOTED_LINK_PATTERN: &str = r#"caption='<a href="([^"]+)">([^<]+)</a>'"#;

pub struct CaptionSimplifier {
    link_regex: Regex,
}

impl CaptionSimplifier {
    pub fn new() -> Result<Self> {
        let link_regex = Regex::new(SINGLE_QUOTED_LINK_PATTERN)
            .context("Failed to compile single-quoted link caption regex")?;

        Ok(Self { link_regex })
    }

    pub fn find_links(&self, content: &str) -> Vec<LinkCaption> {
        LinkCaption::find_all(&self.link_regex, content)
    }
}

impl Rule for CaptionSimplifier {
    fn name(&self) -> &str {
        "simplify-captions"
    }

    fn description(&self) -> &str {
        "Replace caption='<a href=\"...\">text</a>' with caption=\"text\""
    }

    fn progress_label(&self) -> &str {
        "Simplified"
    }

    fn summary(&self, files_modified: usize) -> Option<String> {
        Some(format!("\nSimplified {} files", files_modified))
    }

    fn find(&self, content: &str) -> Vec<Finding> {
        self.find_links(content)
            .into_iter()
            .map(|link| {
                let message = if link.text.contains('"') {
                    format!(
                        "Link caption text contains a double quote and will break the attribute: {}",
                        link.text
                    )
                } else {
                    format!("Link caption can be reduced to its text: {}", link.text)
                };
                Finding {
                    offset: link.span.start,
                    message,
                }
            })
            .collect()
    }

    fn rewrite(&self, content: &str) -> Rewrite {
        let replacements = self.find_links(content).into_iter().map(|link| {
            if link.text.contains('"') {
                tracing::warn!(
                    text = %link.text,
                    "caption text contains a double quote; the rewritten attribute is not well-formed"
                );
            }
            let plain = link.render_plain();
            (link.span, plain)
        });
        Rewrite::splice(content, replacements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simplifier() -> CaptionSimplifier {
        CaptionSimplifier::new().unwrap()
    }

    #[test]
    fn test_link_is_reduced_to_text() {
        let input = r#"caption='<a href="http://x.com">Link Text</a>'"#;
        let rewrite = simplifier().rewrite(input);
        assert_eq!(rewrite.content, r#"caption="Link Text""#);
        assert_eq!(rewrite.replacements, 1);
    }

    #[test]
    fn test_double_quoted_link_is_untouched() {
        let input = r#"caption="<a href="http://x.com">Link</a>""#;
        let rewrite = simplifier().rewrite(input);
        assert_eq!(rewrite.content, input);
        assert_eq!(rewrite.replacements, 0);
    }

    #[test]
    fn test_nested_tags_are_untouched() {
        let input = r#"caption='<a href="http://x.com"><em>Link</em></a>'"#;
        assert!(simplifier().find_links(input).is_empty());
    }

    #[test]
    fn test_quote_in_text_passes_through() {
        let input = r#"caption='<a href="http://x.com">The "Best" Cat</a>'"#;
        let rewrite = simplifier().rewrite(input);
        assert_eq!(rewrite.content, r#"caption="The "Best" Cat""#);

        let findings = simplifier().find(input);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("double quote"));
    }

    #[test]
    fn test_every_caption_in_document() {
        let input = concat!(
            "{{< figure src=\"a.png\" alt=\"a\" caption='<a href=\"http://a.com\">A</a>' >}}\n",
            "{{< figure src=\"b.png\" alt=\"b\" caption=\"Plain\" >}}\n",
            "{{< figure src=\"c.png\" alt=\"c\" caption='<a href=\"http://c.com\">C</a>' width=\"10px\" >}}\n",
        );
        let rewrite = simplifier().rewrite(input);
        assert_eq!(rewrite.replacements, 2);
        assert_eq!(
            rewrite.content,
            concat!(
                "{{< figure src=\"a.png\" alt=\"a\" caption=\"A\" >}}\n",
                "{{< figure src=\"b.png\" alt=\"b\" caption=\"Plain\" >}}\n",
                "{{< figure src=\"c.png\" alt=\"c\" caption=\"C\" width=\"10px\" >}}\n",
            )
        );
    }
}
