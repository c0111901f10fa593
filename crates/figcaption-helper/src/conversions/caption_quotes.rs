// caption-quotes: switch a hyperlink caption to single quotes
//
//   caption="<a href="url">text</a>"  ->  caption='<a href="url">text</a>'
//
// Only a caption whose entire value is the link matches.

use anyhow::{Context, Result};
use regex::Regex;

use super::link_caption::LinkCaption;
use crate::rule::{Finding, Rewrite, Rule};

const DOUBLE_QUOTED_LINK_PATTERN: &str = r#"caption="<a href="([^"]+)">(.*?)</a>""#;

pub struct CaptionQuoteNormalizer {
    link_regex: Regex,
}

impl CaptionQuoteNormalizer {
    pub fn new() -> Result<Self> {
        let link_regex = Regex::new(DOUBLE_QUOTED_LINK_PATTERN)
            .context("Failed to compile double-quoted link caption regex")?;

        Ok(Self { link_regex })
    }

    pub fn find_links(&self, content: &str) -> Vec<LinkCaption> {
        LinkCaption::find_all(&self.link_regex, content)
    }
}

impl Rule for CaptionQuoteNormalizer {
    fn name(&self) -> &str {
        "caption-quotes"
    }

    fn description(&self) -> &str {
        "Single-quote caption=\"<a href=\"...\">...</a>\" so the href quotes stay unescaped"
    }

    fn progress_label(&self) -> &str {
        "Fixed"
    }

    fn summary(&self, _files_modified: usize) -> Option<String> {
        None
    }

    fn find(&self, content: &str) -> Vec<Finding> {
        self.find_links(content)
            .into_iter()
            .map(|link| Finding {
                offset: link.span.start,
                message: format!("Link caption has nested double quotes: {}", link.href),
            })
            .collect()
    }

    fn rewrite(&self, content: &str) -> Rewrite {
        let replacements = self
            .find_links(content)
            .into_iter()
            .map(|link| {
                let quoted = link.render_single_quoted();
                (link.span, quoted)
            });
        Rewrite::splice(content, replacements)
    }
}
