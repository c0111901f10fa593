//! The `caption` attribute whose whole value is an `<a href="...">` link.

use regex::Regex;
use std::ops::Range;

/// A `caption` attribute holding exactly one hyperlink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCaption {
    /// Byte range of `caption=...` including the closing quote
    pub span: Range<usize>,
    pub href: String,
    pub text: String,
}

impl LinkCaption {
    /// Scan `content` with a regex whose groups are (href, text).
    pub fn find_all(regex: &Regex, content: &str) -> Vec<Self> {
        regex
            .captures_iter(content)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(Self {
                    span: whole.range(),
                    href: caps.get(1)?.as_str().to_string(),
                    text: caps.get(2)?.as_str().to_string(),
                })
            })
            .collect()
    }

    /// `caption='<a href="URL">TEXT</a>'`
    pub fn render_single_quoted(&self) -> String {
        format!(r#"caption='<a href="{}">{}</a>'"#, self.href, self.text)
    }

    /// `caption="TEXT"`
    pub fn render_plain(&self) -> String {
        format!(r#"caption="{}""#, self.text)
    }
}
