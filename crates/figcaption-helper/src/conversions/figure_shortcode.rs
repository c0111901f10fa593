// figure-shortcode: image + figcaption pair to a Hugo figure shortcode
//
// Input:
//   ![alt](src){: .center-image width="140px" }
//   <figcaption class="caption">caption text</figcaption>
//
// Output:
//   {{< figure src="src" alt="alt" caption="caption text" class="center-image" width="140px" >}}

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use std::fmt;
use std::ops::Range;

use crate::rule::{Finding, Rewrite, Rule};

const PAIR_PATTERN: &str = r#"!\[([^\]]*)\]\(([^\)]+)\)(\{[^}]+\})?\s*\n<figcaption class="caption">(.+?)</figcaption>"#;
const CLASS_PATTERN: &str = r"\.([a-z-]+)";
const WIDTH_PATTERN: &str = r#"width="([^"]+)""#;

/// An image reference immediately followed by a caption tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCaptionPair {
    /// Byte range of the whole pair in the document
    pub span: Range<usize>,
    pub alt: String,
    pub src: String,
    /// The `{...}` block after the image, braces included
    pub attrs: Option<String>,
    pub caption: String,
}

/// A `{{< figure ... >}}` shortcode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureShortcode {
    pub src: String,
    pub alt: String,
    pub caption: String,
    pub class: Option<String>,
    pub width: Option<String>,
}

impl fmt::Display for FigureShortcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"{{{{< figure src="{}" alt="{}" caption="{}""#,
            self.src, self.alt, self.caption
        )?;
        if let Some(class) = &self.class {
            write!(f, r#" class="{}""#, class)?;
        }
        if let Some(width) = &self.width {
            write!(f, r#" width="{}""#, width)?;
        }
        write!(f, " >}}}}")
    }
}

pub struct FigureShortcodeConverter {
    pair_regex: Regex,
    class_regex: Regex,
    width_regex: Regex,
}

impl FigureShortcodeConverter {
    pub fn new() -> Result<Self> {
        let pair_regex =
            Regex::new(PAIR_PATTERN).context("Failed to compile image/figcaption regex")?;
        let class_regex = Regex::new(CLASS_PATTERN).context("Failed to compile class regex")?;
        let width_regex = Regex::new(WIDTH_PATTERN).context("Failed to compile width regex")?;

        Ok(Self {
            pair_regex,
            class_regex,
            width_regex,
        })
    }

    /// Find every image + caption pair, in document order
    pub fn find_pairs(&self, content: &str) -> Vec<ImageCaptionPair> {
        self.pair_regex
            .captures_iter(content)
            .map(|caps| Self::pair_from_captures(&caps))
            .collect()
    }

    fn pair_from_captures(caps: &Captures<'_>) -> ImageCaptionPair {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let group = |i: usize| caps.get(i).map(|m| m.as_str().to_string());

        ImageCaptionPair {
            span: whole,
            alt: group(1).unwrap_or_default(),
            src: group(2).unwrap_or_default(),
            attrs: group(3),
            caption: group(4).unwrap_or_default(),
        }
    }

    /// Build the shortcode for a pair. Only the first `.class` token and a
    /// `width="..."` token survive from the attribute block.
    pub fn shortcode(&self, pair: &ImageCaptionPair) -> FigureShortcode {
        let attrs = pair.attrs.as_deref().unwrap_or_default();

        let class = self
            .class_regex
            .captures(attrs)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        let width = self
            .width_regex
            .captures(attrs)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        FigureShortcode {
            src: pair.src.clone(),
            alt: pair.alt.clone(),
            caption: pair.caption.clone(),
            class,
            width,
        }
    }
}

impl Rule for FigureShortcodeConverter {
    fn name(&self) -> &str {
        "figure-shortcode"
    }

    fn description(&self) -> &str {
        "Convert ![alt](src) followed by <figcaption class=\"caption\"> into a {{< figure >}} shortcode"
    }

    fn progress_label(&self) -> &str {
        "✓ Converted"
    }

    fn summary(&self, files_modified: usize) -> Option<String> {
        Some(format!("\n✓ Modified {} files", files_modified))
    }

    fn find(&self, content: &str) -> Vec<Finding> {
        self.find_pairs(content)
            .into_iter()
            .map(|pair| Finding {
                offset: pair.span.start,
                message: format!("Image with figcaption can become a figure shortcode: {}", pair.src),
            })
            .collect()
    }

    fn rewrite(&self, content: &str) -> Rewrite {
        let replacements = self.find_pairs(content).into_iter().map(|pair| {
            let shortcode = self.shortcode(&pair).to_string();
            (pair.span, shortcode)
        });
        Rewrite::splice(content, replacements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> FigureShortcodeConverter {
        FigureShortcodeConverter::new().unwrap()
    }

    #[test]
    fn test_class_and_width_are_extracted() {
        let input = "![cat](images/cat.png){: .center-image width=\"140px\" }\n<figcaption class=\"caption\">A cat.</figcaption>";
        let rewrite = converter().rewrite(input);
        assert_eq!(
            rewrite.content,
            r#"{{< figure src="images/cat.png" alt="cat" caption="A cat." class="center-image" width="140px" >}}"#
        );
        assert_eq!(rewrite.replacements, 1);
    }

    #[test]
    fn test_no_attribute_block_omits_class_and_width() {
        let input = "![cat](cat.png)\n<figcaption class=\"caption\">A cat.</figcaption>\n";
        let rewrite = converter().rewrite(input);
        assert_eq!(
            rewrite.content,
            "{{< figure src=\"cat.png\" alt=\"cat\" caption=\"A cat.\" >}}\n"
        );
    }

    #[test]
    fn test_unrecognized_attributes_are_dropped() {
        let input = "![x](x.png){: #anchor height=\"3em\" }\n<figcaption class=\"caption\">X</figcaption>";
        let rewrite = converter().rewrite(input);
        assert_eq!(
            rewrite.content,
            r#"{{< figure src="x.png" alt="x" caption="X" >}}"#
        );
    }

    #[test]
    fn test_only_first_class_is_kept() {
        let pair = ImageCaptionPair {
            span: 0..0,
            alt: String::new(),
            src: "a.png".to_string(),
            attrs: Some("{: .left .shadow }".to_string()),
            caption: "c".to_string(),
        };
        let shortcode = converter().shortcode(&pair);
        assert_eq!(shortcode.class.as_deref(), Some("left"));
        assert_eq!(shortcode.width, None);
    }

    #[test]
    fn test_empty_alt_text_is_allowed() {
        let input = "![](a.png)\n<figcaption class=\"caption\">c</figcaption>";
        let pairs = converter().find_pairs(input);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].alt, "");
    }

    #[test]
    fn test_whitespace_before_line_break_is_consumed() {
        let input = "![a](a.png)   \n<figcaption class=\"caption\">c</figcaption>";
        assert_eq!(converter().find_pairs(input).len(), 1);
    }

    #[test]
    fn test_caption_without_image_is_untouched() {
        let input = "Some text\n<figcaption class=\"caption\">c</figcaption>\n";
        let rewrite = converter().rewrite(input);
        assert_eq!(rewrite.content, input);
        assert_eq!(rewrite.replacements, 0);
    }

    #[test]
    fn test_image_without_caption_is_untouched() {
        let input = "![a](a.png)\n\nA paragraph.\n";
        assert!(converter().find_pairs(input).is_empty());
    }

    #[test]
    fn test_other_caption_class_is_untouched() {
        let input = "![a](a.png)\n<figcaption class=\"note\">c</figcaption>";
        assert!(converter().find_pairs(input).is_empty());
    }

    #[test]
    fn test_caption_does_not_cross_lines() {
        let input = "![a](a.png)\n<figcaption class=\"caption\">line one\nline two</figcaption>";
        assert!(converter().find_pairs(input).is_empty());
    }

    #[test]
    fn test_caption_is_lazy() {
        let input = "![a](a.png)\n<figcaption class=\"caption\">one</figcaption> and </figcaption>";
        let pairs = converter().find_pairs(input);
        assert_eq!(pairs[0].caption, "one");
    }

    #[test]
    fn test_two_pairs_are_converted_independently() {
        let input = concat!(
            "Intro.\n\n",
            "![first](one.png){: .center-image }\n",
            "<figcaption class=\"caption\">First.</figcaption>\n\n",
            "Middle.\n\n",
            "![second](two.png){: width=\"50%\" }\n",
            "<figcaption class=\"caption\">Second.</figcaption>\n",
        );
        let rewrite = converter().rewrite(input);
        assert_eq!(rewrite.replacements, 2);
        assert_eq!(
            rewrite.content,
            concat!(
                "Intro.\n\n",
                "{{< figure src=\"one.png\" alt=\"first\" caption=\"First.\" class=\"center-image\" >}}\n\n",
                "Middle.\n\n",
                "{{< figure src=\"two.png\" alt=\"second\" caption=\"Second.\" width=\"50%\" >}}\n",
            )
        );
    }

    #[test]
    fn test_shortcode_output_has_no_matches() {
        let input = r#"{{< figure src="a.png" alt="a" caption="c" >}}"#;
        let rewrite = converter().rewrite(input);
        assert_eq!(rewrite.content, input);
        assert!(converter().find(input).is_empty());
    }
}
