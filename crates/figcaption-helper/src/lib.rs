//! Rewrite passes for blog Markdown that still uses the
//! `![alt](src)` + `<figcaption class="caption">` idiom.
//!
//! Three rules run in order over the same content directory:
//!
//! 1. `figure-shortcode` turns an image followed by a caption tag into a
//!    single `{{< figure ... >}}` shortcode.
//! 2. `caption-quotes` single-quotes a `caption` attribute whose value is a
//!    hyperlink, so the `href` quotes need no escaping.
//! 3. `simplify-captions` replaces such a hyperlink caption with its link
//!    text.
//!
//! Each rule is a pure `&str -> Rewrite` function; [`batch`] wraps it with
//! file enumeration, write-if-changed and console reporting.

pub mod batch;
pub mod config;
pub mod conversions;
pub mod error;
pub mod logging;
pub mod rule;
pub mod utils;

pub use config::HelperConfig;
pub use error::{ConfigError, FileError};
pub use rule::{Rewrite, Rule, RuleRegistry};
