//! Convert image + figcaption pairs in content/blog into figure shortcodes.

use anyhow::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    figcaption_helper::batch::run_standalone("figure-shortcode")
}
