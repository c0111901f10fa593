//! Single-quote hyperlink captions in content/blog.

use anyhow::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    figcaption_helper::batch::run_standalone("caption-quotes")
}
