//! Reduce single-quoted hyperlink captions in content/blog to their link text.

use anyhow::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    figcaption_helper::batch::run_standalone("simplify-captions")
}
