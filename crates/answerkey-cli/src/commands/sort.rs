//! The `answerkey sort` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use answerkey_core::problems::sort_lines;

pub fn execute(file: PathBuf) -> Result<()> {
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let sorted = sort_lines(&text);
    std::fs::write(&file, &sorted)
        .with_context(|| format!("failed to write {}", file.display()))?;
    println!("Sorted {} ({} lines)", file.display(), sorted.lines().count());
    Ok(())
}
