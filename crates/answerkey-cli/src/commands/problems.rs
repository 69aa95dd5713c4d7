//! The `answerkey problems` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use answerkey_core::problems::{expand_problem_list, response_template};

pub fn execute(list: String, output: Option<PathBuf>) -> Result<()> {
    let problems = expand_problem_list(&list)?;
    anyhow::ensure!(!problems.is_empty(), "problem list '{list}' is empty");
    let template = response_template(&problems);

    match output {
        Some(path) => {
            if path.exists() {
                anyhow::bail!("{} already exists", path.display());
            }
            std::fs::write(&path, &template)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Created {} ({} problems)", path.display(), problems.len());
        }
        None => print!("{template}"),
    }
    Ok(())
}
