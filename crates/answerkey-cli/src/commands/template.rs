//! The `answerkey template` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use answerkey_core::parser::AnswerKey;
use answerkey_core::problems::response_template;

pub fn execute(solution: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let key = AnswerKey::load(&solution)?;
    let numbers: Vec<&str> = key.lines.iter().map(|l| l.number.as_str()).collect();
    let template = response_template(&numbers);

    match output {
        Some(path) => {
            std::fs::write(&path, &template)
                .with_context(|| format!("failed to write template: {}", path.display()))?;
            println!("Created {} ({} problems)", path.display(), numbers.len());
        }
        None => print!("{template}"),
    }
    Ok(())
}
