//! The `answerkey compile` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use answerkey_core::compiler::{compile_solution_text, rewrite_solution_file};
use answerkey_core::config::load_config_from;
use answerkey_core::model::ProblemSpec;
use answerkey_core::parser::AnswerKey;
use answerkey_core::traits::{EquivalenceExpander, IdentityExpander, ParenthesizedListExpander};

pub fn execute(solution: PathBuf, write: bool, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let expander: &dyn EquivalenceExpander = if config.expand_equivalents {
        &ParenthesizedListExpander
    } else {
        &IdentityExpander
    };

    if write {
        let summary = rewrite_solution_file(&solution, expander)?;
        println!(
            "Compiled {}: {} problems, {} changed",
            solution.display(),
            summary.lines,
            summary.changed
        );
    } else {
        let text = std::fs::read_to_string(&solution)
            .with_context(|| format!("failed to read answer key: {}", solution.display()))?;
        println!("{}", compile_solution_text(&text, expander));
    }

    // Tags are only classified at grading time; report problems now.
    let key = AnswerKey::load(&solution)?;
    let mut warnings = 0;
    for line in &key.lines {
        if let Err(e) = ProblemSpec::parse(line.number.as_str(), &line.text) {
            eprintln!("WARNING: {e}");
            warnings += 1;
        }
    }
    if warnings > 0 {
        eprintln!("\n{warnings} warning(s) found.");
    }

    Ok(())
}
