//! Answer-key compiler.
//!
//! Expands author shorthand into canonical alternatives:
//!
//! ```text
//! 4,5 & 5,4|(5,4) ; Values are switched! ; 0.5
//! ```
//!
//! compiles to
//!
//! ```text
//! 4,5 & 5,4 ; Values are switched! ; 0.5 & (5,4) ; Values are switched! ; 0.5
//! ```
//!
//! The compiler is purely syntactic. Tags are carried through untouched and
//! only classified later, when a `ProblemSpec` is parsed for grading.

use std::path::Path;

use anyhow::{Context, Result};

use crate::parser::split_numbered_line;
use crate::traits::EquivalenceExpander;

/// Separates alternatives.
pub const ALTERNATIVE_SEPARATOR: char = '&';
/// Separates an alternative's value from its tags.
pub const TAG_SEPARATOR: char = ';';
/// Separates variants that share one set of tags.
pub const VARIANT_SEPARATOR: char = '|';

/// One fully unrolled alternative: a single value and its raw tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAlternative {
    pub value: String,
    pub tags: Vec<String>,
}

impl RawAlternative {
    /// Render in canonical form: `value ; tag ; tag`.
    pub fn render(&self) -> String {
        std::iter::once(self.value.as_str())
            .chain(self.tags.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(&format!(" {TAG_SEPARATOR} "))
    }
}

/// Split a specification line into unrolled alternatives, in author order.
///
/// An alternative whose value and tags were already emitted for this line is
/// dropped, so expanding an already expanded line adds nothing.
pub fn split_alternatives(line: &str, expander: &dyn EquivalenceExpander) -> Vec<RawAlternative> {
    let mut alternatives = Vec::new();

    for chunk in line.split(ALTERNATIVE_SEPARATOR) {
        let mut pieces = chunk.split(TAG_SEPARATOR).map(str::trim);
        let value = pieces.next().unwrap_or_default();
        let tags: Vec<String> = pieces
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();

        for variant in value.split(VARIANT_SEPARATOR).map(str::trim) {
            if variant.is_empty() {
                continue;
            }
            for expanded in expander.expand(variant) {
                let expanded = expanded.trim();
                if expanded.is_empty() {
                    continue;
                }
                let alternative = RawAlternative {
                    value: expanded.to_string(),
                    tags: tags.clone(),
                };
                if !alternatives.contains(&alternative) {
                    alternatives.push(alternative);
                }
            }
        }
    }

    alternatives
}

/// Compile one specification line to canonical form.
pub fn compile_line(line: &str, expander: &dyn EquivalenceExpander) -> String {
    split_alternatives(line, expander)
        .iter()
        .map(RawAlternative::render)
        .collect::<Vec<_>>()
        .join(&format!(" {ALTERNATIVE_SEPARATOR} "))
}

/// Compile every numbered line of an answer key, keeping the `N. ` prefix.
pub fn compile_solution_text(text: &str, expander: &dyn EquivalenceExpander) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let (number, spec) = split_numbered_line(line);
            match number {
                Some(number) => format!("{number}. {}", compile_line(spec, expander)),
                None => compile_line(spec, expander),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// What a rewrite of an answer-key file changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileSummary {
    /// Number of problem lines compiled.
    pub lines: usize,
    /// Number of lines whose text changed.
    pub changed: usize,
}

/// Compile an answer-key file and overwrite it with the canonical form.
pub fn rewrite_solution_file(
    path: &Path,
    expander: &dyn EquivalenceExpander,
) -> Result<CompileSummary> {
    let original = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answer key: {}", path.display()))?;
    let compiled = compile_solution_text(&original, expander);

    let before: Vec<&str> = original.lines().filter(|l| !l.trim().is_empty()).collect();
    let after: Vec<&str> = compiled.lines().collect();
    let changed = before
        .iter()
        .zip(&after)
        .filter(|(old, new)| old.trim() != new.trim())
        .count();

    std::fs::write(path, format!("{compiled}\n"))
        .with_context(|| format!("failed to write answer key: {}", path.display()))?;
    tracing::info!(
        "compiled {} ({} lines, {} changed)",
        path.display(),
        after.len(),
        changed
    );

    Ok(CompileSummary {
        lines: after.len(),
        changed,
    })
}
