//! Extension points for the answer-key compiler.

// ---------------------------------------------------------------------------
// Equivalence expansion
// ---------------------------------------------------------------------------

/// Produces synonymous forms of an accepted answer value.
///
/// The compiler calls this once per answer variant; every returned value
/// becomes its own alternative carrying the input variant's tags. The
/// returned list should include the input itself if it is still accepted.
pub trait EquivalenceExpander: Send + Sync {
    fn expand(&self, value: &str) -> Vec<String>;
}

/// The default expander: every value stands for itself only.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityExpander;

impl EquivalenceExpander for IdentityExpander {
    fn expand(&self, value: &str) -> Vec<String> {
        vec![value.to_string()]
    }
}

/// Accepts a comma-separated list with or without surrounding parentheses,
/// so `5,4` also accepts `(5,4)` and the reverse.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParenthesizedListExpander;

impl EquivalenceExpander for ParenthesizedListExpander {
    fn expand(&self, value: &str) -> Vec<String> {
        let mut forms = vec![value.to_string()];
        if !value.contains(',') {
            return forms;
        }
        match value.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
            Some(inner) if !inner.contains(['(', ')']) => forms.push(inner.trim().to_string()),
            Some(_) => {}
            None if !value.contains(['(', ')']) => forms.push(format!("({value})")),
            None => {}
        }
        forms
    }
}

impl<F> EquivalenceExpander for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn expand(&self, value: &str) -> Vec<String> {
        self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_returns_input() {
        assert_eq!(IdentityExpander.expand("(4,5)"), vec!["(4,5)"]);
    }

    #[test]
    fn parenthesized_lists_gain_the_other_form() {
        let expander = ParenthesizedListExpander;
        assert_eq!(expander.expand("5,4"), vec!["5,4", "(5,4)"]);
        assert_eq!(expander.expand("(4, 5)"), vec!["(4, 5)", "4, 5"]);
        assert_eq!(expander.expand("23"), vec!["23"]);
        assert_eq!(expander.expand("f(x), g(x)"), vec!["f(x), g(x)"]);
    }

    #[test]
    fn closures_are_expanders() {
        let trailing_zero = |value: &str| {
            let mut forms = vec![value.to_string()];
            if let Some(whole) = value.strip_suffix(".0") {
                forms.push(whole.to_string());
            }
            forms
        };
        assert_eq!(trailing_zero.expand("8.0"), vec!["8.0", "8"]);
        assert_eq!(trailing_zero.expand("8"), vec!["8"]);
    }
}
