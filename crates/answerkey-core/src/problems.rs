//! Problem numbering for answer-key authoring.
//!
//! Problem numbers are a number with an optional one-letter part (`5`, `5a`)
//! and order by number first, then part.

use std::fmt;
use std::str::FromStr;

use crate::error::ProblemListError;
use crate::parser::split_numbered_line;

/// A problem number such as `16` or `16a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProblemNumber {
    pub number: u32,
    pub part: Option<char>,
}

impl ProblemNumber {
    pub fn new(number: u32) -> Self {
        Self { number, part: None }
    }

    pub fn with_part(number: u32, part: char) -> Self {
        Self {
            number,
            part: Some(part),
        }
    }

    /// Read the number prefix of a numbered line, e.g. `5a. 23` gives `5a`.
    pub fn from_line(line: &str) -> Option<Self> {
        let (number, _) = split_numbered_line(line);
        number?.parse().ok()
    }
}

impl FromStr for ProblemNumber {
    type Err = ProblemListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ProblemListError::InvalidNumber(s.to_string());
        let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, rest) = s.split_at(digits_end);
        let number = digits.parse().map_err(|_| invalid())?;

        let mut letters = rest.chars();
        match (letters.next(), letters.next()) {
            (None, _) => Ok(Self::new(number)),
            (Some(part), None) if part.is_ascii_alphabetic() => {
                Ok(Self::with_part(number, part.to_ascii_lowercase()))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ProblemNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.part {
            Some(part) => write!(f, "{}{}", self.number, part),
            None => write!(f, "{}", self.number),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parity {
    Odd,
    Even,
}

impl Parity {
    fn accepts(self, n: u32) -> bool {
        match self {
            Parity::Odd => n % 2 == 1,
            Parity::Even => n % 2 == 0,
        }
    }
}

/// Strip a trailing `odds`/`evens` qualifier.
fn split_parity(s: &str) -> (&str, Option<Parity>) {
    for (suffix, parity) in [
        ("evens", Parity::Even),
        ("even", Parity::Even),
        ("odds", Parity::Odd),
        ("odd", Parity::Odd),
    ] {
        if let Some(rest) = s.strip_suffix(suffix) {
            return (rest, Some(parity));
        }
    }
    (s, None)
}

/// Expand a problem list like `1,4,5a-d,7,8-14 evens,25-31 odds,23a-23c`.
///
/// Entries are comma-separated. Each is a single problem or one range; a
/// numeric range may be restricted to odds or evens, and a part range
/// (`5a-d` or `5a-5d`) walks the letters of one problem.
pub fn expand_problem_list(list: &str) -> Result<Vec<ProblemNumber>, ProblemListError> {
    let mut problems = Vec::new();

    for entry in list.split(',') {
        let entry: String = entry
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if entry.is_empty() {
            continue;
        }

        let (range, parity) = split_parity(&entry);
        let bounds: Vec<&str> = range.split('-').collect();
        match bounds.as_slice() {
            [single] if parity.is_none() => problems.push(single.parse()?),
            [_] => return Err(ProblemListError::InvalidNumber(entry.clone())),
            [start, end] => {
                let start: ProblemNumber = start.parse()?;
                match start.part {
                    Some(first) => {
                        if parity.is_some() {
                            return Err(ProblemListError::PartsWithParity(entry.clone()));
                        }
                        let last = part_range_end(start.number, end, &entry)?;
                        if last < first {
                            return Err(ProblemListError::Reversed(entry.clone()));
                        }
                        problems.extend(
                            (first..=last).map(|part| ProblemNumber::with_part(start.number, part)),
                        );
                    }
                    None => {
                        let last: u32 = end
                            .parse()
                            .map_err(|_| ProblemListError::InvalidNumber(entry.clone()))?;
                        if last < start.number {
                            return Err(ProblemListError::Reversed(entry.clone()));
                        }
                        problems.extend(
                            (start.number..=last)
                                .filter(|n| parity.map_or(true, |p| p.accepts(*n)))
                                .map(ProblemNumber::new),
                        );
                    }
                }
            }
            _ => return Err(ProblemListError::MultipleRanges(entry.clone())),
        }
    }

    Ok(problems)
}

/// The last letter of a part range: `d` in `5a-d`, or `d` in `5a-5d`.
fn part_range_end(number: u32, end: &str, entry: &str) -> Result<char, ProblemListError> {
    let invalid = || ProblemListError::InvalidNumber(entry.to_string());
    let mut chars = end.chars();
    if let (Some(letter), None) = (chars.next(), chars.next()) {
        if letter.is_ascii_alphabetic() {
            return Ok(letter);
        }
    }
    let end: ProblemNumber = end.parse()?;
    match end.part {
        Some(letter) if end.number == number => Ok(letter),
        _ => Err(invalid()),
    }
}

/// Reorder the lines of a numbered file by problem number.
///
/// Blank lines are dropped. Lines without a readable number keep their
/// relative order after the numbered ones.
pub fn sort_lines(text: &str) -> String {
    let mut lines: Vec<(Option<ProblemNumber>, &str)> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| (ProblemNumber::from_line(line), line))
        .collect();
    lines.sort_by_key(|(number, _)| (number.is_none(), *number));

    let mut out: String = lines
        .iter()
        .map(|(_, line)| *line)
        .collect::<Vec<_>>()
        .join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// A blank student response file: one `N. ` line per problem.
pub fn response_template<'a, I, T>(numbers: I) -> String
where
    I: IntoIterator<Item = &'a T>,
    T: fmt::Display + 'a,
{
    numbers
        .into_iter()
        .map(|number| format!("{number}. \n"))
        .collect()
}
