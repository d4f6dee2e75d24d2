//! Statement parsing: raw text lines into a typed intermediate representation.
//!
//! Two statement shapes are recognized. An algebraic definition carries an
//! equality sign (`"hhsize = nchild + nadult"`); a dependency statement uses
//! one of a fixed set of connector phrases (`"ntrips depends on hhsize,
//! income"`). Anything else is silently dropped, which keeps the parser
//! permissive: stray prose in the input costs nothing.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// The fixed connector phrases that introduce a dependency statement.
    static ref CONNECTOR_RE: Regex = Regex::new(
        "(?i)depends on|is affected by|is influenced by|is determined by|depends upon"
    )
    .expect("valid connector pattern");

    /// Separators for an algebraic right-hand side. Minus is a separator here
    /// so that `"a + b - c"` still yields the component names.
    static ref ALGEBRAIC_SEPARATOR_RE: Regex =
        Regex::new(r"(?i),|\band\b|&|\+|-").expect("valid separator pattern");

    /// Separators for a dependency right-hand side. Minus is intentionally
    /// absent: hyphenated variable names like `log-income` stay whole.
    static ref DEPENDENCY_SEPARATOR_RE: Regex =
        Regex::new(r"(?i),|\band\b|&|\+").expect("valid separator pattern");
}

/// Distinguishes the two recognized statement shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementKind {
    /// An equality line defining a name in terms of component variables.
    Algebraic,
    /// A connector-phrase line naming the regressors of a dependent variable.
    Dependency,
}

/// One parsed input line. Immutable once produced; reparsing the input
/// replaces the whole sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// The name on the left of the equality or connector phrase.
    pub dependent: String,
    /// Right-hand-side variable names in appearance order. Duplicates are
    /// kept; downstream coefficient assignment deduplicates on first
    /// occurrence.
    pub variables: Vec<String>,
    /// Whether this line was an algebraic definition or a dependency.
    pub kind: StatementKind,
    /// The trimmed right-hand side exactly as typed, present only for
    /// algebraic statements. Substituted equations insert it verbatim.
    pub raw_rhs: Option<String>,
}

impl Statement {
    /// Returns true for algebraic definitions.
    pub fn is_algebraic(&self) -> bool {
        self.kind == StatementKind::Algebraic
    }

    /// Returns true for dependency statements.
    pub fn is_dependency(&self) -> bool {
        self.kind == StatementKind::Dependency
    }
}

/// Parses raw input lines into an ordered statement sequence.
///
/// Blank lines and lines matching neither statement shape are dropped without
/// error. The output order follows the input order, and reparsing identical
/// input yields an identical sequence.
pub fn parse_statements<S: AsRef<str>>(lines: &[S]) -> Vec<Statement> {
    let mut out = Vec::new();
    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        if let Some(statement) = parse_line(line) {
            out.push(statement);
        }
    }
    debug!("parsed {} statements from {} lines", out.len(), lines.len());
    out
}

fn parse_line(line: &str) -> Option<Statement> {
    if line.contains('=') {
        return parse_algebraic(line);
    }
    if let Some(found) = CONNECTOR_RE.find(line) {
        return Some(parse_dependency(line, found.start(), found.end()));
    }
    None
}

/// Splits at the first `=`; both sides must be non-empty after trimming.
fn parse_algebraic(line: &str) -> Option<Statement> {
    let (lhs, rhs) = line.split_once('=')?;
    let dependent = lhs.trim();
    let raw_rhs = rhs.trim();
    if dependent.is_empty() || raw_rhs.is_empty() {
        return None;
    }
    Some(Statement {
        dependent: dependent.to_string(),
        variables: tokenize(raw_rhs, &ALGEBRAIC_SEPARATOR_RE),
        kind: StatementKind::Algebraic,
        raw_rhs: Some(raw_rhs.to_string()),
    })
}

/// Splits at the first connector-phrase match. An empty left side defaults
/// the dependent name to `"Y"`.
fn parse_dependency(line: &str, phrase_start: usize, phrase_end: usize) -> Statement {
    let lhs = line[..phrase_start].trim();
    let rhs = &line[phrase_end..];
    let dependent = if lhs.is_empty() { "Y" } else { lhs };
    Statement {
        dependent: dependent.to_string(),
        variables: tokenize(rhs, &DEPENDENCY_SEPARATOR_RE),
        kind: StatementKind::Dependency,
        raw_rhs: None,
    }
}

/// Splits `text` on the given separator pattern, trimming tokens and dropping
/// empty ones.
fn tokenize(text: &str, separators: &Regex) -> Vec<String> {
    separators
        .split(text)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
