//! An owned interpretation session: raw input lines, user selections, and
//! the cached products of the last interpretation pass.
//!
//! Everything a presentation layer needs lives here, so there is no ambient
//! state: each user action maps to one method call, and each call either
//! edits state or recomputes from it. Selection mutations deliberately do NOT
//! rebuild equations; recomputation happens only on [`Session::interpret`],
//! keeping every checkbox-style mutation O(1).

use log::debug;

use crate::definitions::{build_definitions, DefinitionTable};
use crate::equation::{interpret, InterpretReport};
use crate::error::Result;
use crate::interactions::{
    build_interaction_options, InteractionCandidate, InteractionOptions, SelectionState,
};
use crate::statement::{parse_statements, Statement};

/// Holds one user's statements and selections across interpretation passes.
#[derive(Clone, Debug, Default)]
pub struct Session {
    lines: Vec<String>,
    parsed: Vec<Statement>,
    definitions: DefinitionTable,
    options: InteractionOptions,
    selection: SelectionState,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one raw input line.
    pub fn push_line<S: Into<String>>(&mut self, line: S) {
        self.lines.push(line.into());
    }

    /// Overwrites the line at `index`, growing the line list with blanks if
    /// needed (blank lines parse to nothing, so the growth is harmless).
    pub fn set_line<S: Into<String>>(&mut self, index: usize, line: S) {
        if index >= self.lines.len() {
            self.lines.resize(index + 1, String::new());
        }
        self.lines[index] = line.into();
    }

    /// The current raw input lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Statements from the most recent [`interpret`](Session::interpret) call.
    pub fn statements(&self) -> &[Statement] {
        &self.parsed
    }

    /// Interaction candidates from the most recent interpretation, for
    /// rendering selection checkboxes.
    pub fn interaction_options(&self) -> &InteractionOptions {
        &self.options
    }

    /// Candidates for one dependent, empty if it has none yet.
    pub fn candidates_for(&self, dependent: &str) -> &[InteractionCandidate] {
        self.options
            .get(dependent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether a candidate is currently selected.
    pub fn is_selected(&self, dependent: &str, candidate_id: &str) -> bool {
        self.selection.is_selected(dependent, candidate_id)
    }

    /// Adds or removes one interaction selection. Does not recompute
    /// equations; call [`interpret`](Session::interpret) to refresh output.
    pub fn toggle(&mut self, dependent: &str, candidate_id: &str, included: bool) {
        self.selection.toggle(dependent, candidate_id, included);
    }

    /// Selects or deselects every candidate of `dependent` from the most
    /// recent interpretation. Like [`toggle`](Session::toggle), output stays
    /// stale until the next interpretation.
    pub fn select_all(&mut self, dependent: &str, included: bool) {
        let ids: Vec<String> = self
            .candidates_for(dependent)
            .iter()
            .map(|c| c.id.clone())
            .collect();
        self.selection.select_all(dependent, &ids, included);
    }

    /// Reparses the input, rebuilds definitions and interaction candidates,
    /// and produces every dependent's result.
    ///
    /// Selections survive across passes; ids whose candidates disappeared
    /// after an edit are ignored rather than pruned.
    pub fn interpret(&mut self) -> Result<InterpretReport> {
        self.parsed = parse_statements(&self.lines);
        self.definitions = build_definitions(&self.parsed);
        self.options = build_interaction_options(&self.parsed, &self.definitions)?;
        debug!(
            "interpreting session: {} lines, {} statements",
            self.lines.len(),
            self.parsed.len()
        );
        interpret(&self.parsed, &self.definitions, &self.options, &self.selection)
    }

    /// Resets lines, selections, and all cached state to initial.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.parsed.clear();
        self.definitions.clear();
        self.options.clear();
        self.selection.clear();
    }
}
