//! Pairwise interaction-term candidates and the user's selection of them.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::definitions::{expand_variables, DefinitionTable};
use crate::error::Result;
use crate::statement::Statement;

/// A candidate interaction term between two base variables of one dependent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionCandidate {
    /// Stable identifier, `"<dependent>::<a>*<b>"`. Selection state stores
    /// these ids, so they survive re-interpretation unchanged.
    pub id: String,
    /// Display term, `"<a>*<b>"`.
    pub term: String,
    /// First base variable of the pair.
    pub a: String,
    /// Second base variable of the pair.
    pub b: String,
}

/// Candidate lists keyed by dependent name.
pub type InteractionOptions = HashMap<String, Vec<InteractionCandidate>>;

/// Enumerates every unordered pair of expanded base variables per dependency
/// statement.
///
/// The expanded list drives both order and multiplicity: pairs follow the
/// `i < j` index enumeration (outer ascending, then inner), and a base
/// variable reached through two algebraic branches contributes separate,
/// duplicate-looking candidates. When two dependency statements share a
/// dependent the later statement's list wins, matching the definition table's
/// collision rule.
pub fn build_interaction_options(
    statements: &[Statement],
    definitions: &DefinitionTable,
) -> Result<InteractionOptions> {
    let mut options = InteractionOptions::new();
    for statement in statements.iter().filter(|s| s.is_dependency()) {
        let expanded = expand_variables(&statement.variables, definitions)?;
        let mut candidates = Vec::new();
        for i in 0..expanded.len() {
            for j in (i + 1)..expanded.len() {
                let (a, b) = (&expanded[i], &expanded[j]);
                candidates.push(InteractionCandidate {
                    id: format!("{}::{}*{}", statement.dependent, a, b),
                    term: format!("{a}*{b}"),
                    a: a.clone(),
                    b: b.clone(),
                });
            }
        }
        debug!(
            "enumerated {} interaction candidates for `{}`",
            candidates.len(),
            statement.dependent
        );
        options.insert(statement.dependent.clone(), candidates);
    }
    Ok(options)
}

/// Which interaction candidates the user has chosen, per dependent.
///
/// This is the only state that survives re-interpretation: candidate lists
/// and equations are rebuilt from scratch each pass, while selections carry
/// over (ids referring to candidates that no longer exist are simply never
/// matched and thus ignored).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SelectionState {
    selected: HashMap<String, HashSet<String>>,
}

impl SelectionState {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or removes one candidate id for `dependent`. Idempotent.
    pub fn toggle(&mut self, dependent: &str, candidate_id: &str, included: bool) {
        let set = self.selected.entry(dependent.to_string()).or_default();
        if included {
            set.insert(candidate_id.to_string());
        } else {
            set.remove(candidate_id);
        }
    }

    /// Replaces the selection for `dependent` with all of `candidate_ids`
    /// (when `included`) or with the empty set.
    pub fn select_all<S: AsRef<str>>(&mut self, dependent: &str, candidate_ids: &[S], included: bool) {
        let set = self.selected.entry(dependent.to_string()).or_default();
        set.clear();
        if included {
            set.extend(candidate_ids.iter().map(|id| id.as_ref().to_string()));
        }
    }

    /// Whether `candidate_id` is currently selected for `dependent`.
    pub fn is_selected(&self, dependent: &str, candidate_id: &str) -> bool {
        self.selected
            .get(dependent)
            .map(|set| set.contains(candidate_id))
            .unwrap_or(false)
    }

    /// Number of selected candidates for `dependent`.
    pub fn selected_count(&self, dependent: &str) -> usize {
        self.selected.get(dependent).map(HashSet::len).unwrap_or(0)
    }

    /// Drops every selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }
}
