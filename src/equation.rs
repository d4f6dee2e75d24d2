//! Coefficient assignment, equation rendering, and marginal-effect
//! derivation.
//!
//! Coefficient symbols attach to the ORIGINAL terms of a dependency
//! statement. Substitution and distribution then rewrite those terms without
//! ever renumbering, which is what makes a marginal impact come out as a sum
//! of the original symbols (e.g. `β1 + β2`) when two algebraic definitions
//! share a base variable.

use std::collections::HashMap;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::definitions::DefinitionTable;
use crate::error::{Result, SpecError};
use crate::interactions::{InteractionCandidate, InteractionOptions, SelectionState};
use crate::statement::Statement;

/// Marker separating the two variables of an interaction term. Distributed
/// terms containing it are excluded from marginal-effect aggregation.
const INTERACTION_MARKER: char = '*';

/// The three equivalent renderings of one dependent's equation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquationSet {
    /// Terms exactly as the user stated them.
    pub original: String,
    /// Defined terms replaced by their verbatim right-hand sides, one level
    /// deep.
    pub substituted: String,
    /// Defined terms distributed across their components, each component
    /// keeping the original term's symbol.
    pub distributed: String,
}

/// One coefficient-legend entry: which symbol was assigned to which term.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoefficientEntry {
    /// The original variable name or interaction term string.
    pub term: String,
    /// The assigned symbol, e.g. `"β2"`.
    pub symbol: String,
}

/// A base variable's combined influence on the dependent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginalEffect {
    /// The base variable.
    pub variable: String,
    /// Summed coefficient symbols, e.g. `"β1 + β2"`.
    pub expression: String,
    /// Ready-to-render interpretive sentence.
    pub interpretation: String,
}

/// Everything derived for one dependency statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentResult {
    /// The dependent variable's name.
    pub dependent: String,
    /// The three renderings, absent when a notice is set instead.
    pub equations: Option<EquationSet>,
    /// Per-statement notice (e.g. no variables detected). Never fatal:
    /// sibling statements still produce results.
    pub notice: Option<String>,
    /// Symbol legend in assignment order, main effects then interactions.
    pub coefficients: Vec<CoefficientEntry>,
    /// The model's regressors: distinct original variables, then selected
    /// interaction terms.
    pub factors: Vec<String>,
    /// Combined marginal effects per base variable, first-seen order.
    pub marginal_effects: Vec<MarginalEffect>,
}

/// An algebraic definition echoed back for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryDefinition {
    /// The defined name.
    pub name: String,
    /// Verbatim right-hand side.
    pub raw_rhs: String,
}

/// The full outcome of one interpretation pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretReport {
    /// Algebraic statements in input order, for an "auxiliary" display block.
    pub auxiliary: Vec<AuxiliaryDefinition>,
    /// One result per dependency statement, in input order.
    pub results: Vec<DependentResult>,
}

/// One `symbol(variable)` term of the distributed equation.
struct DistributedTerm {
    variable: String,
    symbol: String,
}

/// Renders the `n`-th coefficient symbol.
fn symbol(index: usize) -> String {
    format!("β{index}")
}

/// Builds the full report for a set of parsed statements.
///
/// Each dependency statement is processed independently; the only inputs it
/// shares with its siblings are the definition table and the selection state.
/// An empty statement sequence is the one whole-input failure,
/// [`SpecError::EmptyInput`].
pub fn interpret(
    statements: &[Statement],
    definitions: &DefinitionTable,
    options: &InteractionOptions,
    selection: &SelectionState,
) -> Result<InterpretReport> {
    if statements.is_empty() {
        return Err(SpecError::EmptyInput);
    }

    let auxiliary = statements
        .iter()
        .filter(|s| s.is_algebraic())
        .map(|s| AuxiliaryDefinition {
            name: s.dependent.clone(),
            raw_rhs: s.raw_rhs.clone().unwrap_or_default(),
        })
        .collect();

    let results: Vec<DependentResult> = statements
        .iter()
        .filter(|s| s.is_dependency())
        .map(|s| build_dependent_result(s, definitions, options, selection))
        .collect();

    debug!(
        "interpreted {} dependency statements ({} auxiliary definitions)",
        results.len(),
        statements.len() - results.len()
    );

    Ok(InterpretReport { auxiliary, results })
}

fn build_dependent_result(
    statement: &Statement,
    definitions: &DefinitionTable,
    options: &InteractionOptions,
    selection: &SelectionState,
) -> DependentResult {
    let dependent = &statement.dependent;
    if statement.variables.is_empty() {
        return DependentResult {
            dependent: dependent.clone(),
            equations: None,
            notice: Some(format!("no variables detected for `{dependent}`")),
            coefficients: Vec::new(),
            factors: Vec::new(),
            marginal_effects: Vec::new(),
        };
    }

    // 1) Assign symbols to the original terms, first occurrence only.
    let mut main_symbols: HashMap<&str, String> = HashMap::new();
    let mut coefficients = Vec::new();
    let mut counter = 1usize;
    for variable in &statement.variables {
        if !main_symbols.contains_key(variable.as_str()) {
            let sym = symbol(counter);
            trace!("{dependent}: {sym} <- {variable}");
            main_symbols.insert(variable, sym.clone());
            coefficients.push(CoefficientEntry {
                term: variable.clone(),
                symbol: sym,
            });
            counter += 1;
        }
    }

    // 2) Continue the counter across the selected interactions.
    let selected: Vec<&InteractionCandidate> = options
        .get(dependent)
        .map(|candidates| {
            candidates
                .iter()
                .filter(|c| selection.is_selected(dependent, &c.id))
                .collect()
        })
        .unwrap_or_default();
    let mut interaction_symbols = Vec::with_capacity(selected.len());
    for candidate in &selected {
        let sym = symbol(counter);
        trace!("{dependent}: {sym} <- {}", candidate.term);
        coefficients.push(CoefficientEntry {
            term: candidate.term.clone(),
            symbol: sym.clone(),
        });
        interaction_symbols.push(sym);
        counter += 1;
    }

    // 3) Original rendering: terms exactly as stated. Repeated variables
    //    re-render with their shared symbol.
    let mut original = format!("{dependent} = β0");
    for variable in &statement.variables {
        let sym = &main_symbols[variable.as_str()];
        original.push_str(&format!(" + {sym}({variable})"));
    }

    // 4) Substituted rendering: one level deep, raw text verbatim.
    let mut substituted = format!("{dependent} = β0");
    for variable in &statement.variables {
        let sym = &main_symbols[variable.as_str()];
        match definitions.get(variable) {
            Some(definition) => {
                substituted.push_str(&format!(" + {sym}({})", definition.raw_rhs))
            }
            None => substituted.push_str(&format!(" + {sym}({variable})")),
        }
    }

    // 5) Distribute each original term's symbol across its components.
    let mut distributed_terms = Vec::new();
    for variable in &statement.variables {
        let sym = &main_symbols[variable.as_str()];
        match definitions.get(variable) {
            Some(definition) => {
                for component in &definition.variables {
                    distributed_terms.push(DistributedTerm {
                        variable: component.clone(),
                        symbol: sym.clone(),
                    });
                }
            }
            None => distributed_terms.push(DistributedTerm {
                variable: variable.clone(),
                symbol: sym.clone(),
            }),
        }
    }
    for (candidate, sym) in selected.iter().zip(&interaction_symbols) {
        original.push_str(&format!(" + {sym}({})", candidate.term));
        substituted.push_str(&format!(" + {sym}({})", candidate.term));
        distributed_terms.push(DistributedTerm {
            variable: candidate.term.clone(),
            symbol: sym.clone(),
        });
    }

    let mut distributed = format!("{dependent} = β0");
    for term in &distributed_terms {
        distributed.push_str(&format!(" + {}({})", term.symbol, term.variable));
    }

    let marginal_effects = marginal_effects(&distributed_terms, dependent);

    let mut factors: Vec<String> = coefficients
        .iter()
        .take(coefficients.len() - selected.len())
        .map(|entry| entry.term.clone())
        .collect();
    factors.extend(selected.iter().map(|c| c.term.clone()));

    DependentResult {
        dependent: dependent.clone(),
        equations: Some(EquationSet {
            original,
            substituted,
            distributed,
        }),
        notice: None,
        coefficients,
        factors,
        marginal_effects,
    }
}

/// Groups distributed terms by base variable and sums their symbols.
///
/// Interaction terms are skipped: a composite `a*b` regressor has no single
/// marginal impact to report. Symbols are deduplicated per variable in
/// first-seen order, so a variable reached twice through the same definition
/// reports its symbol once.
fn marginal_effects(terms: &[DistributedTerm], dependent: &str) -> Vec<MarginalEffect> {
    let mut order: Vec<&str> = Vec::new();
    let mut symbols_by_variable: HashMap<&str, Vec<&str>> = HashMap::new();
    for term in terms {
        if term.variable.contains(INTERACTION_MARKER) {
            continue;
        }
        let symbols = symbols_by_variable
            .entry(term.variable.as_str())
            .or_insert_with(|| {
                order.push(term.variable.as_str());
                Vec::new()
            });
        if !symbols.contains(&term.symbol.as_str()) {
            symbols.push(term.symbol.as_str());
        }
    }

    order
        .iter()
        .map(|variable| {
            let expression = symbols_by_variable[variable].join(" + ");
            let interpretation = format!(
                "{expression} is the marginal impact of {variable} on {dependent}, ceteris paribus."
            );
            MarginalEffect {
                variable: variable.to_string(),
                expression,
                interpretation,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::build_definitions;
    use crate::interactions::build_interaction_options;
    use crate::statement::parse_statements;

    fn report(lines: &[&str], selection: &SelectionState) -> InterpretReport {
        let parsed = parse_statements(lines);
        let defs = build_definitions(&parsed);
        let options = build_interaction_options(&parsed, &defs).unwrap();
        interpret(&parsed, &defs, &options, selection).unwrap()
    }

    #[test]
    fn base_only_renderings_are_identical() {
        let out = report(&["Y depends on A, B and C"], &SelectionState::new());
        let equations = out.results[0].equations.as_ref().unwrap();
        let expected = "Y = β0 + β1(A) + β2(B) + β3(C)";
        assert_eq!(equations.original, expected);
        assert_eq!(equations.substituted, expected);
        assert_eq!(equations.distributed, expected);
    }

    #[test]
    fn substitution_inserts_raw_text_and_distribution_shares_symbols() {
        let out = report(&["K = A + B", "Y depends on K, C"], &SelectionState::new());
        let result = &out.results[0];
        let equations = result.equations.as_ref().unwrap();
        assert_eq!(equations.original, "Y = β0 + β1(K) + β2(C)");
        assert_eq!(equations.substituted, "Y = β0 + β1(A + B) + β2(C)");
        assert_eq!(equations.distributed, "Y = β0 + β1(A) + β1(B) + β2(C)");

        let by_variable: Vec<(&str, &str)> = result
            .marginal_effects
            .iter()
            .map(|m| (m.variable.as_str(), m.expression.as_str()))
            .collect();
        assert_eq!(by_variable, vec![("A", "β1"), ("B", "β1"), ("C", "β2")]);
    }

    #[test]
    fn shared_base_variable_sums_coefficients_without_duplicates() {
        let out = report(
            &["K = A + B", "M = A + D", "Y depends on K, M"],
            &SelectionState::new(),
        );
        let effects = &out.results[0].marginal_effects;
        assert_eq!(effects[0].variable, "A");
        assert_eq!(effects[0].expression, "β1 + β2");
        assert_eq!(effects[1].expression, "β1");
        assert_eq!(effects[2].variable, "D");
        assert_eq!(effects[2].expression, "β2");
    }

    #[test]
    fn substitution_is_one_level_only() {
        let out = report(
            &["K = M + A", "M = B + C", "Y depends on K"],
            &SelectionState::new(),
        );
        let equations = out.results[0].equations.as_ref().unwrap();
        // The substituted rendering inserts K's raw text; M stays unexpanded.
        assert_eq!(equations.substituted, "Y = β0 + β1(M + A)");
        // Distribution likewise uses K's direct components only.
        assert_eq!(equations.distributed, "Y = β0 + β1(M) + β1(A)");
    }

    #[test]
    fn repeated_variable_reuses_its_symbol() {
        let out = report(&["Y depends on A, B, A"], &SelectionState::new());
        let equations = out.results[0].equations.as_ref().unwrap();
        assert_eq!(equations.original, "Y = β0 + β1(A) + β2(B) + β1(A)");
        assert_eq!(out.results[0].marginal_effects[0].expression, "β1");
    }

    #[test]
    fn selected_interactions_extend_the_numbering() {
        let mut selection = SelectionState::new();
        selection.toggle("Y", "Y::A*B", true);
        let out = report(&["Y depends on A, B"], &selection);
        let result = &out.results[0];
        let equations = result.equations.as_ref().unwrap();
        assert_eq!(equations.original, "Y = β0 + β1(A) + β2(B) + β3(A*B)");
        assert_eq!(equations.distributed, "Y = β0 + β1(A) + β2(B) + β3(A*B)");

        // The composite term contributes no marginal effect of its own.
        let variables: Vec<&str> = result
            .marginal_effects
            .iter()
            .map(|m| m.variable.as_str())
            .collect();
        assert_eq!(variables, vec!["A", "B"]);

        assert_eq!(result.factors, vec!["A", "B", "A*B"]);
        let legend: Vec<(&str, &str)> = result
            .coefficients
            .iter()
            .map(|c| (c.term.as_str(), c.symbol.as_str()))
            .collect();
        assert_eq!(legend, vec![("A", "β1"), ("B", "β2"), ("A*B", "β3")]);
    }

    #[test]
    fn interpretive_sentence_matches_template() {
        let out = report(&["K = A + B", "Y depends on K"], &SelectionState::new());
        let effect = &out.results[0].marginal_effects[0];
        assert_eq!(
            effect.interpretation,
            "β1 is the marginal impact of A on Y, ceteris paribus."
        );
    }

    #[test]
    fn dependency_without_variables_yields_notice_not_failure() {
        let out = report(
            &["Y depends on ", "Z depends on A"],
            &SelectionState::new(),
        );
        assert_eq!(out.results.len(), 2);
        let first = &out.results[0];
        assert!(first.equations.is_none());
        assert!(first.notice.as_deref().unwrap().contains("no variables"));
        assert!(out.results[1].equations.is_some());
    }

    #[test]
    fn empty_statement_sequence_is_empty_input() {
        let err = interpret(
            &[],
            &DefinitionTable::new(),
            &InteractionOptions::new(),
            &SelectionState::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SpecError::EmptyInput));
    }

    #[test]
    fn auxiliary_definitions_are_echoed_in_order() {
        let out = report(
            &["K = A + B", "M = C + D", "Y depends on K"],
            &SelectionState::new(),
        );
        let names: Vec<&str> = out.auxiliary.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["K", "M"]);
        assert_eq!(out.auxiliary[0].raw_rhs, "A + B");
    }
}
