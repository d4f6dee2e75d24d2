//! Algebraic definition lookup and recursive expansion to base variables.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpecError};
use crate::statement::Statement;

/// One algebraic definition: the component variables of a defined name plus
/// the right-hand-side text exactly as the user typed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Component variable names in definition order.
    pub variables: Vec<String>,
    /// Verbatim right-hand side, re-inserted by the substituted rendering.
    pub raw_rhs: String,
}

/// Lookup from a defined name to its definition. Rebuilt on every
/// interpretation pass.
pub type DefinitionTable = HashMap<String, Definition>;

/// Collects the algebraic statements into a [`DefinitionTable`].
///
/// When two statements define the same name the later one wins. This is an
/// explicit rule, not an accident: re-defining a name mid-input behaves like
/// editing the earlier line.
pub fn build_definitions(statements: &[Statement]) -> DefinitionTable {
    let mut table = DefinitionTable::new();
    for statement in statements.iter().filter(|s| s.is_algebraic()) {
        let raw_rhs = statement
            .raw_rhs
            .clone()
            .unwrap_or_else(|| statement.variables.join(" + "));
        table.insert(
            statement.dependent.clone(),
            Definition {
                variables: statement.variables.clone(),
                raw_rhs,
            },
        );
    }
    table
}

/// Recursively resolves `variables` to base (undefined) names.
///
/// Left-to-right order is preserved and a base variable may appear several
/// times when reached through different algebraic branches. Re-entering a
/// definition already on the current expansion path fails with
/// [`SpecError::CyclicDefinition`] instead of recursing without bound.
pub fn expand_variables(variables: &[String], definitions: &DefinitionTable) -> Result<Vec<String>> {
    let mut expanded = Vec::new();
    let mut path = HashSet::new();
    expand_into(variables, definitions, &mut path, &mut expanded)?;
    Ok(expanded)
}

fn expand_into(
    variables: &[String],
    definitions: &DefinitionTable,
    path: &mut HashSet<String>,
    out: &mut Vec<String>,
) -> Result<()> {
    for name in variables {
        match definitions.get(name) {
            Some(definition) => {
                if !path.insert(name.clone()) {
                    return Err(SpecError::cyclic(name.clone()));
                }
                expand_into(&definition.variables, definitions, path, out)?;
                // Unwound so sibling branches may reach the same definition.
                path.remove(name);
            }
            None => out.push(name.clone()),
        }
    }
    Ok(())
}
