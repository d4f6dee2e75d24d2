//! Symbolic regression specifications from natural-language statements.
//!
//! This crate turns short free-text statements about variable dependencies
//! ("ntrips depends on hhsize, nchild and income") and algebraic definitions
//! ("hhsize = nchild + nadult") into regression-style equations with symbolic
//! coefficients. It offers tools to
//!
//! - parse raw lines into typed statements (`statement` module),
//! - collect and expand algebraic definitions (`definitions` module),
//! - enumerate and select pairwise interaction terms (`interactions` module),
//! - assign β symbols and render equations with marginal effects
//!   (`equation` module), and
//! - drive the whole pipeline from one stateful context (`session` module).
//!
//! Coefficients attach to the terms as originally stated; substituting and
//! distributing algebraic definitions then yields marginal impacts that are
//! sums of the original symbols, e.g. `β1 + β2` for a base variable shared by
//! two definitions. The crate returns plain data throughout, so any
//! presentation layer (form, notebook, terminal) can render the results
//! without the core knowing about it.
//!
//! # Quick start
//!
//! ```
//! use regspec::Session;
//!
//! let mut session = Session::new();
//! session.push_line("hhsize = nchild + nadult");
//! session.push_line("ntrips depends on hhsize and income");
//!
//! let report = session.interpret().expect("valid statements");
//! let result = &report.results[0];
//! let equations = result.equations.as_ref().expect("variables present");
//!
//! assert_eq!(
//!     equations.distributed,
//!     "ntrips = β0 + β1(nchild) + β1(nadult) + β2(income)"
//! );
//! assert_eq!(result.marginal_effects[0].expression, "β1");
//! ```
//!
//! Interaction terms are opt-in: after an interpretation pass the session
//! exposes the pairwise candidates over the expanded base variables, and
//! selected candidates join the equation (with fresh symbols) on the next
//! pass.

pub mod definitions;
pub mod equation;
pub mod error;
pub mod interactions;
pub mod session;
pub mod statement;

pub use definitions::{build_definitions, expand_variables, Definition, DefinitionTable};
pub use equation::{interpret, DependentResult, EquationSet, InterpretReport, MarginalEffect};
pub use error::{Result, SpecError};
pub use interactions::{build_interaction_options, InteractionCandidate, SelectionState};
pub use session::Session;
pub use statement::{parse_statements, Statement, StatementKind};
