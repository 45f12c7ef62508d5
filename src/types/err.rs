/*!
Error types used in the library.

- Some of these are internally expected --- an [Inconsistency] is raised whenever propagation proves a formula unsatisfiable, and the shrinker swallows these as a matter of course (a candidate formula may legitimately be unsatisfiable).
- Others are external --- e.g. a [ShrinkError] is returned when the initial formula fails the test the shrinker is asked to preserve, as in this case there is nothing to be done.

Names of the error enums --- for the most part --- overlap with corresponding structs.
*/

use crate::structures::{Atom, CLiteral};

/// A union of varied error kinds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Propagation proved a formula unsatisfiable.
    Inconsistency(Inconsistency),

    /// An error related to parsing.
    Parse(ParseError),

    /// An error when setting up or driving a shrink.
    Shrink(ShrinkError),

    /// An error when calling an external solver.
    Solver(SolverError),
}

/// Propagation proved a formula unsatisfiable.
///
/// During reduction these are raised as soon as unsatisfiability is witnessed, and carry the witness.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Inconsistency {
    /// Every literal of some clause was unsatisfied on the forced assignment.
    UnsatisfiedClause,

    /// An attempt to force an atom to both values.
    ForcedConflict(Atom),

    /// An attempt to merge a literal with its own negation.
    MergedNegation(CLiteral),

    /// A strongly connected component whose members carry distinct forced values.
    DivergentComponent,
}

impl From<Inconsistency> for ErrorKind {
    fn from(e: Inconsistency) -> Self {
        ErrorKind::Inconsistency(e)
    }
}

/// Errors during parsing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// A clause line without the required terminating zero.
    UnterminatedClause(usize),

    /// Something other than an integer where a literal was expected.
    Literal(usize),
}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        ErrorKind::Parse(e)
    }
}

/// Errors when setting up or driving a shrink.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShrinkError {
    /// The initial formula does not satisfy the test function.
    InitialRejected,
}

impl From<ShrinkError> for ErrorKind {
    fn from(e: ShrinkError) -> Self {
        ErrorKind::Shrink(e)
    }
}

/// Errors when calling an external solver.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SolverError {
    /// The solver binary could not be run.
    Unavailable,

    /// The solver exited with a status other than 10 (satisfiable) or 20 (unsatisfiable).
    UnexpectedStatus(Option<i32>),

    /// The solution file could not be read back.
    CorruptSolution,
}

impl From<SolverError> for ErrorKind {
    fn from(e: SolverError) -> Self {
        ErrorKind::Solver(e)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ErrorKind::Inconsistency(e) => write!(f, "inconsistency: {e}"),
            ErrorKind::Parse(e) => write!(f, "parse error: {e}"),
            ErrorKind::Shrink(ShrinkError::InitialRejected) => {
                write!(f, "the initial formula does not satisfy the test")
            }
            ErrorKind::Solver(e) => write!(f, "solver error: {e:?}"),
        }
    }
}

impl std::fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Inconsistency::UnsatisfiedClause => write!(f, "a clause with every literal unsatisfied"),
            Inconsistency::ForcedConflict(atom) => {
                write!(f, "attempt to force {atom} to both values")
            }
            Inconsistency::MergedNegation(literal) => {
                write!(f, "attempt to merge {literal} with its negation")
            }
            Inconsistency::DivergentComponent => {
                write!(f, "a component with distinct forced values")
            }
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ParseError::UnterminatedClause(line) => {
                write!(f, "missing terminating zero on line {line}")
            }
            ParseError::Literal(line) => write!(f, "unreadable literal on line {line}"),
        }
    }
}

impl std::error::Error for ErrorKind {}
impl std::error::Error for Inconsistency {}
impl std::error::Error for ParseError {}
