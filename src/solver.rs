/*!
An adapter for an external `minisat`-compatible solver.

The shrinker itself never solves anything: the reduction engine only propagates, and the oracle is free to decide acceptance however it likes.
This adapter exists for test functions which *do* want satisfiability --- e.g. "still unsatisfiable" oracles --- and for the library's own solver-level tests.

The protocol is the MiniSAT one: the formula is written to a temporary DIMACS file, the solver exits with status 10 for satisfiable and 20 for unsatisfiable, and, when asked, writes a model as a `SAT` line followed by a ` 0`-terminated assignment.
*/

use std::process::{Command, Stdio};

use crate::{
    dimacs::clauses_to_dimacs,
    structures::{CClause, CLiteral},
    types::err::SolverError,
};

/// The exit status a MiniSAT-compatible solver signals satisfiability with.
const STATUS_SATISFIABLE: i32 = 10;

/// The exit status a MiniSAT-compatible solver signals unsatisfiability with.
const STATUS_UNSATISFIABLE: i32 = 20;

/// Whether the clauses are satisfiable, according to `solver`.
///
/// The empty formula is satisfiable and a formula containing an empty clause is not, without consulting the solver.
pub fn is_satisfiable(solver: &str, clauses: &[CClause]) -> Result<bool, SolverError> {
    if clauses.is_empty() {
        return Ok(true);
    }
    if clauses.iter().any(|clause| clause.is_empty()) {
        return Ok(false);
    }

    let formula = TempPath::new("cnf")?;
    std::fs::write(&formula.path, clauses_to_dimacs(clauses)).map_err(|_| SolverError::Unavailable)?;

    let status = Command::new(solver)
        .arg(&formula.path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|_| SolverError::Unavailable)?;

    match status.code() {
        Some(STATUS_SATISFIABLE) => Ok(true),
        Some(STATUS_UNSATISFIABLE) => Ok(false),
        code => Err(SolverError::UnexpectedStatus(code)),
    }
}

/// A satisfying assignment for the clauses, as a list of literals, or `None` when unsatisfiable.
///
/// The empty formula is satisfied by the empty assignment and a formula containing an empty clause by nothing.
pub fn find_solution(solver: &str, clauses: &[CClause]) -> Result<Option<Vec<CLiteral>>, SolverError> {
    if clauses.is_empty() {
        return Ok(Some(Vec::new()));
    }
    if clauses.iter().any(|clause| clause.is_empty()) {
        return Ok(None);
    }

    let formula = TempPath::new("cnf")?;
    let model = TempPath::new("out")?;
    std::fs::write(&formula.path, clauses_to_dimacs(clauses)).map_err(|_| SolverError::Unavailable)?;

    let status = Command::new(solver)
        .arg(&formula.path)
        .arg(&model.path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|_| SolverError::Unavailable)?;

    match status.code() {
        Some(STATUS_UNSATISFIABLE) => Ok(None),
        Some(STATUS_SATISFIABLE) => {
            let contents = std::fs::read_to_string(&model.path)
                .map_err(|_| SolverError::CorruptSolution)?;
            parse_solution(&contents).map(Some)
        }
        code => Err(SolverError::UnexpectedStatus(code)),
    }
}

/// Read a model file: a `SAT` line, then the assignment terminated by `0`.
fn parse_solution(contents: &str) -> Result<Vec<CLiteral>, SolverError> {
    let mut lines = contents.lines();
    match lines.next() {
        Some("SAT") => {}
        _ => return Err(SolverError::CorruptSolution),
    }
    let assignment = lines.next().ok_or(SolverError::CorruptSolution)?;

    let mut literals = Vec::new();
    for item in assignment.split_whitespace() {
        match item.parse::<CLiteral>() {
            Ok(literal) => literals.push(literal),
            Err(_) => return Err(SolverError::CorruptSolution),
        }
    }
    match literals.pop() {
        Some(0) => Ok(literals),
        _ => Err(SolverError::CorruptSolution),
    }
}

/// A file path removed from the filesystem on drop.
struct TempPath {
    path: std::path::PathBuf,
}

impl TempPath {
    fn new(suffix: &str) -> Result<Self, SolverError> {
        use std::time::{SystemTime, UNIX_EPOCH};

        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| SolverError::Unavailable)?
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "sat_shrink.{}.{stamp}.{suffix}",
            std::process::id()
        ));
        Ok(TempPath { path })
    }
}

impl Drop for TempPath {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
