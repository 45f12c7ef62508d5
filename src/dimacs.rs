/*!
Reading and writing formulas in (simplified) DIMACS CNF form.

A DIMACS CNF file is a preamble line `p cnf <variables> <clauses>`, any number of comment lines opening with `c`, and one line per clause: the literals of the clause as space-separated integers, terminated by `0`.

Parsing here is deliberately lenient: the preamble is not required and its counts are not checked, as a shrink is expected to be pointed at whatever file reproduces the behaviour of interest.
*/

use crate::{
    structures::{CClause, Clause, Cnf, Literal},
    types::err::ParseError,
};

/// Parse a string in DIMACS CNF form to a list of clauses.
///
/// Comment and preamble lines are skipped, as are blank lines.
/// Every clause line must close with the terminating zero.
pub fn dimacs_to_clauses(contents: &str) -> Result<Cnf, ParseError> {
    let mut clauses = Cnf::new();

    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('c') || line.starts_with('p') {
            continue;
        }

        let mut clause = CClause::new();
        for item in line.split_whitespace() {
            match item.parse::<i32>() {
                Ok(literal) => clause.push(literal),
                Err(_) => return Err(ParseError::Literal(index + 1)),
            }
        }
        match clause.pop() {
            Some(0) => clauses.push(clause),
            _ => return Err(ParseError::UnterminatedClause(index + 1)),
        }
    }

    Ok(clauses)
}

/// Write a list of clauses in DIMACS CNF form.
///
/// The variable count of the preamble is the maximum atom appearing in some clause, `0` for a formula without literals.
pub fn clauses_to_dimacs(clauses: &[CClause]) -> String {
    let variable_count = clauses
        .iter()
        .flat_map(|clause| clause.literals())
        .map(|literal| literal.atom())
        .max()
        .unwrap_or(0);

    let mut parts = vec![format!("p cnf {variable_count} {}", clauses.len())];
    for clause in clauses {
        parts.push(clause.as_dimacs(true));
    }

    parts.join("\n")
}
