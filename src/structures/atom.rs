/*!
(The internal representation of) an atom (aka. a 'variable').

Each atom is a u32 whose value is the variable number of some DIMACS representation.
`0` is never an atom --- in DIMACS the zero terminates a clause, and here a zero would collapse the distinction between a literal and its negation.

# Notes
- In the SAT literature these are often called 'variables' while in the logic literature these are often called 'atoms'.
*/

/// An atom, aka. a 'variable'.
pub type Atom = u32;

/// The maximum instance of an atom, fixed so every atom has both a positive and a negative [literal](crate::structures::literal).
pub const ATOM_MAX: Atom = i32::MAX.unsigned_abs();
