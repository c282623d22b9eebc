// Solvers are organized by area
pub mod algebra;
pub mod calculus;
pub mod polynomial;
pub mod triangle;
