//! The Symbolic IR (C1): a closed, tagged family of value and statement
//! nodes plus the function/program containers that hold them.
//!
//! Ownership is deliberately non-cyclic: a [`Stmt::Call`] refers to its
//! callee by qualified name rather than holding a reference, so mutually
//! recursive functions never require `Rc`/`Weak` bookkeeping. Callers
//! resolve a call's callee by looking it up in the enclosing
//! [`SymbolicProgram::functions`] map.

mod function;
mod program;
mod stmt;
mod value;

pub use function::{LocalVariable, Parameter, SymbolicFunction};
pub use program::SymbolicProgram;
pub use stmt::{Statement, Stmt};
pub use value::{CompareOp, LocalRef, SymbolicType, Value};
