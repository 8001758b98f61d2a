//! An interpreter for a tiny esoteric language written entirely in brackets.
//!
//! Programs are strings over `()[]<>{}`; data is three stacks of `i64`. An
//! *empty* bracket pair is one opcode, a *non-empty* pair is another applied
//! to whatever accumulated inside it:
//!
//! | pair | empty                           | non-empty                                      |
//! |------|---------------------------------|------------------------------------------------|
//! | `()` | add 1 to the accumulator        | push the accumulated value to the active stack |
//! | `[]` | add the active stack's height   | subtract the accumulated value                 |
//! | `<>` | swap the active/inactive stacks | discard the accumulated value                  |
//! | `{}` | pop the active stack            | loop while the active stack's top is non-zero  |
//!
//! Whitespace and any other character are ignored.
//!
//! Quick start:
//!
//! ```
//! // Accumulate 1 inside `()`, push it with the enclosing `(...)`.
//! let out = brackets::execute(&[], "(())").expect("balanced program");
//! assert_eq!(out, vec![1]);
//! ```
//!
//! [`lex`] and [`execute`] are the two core entry points. [`Machine`] gives
//! finer control over a single run, including step budgets and cooperative
//! cancellation for programs that legitimately never terminate. Hosts that
//! accept program text from a user should run [`balance::check`] first and
//! re-prompt on failure; the lexer itself only rejects `{`/`}` imbalance.

pub mod balance;
mod lexer;
mod machine;
mod stack;
mod token;

pub use lexer::{LexError, lex};
pub use machine::{Machine, MachineError, StepControl};
pub use stack::Stack;
pub use token::Token;

/// Errors from the composed [`execute_with_control`] entry point.
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Machine(#[from] MachineError),
}

/// Lex `source` and run it against a copy of `initial`.
///
/// The caller keeps ownership of `initial` (repeated runs against edited
/// state are the normal usage pattern); the returned sequence is the final
/// active stack, bottom-to-top. Does not return for diverging programs;
/// see [`execute_with_control`].
pub fn execute(initial: &[i64], source: &str) -> Result<Vec<i64>, LexError> {
    Ok(Machine::new(lex(source)?, initial).run())
}

/// Like [`execute`], bounded by a step budget and/or cancellation flag.
pub fn execute_with_control(
    initial: &[i64],
    source: &str,
    control: StepControl,
) -> Result<Vec<i64>, ExecuteError> {
    Ok(Machine::new(lex(source)?, initial).run_with_control(control)?)
}
