/// One executable step of a bracket program.
///
/// Tokens are produced once by [`lex`](crate::lex) and are immutable
/// afterwards. The sequence order is the execution order, except where the
/// loop pair redirects control: `LoopOpen` and `LoopEnd` each carry the
/// other's index in the token sequence, resolved while lexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Add 1 to the accumulator top. Collapsed from an empty `()` pair.
    One,
    /// Add the active stack's height to the accumulator top. Collapsed from
    /// an empty `[]` pair.
    Height,
    /// Pop the active stack into the accumulator top (no-op when the active
    /// stack is empty). Collapsed from an empty `{}` pair.
    Pop,
    /// Swap the active and inactive stacks. Collapsed from an empty `<>` pair.
    Toggle,
    /// Open a nested accumulation scope: push a fresh 0 onto the accumulator.
    /// Emitted for `(`, `[` and `<` alike; the matching closer decides what
    /// happens to the accumulated value.
    Open,
    /// Close a non-empty `(...)`: pop the accumulator, add the value into the
    /// enclosing scope, and push it onto the active stack.
    Push,
    /// Close a non-empty `[...]`: pop the accumulator and subtract the value
    /// from the enclosing scope.
    Negate,
    /// Close a non-empty `<...>`: pop the accumulator and discard the value.
    Drop,
    /// `{` with a non-empty body. Skips to its `LoopEnd` when the active
    /// stack is empty or its top is 0.
    LoopOpen { target: usize },
    /// `}` closing a non-empty body. Jumps back to its `LoopOpen` when the
    /// active stack's top is non-zero.
    LoopEnd { target: usize },
}
