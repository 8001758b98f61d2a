//! Lexer: a single left-to-right scan turning bracket source into tokens.
//!
//! The closer of each pair decides what its opener meant. `(`, `[` and `<`
//! all emit a generic [`Token::Open`] marker; when the matching closer
//! arrives and the marker is still the last token emitted (nothing appeared
//! between them), the marker is rewritten in place to the empty-pair opcode
//! (`One`, `Height` or `Toggle`). Otherwise the closer appends the
//! non-empty-pair opcode (`Push`, `Negate` or `Drop`).
//!
//! Loops never collapse on the opener's side: `{` always emits a
//! [`Token::LoopOpen`] and records its index. At the matching `}`, an empty
//! body rewrites that `LoopOpen` to a single [`Token::Pop`]; a non-empty body
//! appends a [`Token::LoopEnd`] and both jump targets are resolved at once.
//!
//! Whitespace and every non-bracket character are ignored. Flagging them to
//! the user is the balance checker's job (see [`balance`](crate::balance)).

use crate::token::Token;

/// Errors reported while lexing.
///
/// Only `{`/`}` balance is enforced here: an unmatched brace would leave a
/// loop with a corrupt jump target, and detecting it costs nothing in the
/// same scan. Imbalance among `(`/`[`/`<` stays best-effort (a stray closer
/// emits the non-empty-pair opcode, a stray opener leaves a harmless `Open`);
/// full validation lives in [`balance::check`](crate::balance::check).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// A `}` arrived with no pending `{`, or a `{` was never closed.
    #[error("Unbalanced program: '{bracket}' at position {at} has no match")]
    UnbalancedProgram { bracket: char, at: usize },
}

/// Lex `source` into a flat token sequence with resolved jump targets.
///
/// Pure and deterministic: identical input yields identical tokens, resolved
/// targets included. Character positions in errors are char indices, the same
/// unit the balance checker reports.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens: Vec<Token> = Vec::new();
    // Pending `{` entries: (token index, char position for error reporting).
    let mut open_loops: Vec<(usize, usize)> = Vec::new();

    for (at, ch) in source.chars().enumerate() {
        match ch {
            '(' | '[' | '<' => tokens.push(Token::Open),
            ')' => close_pair(&mut tokens, Token::One, Token::Push),
            ']' => close_pair(&mut tokens, Token::Height, Token::Negate),
            '>' => close_pair(&mut tokens, Token::Toggle, Token::Drop),
            '{' => {
                open_loops.push((tokens.len(), at));
                // Placeholder target; patched when the matching `}` arrives.
                tokens.push(Token::LoopOpen { target: 0 });
            }
            '}' => {
                let Some((open, _)) = open_loops.pop() else {
                    return Err(LexError::UnbalancedProgram { bracket: '}', at });
                };
                if open == tokens.len() - 1 {
                    // Empty body: the loop degenerates to a single pop.
                    tokens[open] = Token::Pop;
                } else {
                    let end = tokens.len();
                    tokens[open] = Token::LoopOpen { target: end };
                    tokens.push(Token::LoopEnd { target: open });
                }
            }
            _ => {}
        }
    }

    // Innermost unclosed brace first, the same convention balance::check
    // uses for its Unclosed errors.
    if let Some(&(_, at)) = open_loops.last() {
        return Err(LexError::UnbalancedProgram { bracket: '{', at });
    }

    Ok(tokens)
}

/// Handle `)`, `]` or `>`: collapse an immediately preceding `Open` marker
/// into `empty`, or append `filled` for a pair that had content.
fn close_pair(tokens: &mut Vec<Token>, empty: Token, filled: Token) {
    if tokens.last() == Some(&Token::Open) {
        let last = tokens.len() - 1;
        tokens[last] = empty;
    } else {
        tokens.push(filled);
    }
}
