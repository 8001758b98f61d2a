//! Bracket-balance validation, run before program text reaches the lexer.
//!
//! This is the "simpler external check" the language delegates validation
//! to: the lexer itself only rejects brace imbalance and best-efforts the
//! rest, so hosts are expected to run [`check`] first and re-prompt the user
//! on failure.

/// Ways a program can fail the balance check. All positions are char indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BalanceError {
    /// A closing bracket arrived with nothing open.
    #[error("Unexpected close bracket '{found}' at position {at}")]
    UnexpectedClose { found: char, at: usize },

    /// A closing bracket did not match the most recent open one.
    #[error("Brackets are mismatched: expected '{expected}', found '{found}' at position {at}")]
    Mismatched { expected: char, at: usize, found: char },

    /// An open bracket was never closed.
    #[error("Unclosed bracket '{open}' at position {open_at}")]
    Unclosed { open: char, open_at: usize },
}

/// What a successful check found.
///
/// Non-bracket characters are legal (the lexer skips them) but worth
/// surfacing so the host can warn the user before running the program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    /// Count of non-bracket, non-whitespace characters in the source.
    pub ignored: usize,
}

/// Check that every bracket in `source` closes in the right order.
pub fn check(source: &str) -> Result<Report, BalanceError> {
    let mut open: Vec<(char, usize)> = Vec::new();
    let mut report = Report::default();

    for (at, ch) in source.chars().enumerate() {
        match ch {
            '(' | '[' | '<' | '{' => open.push((ch, at)),
            ')' | ']' | '>' | '}' => {
                let Some((opener, _)) = open.pop() else {
                    return Err(BalanceError::UnexpectedClose { found: ch, at });
                };
                let expected = closer_for(opener);
                if ch != expected {
                    return Err(BalanceError::Mismatched { expected, at, found: ch });
                }
            }
            c if c.is_whitespace() => {}
            _ => report.ignored += 1,
        }
    }

    if let Some(&(open, open_at)) = open.last() {
        return Err(BalanceError::Unclosed { open, open_at });
    }

    Ok(report)
}

fn closer_for(opener: char) -> char {
    match opener {
        '(' => ')',
        '[' => ']',
        '<' => '>',
        _ => '}',
    }
}
