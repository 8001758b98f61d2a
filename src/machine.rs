//! The dual-stack virtual machine that runs a lexed token sequence.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::stack::Stack;
use crate::token::Token;

/// Errors that can abort a run. A plain [`Machine::run`] never produces
/// these; they only arise from the cooperative controls in [`StepControl`].
#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    /// Execution aborted because the step budget ran out.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: usize },

    /// Execution aborted by cooperative cancellation (e.g. a timeout).
    #[error("Execution aborted: cancelled")]
    Canceled,
}

/// Controls for cooperative cancellation and step limiting.
///
/// Divergence is legitimate in this language: `{()}` against a non-zero
/// stack top loops forever by design. Callers that must regain control
/// (the CLI's `--max-steps`, tests) bound the run from outside instead of
/// the machine second-guessing the program.
#[derive(Clone)]
pub struct StepControl {
    pub max_steps: Option<usize>,
    pub cancel_flag: Arc<AtomicBool>,
}

impl StepControl {
    pub fn new(max_steps: Option<usize>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self { max_steps, cancel_flag }
    }

    /// A budget-only control with no external cancellation hooked up.
    pub fn with_max_steps(max_steps: usize) -> Self {
        Self::new(Some(max_steps), Arc::new(AtomicBool::new(false)))
    }
}

/// One execution of a token sequence against the three stacks.
///
/// The machine owns its stacks exclusively for the run's duration: `active`
/// starts as a copy of the caller's initial values (the caller's sequence
/// survives for repeated runs against edited state), `inactive` starts empty,
/// and the accumulator starts with a single 0. Only the final active stack
/// survives the run.
pub struct Machine {
    tokens: Vec<Token>,
    active: Stack,
    inactive: Stack,
    accumulator: Stack,
}

/// Accumulator pops and peeks are balanced by construction of the lexer:
/// every `Push`/`Negate`/`Drop` is preceded by its own `Open`, and the scope
/// entered before the first token never closes. An empty accumulator here
/// means the token sequence did not come from `lex`.
const ACCUMULATOR_INVARIANT: &str = "lexed program keeps the accumulator non-empty";

impl Machine {
    pub fn new(tokens: Vec<Token>, initial: &[i64]) -> Self {
        let mut accumulator = Stack::new();
        accumulator.push(0);
        Self {
            tokens,
            active: Stack::from(initial),
            inactive: Stack::new(),
            accumulator,
        }
    }

    /// Run to completion and return the final active stack, bottom-to-top.
    ///
    /// Infallible, but not guaranteed to return: a diverging program simply
    /// never finishes. Use [`Machine::run_with_control`] to bound the run.
    pub fn run(self) -> Vec<i64> {
        match self.step_loop(None) {
            Ok(active) => active,
            Err(_) => unreachable!("no step control was installed"),
        }
    }

    /// Run under a step budget and/or cancellation flag.
    pub fn run_with_control(self, control: StepControl) -> Result<Vec<i64>, MachineError> {
        self.step_loop(Some(&control))
    }

    fn step_loop(mut self, control: Option<&StepControl>) -> Result<Vec<i64>, MachineError> {
        let mut ip = 0;
        let mut steps: usize = 0;

        while ip < self.tokens.len() {
            if let Some(ctrl) = control {
                if ctrl.cancel_flag.load(Ordering::Relaxed) {
                    return Err(MachineError::Canceled);
                }
                if let Some(max) = ctrl.max_steps {
                    if steps >= max {
                        return Err(MachineError::StepLimitExceeded { limit: max });
                    }
                }
            }

            match self.tokens[ip] {
                Token::One => {
                    let top = self.acc_top();
                    *top = top.wrapping_add(1);
                }
                Token::Height => {
                    let height = self.active.height() as i64;
                    let top = self.acc_top();
                    *top = top.wrapping_add(height);
                }
                Token::Pop => {
                    // No-op guard: popping an empty active stack adds 0.
                    let value = self.active.pop().unwrap_or(0);
                    let top = self.acc_top();
                    *top = top.wrapping_add(value);
                }
                Token::Toggle => std::mem::swap(&mut self.active, &mut self.inactive),
                Token::Open => self.accumulator.push(0),
                Token::Push => {
                    let x = self.accumulator.pop().expect(ACCUMULATOR_INVARIANT);
                    let top = self.acc_top();
                    *top = top.wrapping_add(x);
                    self.active.push(x);
                }
                Token::Negate => {
                    let x = self.accumulator.pop().expect(ACCUMULATOR_INVARIANT);
                    let top = self.acc_top();
                    *top = top.wrapping_sub(x);
                }
                Token::Drop => {
                    self.accumulator.pop().expect(ACCUMULATOR_INVARIANT);
                }
                Token::LoopOpen { target } => {
                    // Read, never consume, the active top.
                    if self.active.top().unwrap_or(0) == 0 {
                        ip = target;
                    }
                }
                Token::LoopEnd { target } => {
                    if self.active.top().unwrap_or(0) != 0 {
                        ip = target;
                    }
                }
            }

            // A jump lands on the paired bracket; this advance moves past it.
            ip += 1;
            steps += 1;
        }

        Ok(self.active.into_values())
    }

    fn acc_top(&mut self) -> &mut i64 {
        self.accumulator.top_mut().expect(ACCUMULATOR_INVARIANT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn run(initial: &[i64], source: &str) -> Vec<i64> {
        Machine::new(lex(source).unwrap(), initial).run()
    }

    #[test]
    fn collapsed_pair_only_touches_the_accumulator() {
        // A lone `()` bumps the accumulator, which is discarded at the end.
        assert_eq!(run(&[], "()"), Vec::<i64>::new());
    }

    #[test]
    fn wrapped_pair_pushes_the_accumulated_value() {
        assert_eq!(run(&[], "(())"), vec![1]);
        assert_eq!(run(&[], "(()())"), vec![2]);
    }

    #[test]
    fn height_pushes_the_active_stack_size() {
        assert_eq!(run(&[10, 20], "([])"), vec![10, 20, 2]);
        assert_eq!(run(&[], "([])"), vec![0]);
    }

    #[test]
    fn negate_subtracts_from_the_enclosing_scope() {
        // 1 - 1 and 2 - 1, observable through the enclosing push.
        assert_eq!(run(&[], "(()[()])"), vec![0]);
        assert_eq!(run(&[], "(()()[()])"), vec![1]);
    }

    #[test]
    fn drop_discards_without_propagating() {
        // Same inner accumulation, closed with `>` instead of `)`:
        // the inner value reaches the active stack once, not twice.
        assert_eq!(run(&[], "((()))"), vec![1, 1]);
        assert_eq!(run(&[], "<(())>"), vec![1]);
    }

    #[test]
    fn pop_moves_the_active_top_into_the_accumulator() {
        // `{}` collapses to a single unconditional pop.
        assert_eq!(run(&[3, 4], "{}"), vec![3]);
        // Popped values accumulate: 4 + 1, pushed back out.
        assert_eq!(run(&[3, 4], "(:{}())"), vec![3, 5]);
    }

    #[test]
    fn pop_on_empty_active_stack_is_a_no_op() {
        assert_eq!(run(&[], "{}"), Vec::<i64>::new());
    }

    #[test]
    fn toggle_swaps_identities_without_copying() {
        // After one toggle the seeded stack is shelved; pushes land on the
        // previously empty stack and the shelved values never reappear.
        assert_eq!(run(&[5], "<>(())"), vec![1]);
        // A second toggle restores the original identities.
        assert_eq!(run(&[5], "<>(())<>"), vec![5]);
        assert_eq!(run(&[5], "<>(())<><>"), vec![1]);
    }

    #[test]
    fn loop_skips_on_zero_or_empty() {
        assert_eq!(run(&[], "{(())}"), Vec::<i64>::new());
        assert_eq!(run(&[4, 0], "{(())}"), vec![4, 0]);
    }

    #[test]
    fn loop_drains_the_active_stack() {
        // `{{}}`: pop until the active stack is empty.
        assert_eq!(run(&[3, 2, 1], "{{}}"), Vec::<i64>::new());
    }

    #[test]
    fn divergence_is_not_special_cased() {
        // `{()}` with a non-zero top never terminates: the body only touches
        // the accumulator, so the loop condition can never change. Expected
        // behavior, observed via a step budget rather than a timeout.
        let machine = Machine::new(lex("{()}").unwrap(), &[3]);
        let result = machine.run_with_control(StepControl::with_max_steps(10_000));
        assert!(matches!(
            result,
            Err(MachineError::StepLimitExceeded { limit: 10_000 })
        ));
    }

    #[test]
    fn cancellation_aborts_the_run() {
        let flag = Arc::new(AtomicBool::new(true));
        let machine = Machine::new(lex("{()}").unwrap(), &[1]);
        let result = machine.run_with_control(StepControl::new(None, flag));
        assert!(matches!(result, Err(MachineError::Canceled)));
    }

    #[test]
    fn terminating_program_ignores_a_generous_budget() {
        let machine = Machine::new(lex("(())").unwrap(), &[]);
        let result = machine.run_with_control(StepControl::with_max_steps(1_000));
        assert_eq!(result.unwrap(), vec![1]);
    }

    #[test]
    fn accumulator_stays_non_empty_across_every_opcode() {
        // Every accumulator-reading opcode, at nesting depth, in one program:
        // (1 - 1) + dropped 1 + popped 2, pushed back; the loop drains that 2
        // again; the last group pops an empty stack and pushes the 0.
        assert_eq!(run(&[2], "(()[()]<()>{}){{}}({})"), vec![0]);
    }

    #[test]
    fn push_returns_the_popped_value_to_the_active_stack() {
        // The pop inside the group lands back on the active stack via the
        // enclosing push, so a later pop sees it again.
        assert_eq!(run(&[2], "(()[()]<()>{})({})"), vec![2]);
    }

    #[test]
    fn caller_initial_values_survive_the_run() {
        let initial = vec![8, 9];
        let _ = run(&initial, "{{}}");
        assert_eq!(initial, vec![8, 9]);
    }
}
