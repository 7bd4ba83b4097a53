#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PhaseCommand {
    /// Debounced press of the confirm button.
    Confirm,
    /// A working phase finished its tick of work.
    StepComplete,
    AnswerIncorrect,
    ConnectivityLost,
    /// Connectivity came back after the game ended.
    Restart,
}
