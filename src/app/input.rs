/// Commands the keymap resolves key presses into. Anything unmapped goes to the focused view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    CardStep(i32),
    NewPoint,
    CycleSort,
    Submit,
    Close,
    Delete,
    /// Delivered to the document key listeners.
    Escape,
}
