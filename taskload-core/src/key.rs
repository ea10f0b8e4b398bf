use std::time::Instant;

/// Key identity as delivered by the host input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Space,
    Enter,
    Escape,
    Char(char),
}

/// A keypress with the timestamp it was observed at.
///
/// The timestamp comes from the input layer so reaction times reflect the
/// press, not when the engine got around to grading it.
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub at: Instant,
}

impl KeyEvent {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            at: Instant::now(),
        }
    }

    pub fn at(code: KeyCode, at: Instant) -> Self {
        Self { code, at }
    }
}
