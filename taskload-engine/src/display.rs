/// What the engine needs from the host's rendering layer.
///
/// Calls are assumed synchronous and non-blocking; the engine owns all
/// timing around them.
pub trait StimulusDisplay: Send {
    fn show_stimulus(&self, value: u8);
    fn clear_screen(&self);
}

/// Display that drops everything. Headless runs and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl StimulusDisplay for NullDisplay {
    fn show_stimulus(&self, _value: u8) {}

    fn clear_screen(&self) {}
}
