//! Cooperative cancellation for long-running encodes

/// Polled by writers between columns and blocks
///
/// Returning `true` asks the writer to abort.
pub trait InterruptCheck {
    fn should_stop(&self) -> bool;
}

impl<F: Fn() -> bool> InterruptCheck for F {
    fn should_stop(&self) -> bool {
        self()
    }
}

/// Interrupt check that never fires
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverInterrupt;

impl InterruptCheck for NeverInterrupt {
    fn should_stop(&self) -> bool {
        false
    }
}
