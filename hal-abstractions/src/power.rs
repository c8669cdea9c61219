//! Low-power idle control

/// Switch for the platform's low-power idle mode.
///
/// When enabled, the platform sleeps whenever nothing is scheduled and wakes
/// on the next timer or interrupt. Implementations must be idempotent.
pub trait PowerControl {
    fn set_low_power(&mut self, enabled: bool);
}
