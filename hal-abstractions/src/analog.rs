//! Single-channel analog input

/// One ADC channel, sampled on demand.
pub trait AnalogInput {
    /// Error returned when a conversion cannot be performed
    type Error: core::fmt::Debug;

    /// Take one raw sample.
    ///
    /// The value is in the range `0..=self.full_scale()`.
    fn read_raw(&mut self) -> Result<u16, Self::Error>;

    /// Raw value corresponding to the ADC reference voltage
    /// (e.g. `4095` for a 12-bit converter).
    fn full_scale(&self) -> u16;
}
