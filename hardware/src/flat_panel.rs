//! Flat panel interface trait for command dispatch.

/// Interface for flat-field panel control
///
/// Abstracts the panel hardware so command sequencing can be tested without a
/// device attached. Every method is a single blocking round trip.
pub trait FlatPanel {
    /// Error reported by the underlying device layer
    type Error: std::error::Error;

    /// Switch the electroluminescent panel on or off
    fn set_light(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Set the panel brightness
    ///
    /// # Arguments
    /// * `level` - Brightness level, 0 (dimmest) to 255 (brightest)
    fn set_brightness(&mut self, level: u8) -> Result<(), Self::Error>;

    /// Read back the brightness level the panel is currently set to
    fn brightness(&mut self) -> Result<u8, Self::Error>;
}
