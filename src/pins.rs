//! The pin interface the scanner needs.
//!
//! Matrix lines switch between driving and sensing during a sweep, which plain `embedded-hal`
//! pins can't express.  Boards wrap their flexible GPIOs in [`MatrixPin`] to add that.

use embedded_hal::digital::{InputPin, OutputPin};

/// Electrical mode of a matrix line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Push-pull output.
    Output,
    /// Input with a pull-down to ground.
    InputPullDown,
    /// Input with a pull-up to the supply rail.
    InputPullUp,
}

/// A GPIO that can be reconfigured between input and output at runtime.
pub trait MatrixPin: InputPin + OutputPin {
    fn configure(&mut self, mode: PinMode) -> Result<(), Self::Error>;
}
