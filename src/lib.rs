//! Keyboard matrix scanning
//!
//! Scans a row/column key matrix wired to general purpose pins, debounces every intersection,
//! and maps each intersection to a key code per layer.  The driving event loop is left to the
//! caller: it calls [`KeyboardDevice::scan`] at its own cadence, looks for the transient
//! [`CellState::IdleToPressed`] and [`CellState::PressedToIdle`] edges, and reports them through
//! the device callback.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate alloc;

pub mod debounce;
pub mod keymap;
pub mod matrix;
pub mod options;
pub mod pins;

pub use debounce::{CellState, Debouncer, DEFAULT_DEBOUNCE};
pub use keymap::{KeyTable, Keycode, DEFAULT_LAYERS};
pub use matrix::{Callback, MatrixKeyboard};
pub use options::Options;
pub use pins::{MatrixPin, PinMode};


mod log {
    cfg_if::cfg_if! {
        if #[cfg(feature = "defmt")] {
            pub use defmt::{debug, info, warn};
        } else if #[cfg(feature = "log")] {
            pub use log::{debug, info, warn};
        } else {
            macro_rules! nolog {
                ($($arg:tt)*) => {{}};
            }
            pub(crate) use nolog as debug;
            pub(crate) use nolog as info;
            pub(crate) use nolog as warn;
        }
    }
}

/// The surface an event loop drives.
///
/// Callers must not invoke any of these concurrently; a device is scanned from a single thread
/// of control.
pub trait KeyboardDevice {
    /// Bring the device up.  Matrix keyboards configure their pins at construction, so this has
    /// nothing left to do for them.
    fn init(&mut self) {}

    /// Perform one full sweep and return the state of every cell.
    ///
    /// The slice borrows live storage that the next sweep overwrites.
    fn scan(&mut self) -> &[CellState];

    /// Key code for `index` on `layer`, or [`Keycode::NONE`] when either is out of range.
    fn key(&self, layer: usize, index: usize) -> Keycode;

    /// Remap `index` on `layer`.  Out of range positions are ignored.
    fn set_keycode(&mut self, layer: usize, index: usize, code: Keycode);

    /// Number of cells in the device.
    fn key_count(&self) -> usize;

    /// Forward a transition to the device callback.
    fn invoke_callback(&mut self, layer: usize, index: usize, state: CellState);
}
