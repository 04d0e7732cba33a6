//! Matrix keyboard configuration.

use fugit::MicrosDurationU32;

use crate::debounce::DEFAULT_DEBOUNCE;
use crate::keymap::DEFAULT_LAYERS;

/// Options fixed when a matrix keyboard is built.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Options {
    /// Drive the rows and sense the columns, for diodes wired the other way round.
    pub invert_diode: bool,
    /// Lines are active low: drive low, pull inputs up, and read low as closed.
    pub invert_active_level: bool,
    /// Target time for one full sweep of the matrix.  Zero scans as fast as the pins allow.
    pub scan_period: MicrosDurationU32,
    /// Consecutive disagreeing samples a key counts before the next one changes its stable
    /// state.  Zero reacts to the first sample.
    pub debounce: u8,
    /// Number of key code layers.
    pub layers: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            invert_diode: false,
            invert_active_level: false,
            scan_period: MicrosDurationU32::from_ticks(0),
            debounce: DEFAULT_DEBOUNCE,
            layers: DEFAULT_LAYERS,
        }
    }
}

impl Options {
    pub fn with_invert_diode(mut self, invert: bool) -> Self {
        self.invert_diode = invert;
        self
    }

    pub fn with_invert_active_level(mut self, invert: bool) -> Self {
        self.invert_active_level = invert;
        self
    }

    pub fn with_scan_period(mut self, period: MicrosDurationU32) -> Self {
        self.scan_period = period;
        self
    }

    pub fn with_debounce(mut self, count: u8) -> Self {
        self.debounce = count;
        self
    }

    pub fn with_layers(mut self, layers: usize) -> Self {
        self.layers = layers;
        self
    }

    /// Delay before each sample, in nanoseconds, spreading the scan period evenly over `cells`.
    pub fn settle_ns(&self, cells: usize) -> u32 {
        let period = self.scan_period.ticks() as u64 * 1_000;
        if period == 0 || cells == 0 {
            return 0;
        }
        u32::try_from(period / cells as u64).unwrap_or(u32::MAX)
    }
}
