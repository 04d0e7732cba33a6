//! Per-cell debouncing.
//!
//! Each cell counts consecutive samples that disagree with its stable state.  Once enough have
//! been seen, the cell passes through a transient state for exactly one scan, which is the edge
//! event loops report as a press or release.

/// Consecutive disagreeing samples a cell counts before the next one changes its stable state.
pub const DEFAULT_DEBOUNCE: u8 = 8;

/// The debounced state of an individual cell.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CellState {
    /// Stable released.
    #[default]
    Idle,
    /// Just pressed.  Held for one scan.
    IdleToPressed,
    /// Stable pressed.
    Pressed,
    /// Just released.  Held for one scan.
    PressedToIdle,
}

impl CellState {
    /// Is the key considered down?
    pub fn is_pressed(&self) -> bool {
        matches!(self, CellState::IdleToPressed | CellState::Pressed)
    }

    pub fn is_press_edge(&self) -> bool {
        *self == CellState::IdleToPressed
    }

    pub fn is_release_edge(&self) -> bool {
        *self == CellState::PressedToIdle
    }
}

/// State and bounce evidence for one cell.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    /// State for this cell.
    state: CellState,
    /// Count of consecutive samples that disagree with `state`.
    counter: u8,
}

impl Debouncer {
    pub const fn new() -> Debouncer {
        Debouncer {
            state: CellState::Idle,
            counter: 0,
        }
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn counter(&self) -> u8 {
        self.counter
    }

    /// Feed one raw sample, where `closed` is true when the switch reads as closed.
    pub fn react(&mut self, closed: bool, threshold: u8) -> CellState {
        match self.state {
            CellState::Idle => {
                if closed {
                    self.bump(threshold, CellState::IdleToPressed);
                } else {
                    // Any released reading discards the evidence.
                    self.counter = 0;
                }
            }
            CellState::IdleToPressed => self.state = CellState::Pressed,
            CellState::Pressed => {
                if closed {
                    self.counter = 0;
                } else {
                    self.bump(threshold, CellState::PressedToIdle);
                }
            }
            CellState::PressedToIdle => self.state = CellState::Idle,
        }
        self.state
    }

    /// Count one disagreeing sample.  Once `threshold` have been counted, the next one moves the
    /// cell to `next`.
    fn bump(&mut self, threshold: u8, next: CellState) {
        if self.counter >= threshold {
            self.state = next;
            self.counter = 0;
        } else {
            self.counter = self.counter.saturating_add(1);
        }
    }
}
