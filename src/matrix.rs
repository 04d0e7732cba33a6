//! Matrix keyboard support
//!
//! Supports a keyboard connected via a pin matrix.  One set of lines is driven a line at a time
//! while the orthogonal set is sensed.  By default the columns are driven and the rows sensed;
//! inverting the diode polarity swaps the two.  Either way, the cell for row `r` and column `c`
//! is `r * cols + c`.

use alloc::boxed::Box;
use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::debounce::{CellState, Debouncer};
use crate::keymap::{KeyTable, Keycode};
use crate::log::{debug, info, warn};
use crate::options::Options;
use crate::pins::{MatrixPin, PinMode};
use crate::KeyboardDevice;

/// Receives `(layer, index, state)` for transitions the event loop reports.
pub type Callback = Box<dyn FnMut(usize, usize, CellState)>;

pub struct MatrixKeyboard<P, D> {
    cols: Vec<P>,
    rows: Vec<P>,
    delay: D,

    /// Debounce state per cell.
    cells: Vec<Debouncer>,
    /// The states from the most recent sweep, handed out by `scan`.
    states: Vec<CellState>,
    keys: KeyTable,
    options: Options,
    /// Wait before each sample.
    settle_ns: u32,
    callback: Callback,
}

impl<P: MatrixPin, D: DelayNs> MatrixKeyboard<P, D> {
    /// Build a matrix keyboard, leaving every line in its idle input mode.
    ///
    /// `layout` gives the key codes for each layer, indexed by cell.
    pub fn new<L: AsRef<[Keycode]>>(
        cols: Vec<P>,
        rows: Vec<P>,
        delay: D,
        layout: &[L],
        options: Options,
    ) -> Self {
        let count = rows.len() * cols.len();
        let settle_ns = options.settle_ns(count);

        let mut this = MatrixKeyboard {
            cols,
            rows,
            delay,
            cells: (0..count).map(|_| Debouncer::new()).collect(),
            states: (0..count).map(|_| CellState::Idle).collect(),
            keys: KeyTable::new(options.layers, count, layout),
            options,
            settle_ns,
            callback: Box::new(|_, _, _| ()),
        };

        let active_low = this.options.invert_active_level;
        for (line, pin) in this.cols.iter_mut().chain(this.rows.iter_mut()).enumerate() {
            idle(pin, line, active_low);
        }

        info!(
            "Matrix: {} cols, {} rows, {} layers",
            this.cols.len(),
            this.rows.len(),
            this.options.layers
        );
        debug!("Matrix: settle {}ns per cell", settle_ns);

        this
    }

    /// Perform a single sweep of the matrix, updating every cell.
    ///
    /// Lines are driven in order, and every orthogonal line is sampled in order for each of
    /// them.  The returned states stay valid until the next sweep.
    pub fn scan(&mut self) -> &[CellState] {
        let ncols = self.cols.len();
        let threshold = self.options.debounce;
        let invert_diode = self.options.invert_diode;
        let active_low = self.options.invert_active_level;

        let MatrixKeyboard {
            cols,
            rows,
            delay,
            cells,
            states,
            settle_ns,
            ..
        } = self;
        let (push, pull) = if invert_diode {
            (rows, cols)
        } else {
            (cols, rows)
        };

        for (out, driver) in push.iter_mut().enumerate() {
            activate(driver, out, active_low);
            for (inp, sensor) in pull.iter_mut().enumerate() {
                delay.delay_ns(*settle_ns);
                let closed = sample(sensor, inp, active_low);

                let (row, col) = if invert_diode {
                    (out, inp)
                } else {
                    (inp, out)
                };
                let index = row * ncols + col;
                states[index] = cells[index].react(closed, threshold);
            }
            idle(driver, out, active_low);
        }

        &self.states
    }

    /// The states from the most recent sweep.
    pub fn state(&self) -> &[CellState] {
        &self.states
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn keys(&self) -> &KeyTable {
        &self.keys
    }

    pub fn key_count(&self) -> usize {
        self.cells.len()
    }

    pub fn key(&self, layer: usize, index: usize) -> Keycode {
        self.keys.get(layer, index)
    }

    pub fn set_keycode(&mut self, layer: usize, index: usize, code: Keycode) {
        self.keys.set(layer, index, code);
    }

    /// Replace the transition callback.
    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: FnMut(usize, usize, CellState) + 'static,
    {
        self.callback = Box::new(callback);
    }

    pub fn invoke_callback(&mut self, layer: usize, index: usize, state: CellState) {
        (self.callback)(layer, index, state);
    }

    /// Give back the pins and delay.
    pub fn free(self) -> (Vec<P>, Vec<P>, D) {
        (self.cols, self.rows, self.delay)
    }
}

impl<P: MatrixPin, D: DelayNs> KeyboardDevice for MatrixKeyboard<P, D> {
    fn scan(&mut self) -> &[CellState] {
        MatrixKeyboard::scan(self)
    }

    fn key(&self, layer: usize, index: usize) -> Keycode {
        MatrixKeyboard::key(self, layer, index)
    }

    fn set_keycode(&mut self, layer: usize, index: usize, code: Keycode) {
        MatrixKeyboard::set_keycode(self, layer, index, code)
    }

    fn key_count(&self) -> usize {
        MatrixKeyboard::key_count(self)
    }

    fn invoke_callback(&mut self, layer: usize, index: usize, state: CellState) {
        MatrixKeyboard::invoke_callback(self, layer, index, state)
    }
}

/// Drive `pin` to the active level.
fn activate<P: MatrixPin>(pin: &mut P, line: usize, active_low: bool) {
    if pin.configure(PinMode::Output).is_err() {
        warn!("Matrix: line {} cannot be set to output", line);
    }
    let res = if active_low {
        pin.set_low()
    } else {
        pin.set_high()
    };
    if res.is_err() {
        warn!("Matrix: line {} cannot be driven", line);
    }
}

/// Return `pin` to the inactive level, then to an input pulled to the inactive rail.
fn idle<P: MatrixPin>(pin: &mut P, line: usize, active_low: bool) {
    let (res, mode) = if active_low {
        (pin.set_high(), PinMode::InputPullUp)
    } else {
        (pin.set_low(), PinMode::InputPullDown)
    };
    if res.is_err() {
        warn!("Matrix: line {} cannot be released", line);
    }
    if pin.configure(mode).is_err() {
        warn!("Matrix: line {} cannot be set to input", line);
    }
}

/// Is the switch to `pin` closed?  Unreadable lines read as open.
fn sample<P: MatrixPin>(pin: &mut P, line: usize, active_low: bool) -> bool {
    match pin.is_high() {
        Ok(high) => high != active_low,
        Err(_) => {
            warn!("Matrix: line {} unreadable", line);
            false
        }
    }
}
