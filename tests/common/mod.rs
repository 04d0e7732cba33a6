//! Simulated switch matrix.
//!
//! Every [`SimPin`] shares a [`Board`] that knows which switches are closed, how every line is
//! configured, and the order pins were touched in.  A sensed line reads the level of any output
//! line it is connected to through a closed switch, and otherwise its pull.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error, ErrorKind, ErrorType, InputPin, OutputPin};
use kbmatrix::{MatrixPin, PinMode};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Line {
    Col(usize),
    Row(usize),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Op {
    Configure(Line, PinMode),
    Set(Line, bool),
    Read(Line),
    Delay(u32),
}

#[derive(Debug)]
pub struct Board {
    pub cols: usize,
    pub rows: usize,
    /// Switch state, indexed `row * cols + col`.
    pub closed: Vec<bool>,
    col_state: Vec<(PinMode, bool)>,
    row_state: Vec<(PinMode, bool)>,
    /// Lines whose reads fail.
    pub broken: Vec<Line>,
    pub ops: Vec<Op>,
}

impl Board {
    fn line(&mut self, line: Line) -> &mut (PinMode, bool) {
        match line {
            Line::Col(c) => &mut self.col_state[c],
            Line::Row(r) => &mut self.row_state[r],
        }
    }

    pub fn mode(&self, line: Line) -> PinMode {
        match line {
            Line::Col(c) => self.col_state[c].0,
            Line::Row(r) => self.row_state[r].0,
        }
    }

    /// The level seen on `line`.
    fn level(&self, line: Line) -> bool {
        let (mode, value) = match line {
            Line::Col(c) => self.col_state[c],
            Line::Row(r) => self.row_state[r],
        };
        if mode == PinMode::Output {
            return value;
        }

        let driven = match line {
            Line::Col(c) => (0..self.rows)
                .filter(|&r| self.closed[r * self.cols + c])
                .map(|r| self.row_state[r])
                .find(|(m, _)| *m == PinMode::Output),
            Line::Row(r) => (0..self.cols)
                .filter(|&c| self.closed[r * self.cols + c])
                .map(|c| self.col_state[c])
                .find(|(m, _)| *m == PinMode::Output),
        };

        match driven {
            Some((_, level)) => level,
            None => mode == PinMode::InputPullUp,
        }
    }

    /// Reads performed, in order.
    pub fn reads(&self) -> Vec<Line> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Read(line) => Some(*line),
                _ => None,
            })
            .collect()
    }
}

pub type Shared = Rc<RefCell<Board>>;

#[derive(Debug)]
pub struct SimError;

impl Error for SimError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct SimPin {
    board: Shared,
    line: Line,
}

impl ErrorType for SimPin {
    type Error = SimError;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, SimError> {
        let mut board = self.board.borrow_mut();
        board.ops.push(Op::Read(self.line));
        if board.broken.contains(&self.line) {
            return Err(SimError);
        }
        Ok(board.level(self.line))
    }

    fn is_low(&mut self) -> Result<bool, SimError> {
        self.is_high().map(|high| !high)
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), SimError> {
        let mut board = self.board.borrow_mut();
        board.ops.push(Op::Set(self.line, false));
        board.line(self.line).1 = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), SimError> {
        let mut board = self.board.borrow_mut();
        board.ops.push(Op::Set(self.line, true));
        board.line(self.line).1 = true;
        Ok(())
    }
}

impl MatrixPin for SimPin {
    fn configure(&mut self, mode: PinMode) -> Result<(), SimError> {
        let mut board = self.board.borrow_mut();
        board.ops.push(Op::Configure(self.line, mode));
        board.line(self.line).0 = mode;
        Ok(())
    }
}

/// A delay that only records how long it was asked to wait.
pub struct SimDelay {
    board: Shared,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.board.borrow_mut().ops.push(Op::Delay(ns));
    }
}

/// Build a board with every switch open, plus its column pins, row pins and delay.
pub fn board(cols: usize, rows: usize) -> (Shared, Vec<SimPin>, Vec<SimPin>, SimDelay) {
    let board = Rc::new(RefCell::new(Board {
        cols,
        rows,
        closed: vec![false; cols * rows],
        // Floating lines start out as plain inputs.
        col_state: vec![(PinMode::InputPullDown, false); cols],
        row_state: vec![(PinMode::InputPullDown, false); rows],
        broken: Vec::new(),
        ops: Vec::new(),
    }));

    let col_pins = (0..cols)
        .map(|c| SimPin {
            board: board.clone(),
            line: Line::Col(c),
        })
        .collect();
    let row_pins = (0..rows)
        .map(|r| SimPin {
            board: board.clone(),
            line: Line::Row(r),
        })
        .collect();
    let delay = SimDelay {
        board: board.clone(),
    };

    (board, col_pins, row_pins, delay)
}

pub fn close(board: &Shared, row: usize, col: usize, closed: bool) {
    let mut b = board.borrow_mut();
    let cols = b.cols;
    b.closed[row * cols + col] = closed;
}
