//! Layered key code table.
//!
//! Every layer holds one key code per matrix cell.  Lookups and remaps outside of the table are
//! quietly ignored, so a malformed layout can never stop the scan loop.

use alloc::vec;
use alloc::vec::Vec;

/// Number of layers a table holds unless configured otherwise.
pub const DEFAULT_LAYERS: usize = 6;

/// A logical key code.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Keycode(pub u16);

impl Keycode {
    /// The no-op code.
    pub const NONE: Keycode = Keycode(0);

    pub fn is_none(&self) -> bool {
        *self == Keycode::NONE
    }
}

impl From<u16> for Keycode {
    fn from(code: u16) -> Self {
        Keycode(code)
    }
}

#[derive(Clone, Debug)]
pub struct KeyTable {
    /// Codes stored layer after layer, `cells` entries per layer.
    codes: Vec<Keycode>,
    layers: usize,
    cells: usize,
}

impl KeyTable {
    /// Build a table of `layers` by `cells` entries, filled from `layout`.
    ///
    /// Each element of `layout` is one layer.  Short layers and missing layers are padded with
    /// [`Keycode::NONE`]; anything beyond the table's size is dropped.
    pub fn new<L: AsRef<[Keycode]>>(layers: usize, cells: usize, layout: &[L]) -> KeyTable {
        let mut codes = vec![Keycode::NONE; layers * cells];

        for (layer, src) in layout.iter().take(layers).enumerate() {
            let dest = &mut codes[layer * cells..(layer + 1) * cells];
            for (slot, code) in dest.iter_mut().zip(src.as_ref()) {
                *slot = *code;
            }
        }

        KeyTable {
            codes,
            layers,
            cells,
        }
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    pub fn cells(&self) -> usize {
        self.cells
    }

    pub fn get(&self, layer: usize, index: usize) -> Keycode {
        match self.offset(layer, index) {
            Some(pos) => self.codes[pos],
            None => Keycode::NONE,
        }
    }

    pub fn set(&mut self, layer: usize, index: usize, code: Keycode) {
        if let Some(pos) = self.offset(layer, index) {
            self.codes[pos] = code;
        }
    }

    fn offset(&self, layer: usize, index: usize) -> Option<usize> {
        if layer >= self.layers || index >= self.cells {
            None
        } else {
            Some(layer * self.cells + index)
        }
    }
}
