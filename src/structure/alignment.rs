// Mon Oct 12 2026 - Alex

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Alignment {
    value: usize,
}

impl Alignment {
    pub fn new(value: usize) -> Self {
        assert!(value > 0 && value.is_power_of_two());
        Self { value }
    }

    /// Smallest power-of-two alignment covering `size`; zero-sized types align to one.
    pub fn from_size(size: usize) -> Self {
        Self::new(size.max(1).next_power_of_two())
    }

    pub fn one() -> Self {
        Self { value: 1 }
    }

    pub fn as_usize(&self) -> usize {
        self.value
    }

    pub fn align(&self, offset: u64) -> u64 {
        (offset + self.value as u64 - 1) & !(self.value as u64 - 1)
    }

    /// Caps this alignment at an explicit packing value.
    pub fn packed(&self, pack: Option<Alignment>) -> Self {
        match pack {
            Some(pack) if pack.value < self.value => pack,
            _ => *self,
        }
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::one()
    }
}
