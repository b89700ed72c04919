// Mon Oct 12 2026 - Alex

use crate::model::BitfieldDecl;

/// Mask covering the low `width` bits.
pub fn mask_for(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitPlacement {
    pub storage: String,
    pub bit_offset: u32,
    pub bit_mask: u64,
}

/// Hands out storage units and bit positions for consecutive bitfield runs.
#[derive(Debug, Default)]
pub struct BitfieldAllocator {
    next_storage: usize,
    current: Option<String>,
    cursor: u32,
}

impl BitfieldAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ends the current run; the next bitfield opens a new storage unit.
    pub fn close_run(&mut self) {
        self.current = None;
        self.cursor = 0;
    }

    pub fn place(&mut self, decl: &BitfieldDecl) -> BitPlacement {
        let storage = match &self.current {
            Some(storage) => storage.clone(),
            None => {
                let storage = format!("_bitfield{}", self.next_storage);
                self.next_storage += 1;
                self.current = Some(storage.clone());
                storage
            }
        };
        let bit_offset = decl.position.unwrap_or(self.cursor);
        self.cursor = bit_offset + decl.width;
        BitPlacement {
            storage,
            bit_offset,
            bit_mask: mask_for(decl.width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(width: u32) -> BitfieldDecl {
        BitfieldDecl { width, position: None }
    }

    #[test]
    fn test_masks() {
        assert_eq!(mask_for(16), 0xFFFF);
        assert_eq!(mask_for(1), 1);
        assert_eq!(mask_for(64), u64::MAX);
    }

    #[test]
    fn test_consecutive_members_share_storage() {
        let mut allocator = BitfieldAllocator::new();
        let first = allocator.place(&bits(3));
        let second = allocator.place(&bits(5));
        assert_eq!(first.storage, second.storage);
        assert_eq!(second.bit_offset, 3);

        allocator.close_run();
        let third = allocator.place(&bits(1));
        assert_eq!(third.storage, "_bitfield1");
        assert_eq!(third.bit_offset, 0);
    }

    #[test]
    fn test_declared_position_wins() {
        let mut allocator = BitfieldAllocator::new();
        let placed = allocator.place(&BitfieldDecl { width: 4, position: Some(8) });
        assert_eq!(placed.bit_offset, 8);
        assert_eq!(allocator.place(&bits(2)).bit_offset, 12);
    }
}
