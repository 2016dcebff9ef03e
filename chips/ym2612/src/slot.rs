/// One of the four operators of an FM channel, in musical order. The chip
/// lays them out in the register map as S1, S3, S2, S4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    S1,
    S2,
    S3,
    S4,
}

impl Slot {
    /// Musical order
    pub const ALL: [Slot; 4] = [Slot::S1, Slot::S2, Slot::S3, Slot::S4];
    /// Register map order
    pub const HARDWARE_ORDER: [Slot; 4] = [Slot::S1, Slot::S3, Slot::S2, Slot::S4];

    /// Position in the register map. Each step is 4 addresses.
    pub const fn hardware_index(self) -> usize {
        match self {
            Slot::S1 => 0,
            Slot::S3 => 1,
            Slot::S2 => 2,
            Slot::S4 => 3,
        }
    }

    /// Position in musical order, which is also the key-on bit
    pub const fn number(self) -> usize {
        self as usize
    }

    pub const fn from_number(number: usize) -> Option<Self> {
        match number {
            0 => Some(Slot::S1),
            1 => Some(Slot::S2),
            2 => Some(Slot::S3),
            3 => Some(Slot::S4),
            _ => None,
        }
    }
}

/// Which operators are keyed on, bit 0 is S1
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotMask(u8);

impl SlotMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0x0F);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x0F)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn with(self, slot: Slot) -> Self {
        Self(self.0 | 1 << slot.number())
    }

    pub const fn contains(self, slot: Slot) -> bool {
        self.0 & 1 << slot.number() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardware_order() {
        for (i, slot) in Slot::HARDWARE_ORDER.iter().enumerate() {
            assert_eq!(slot.hardware_index(), i);
        }
        assert_eq!(Slot::from_number(2), Some(Slot::S3));
        assert_eq!(Slot::from_number(4), None);
    }

    #[test]
    fn masks() {
        let mask = SlotMask::NONE.with(Slot::S1).with(Slot::S4);
        assert_eq!(mask.bits(), 0b1001);
        assert!(mask.contains(Slot::S4));
        assert!(!mask.contains(Slot::S2));
        assert_eq!(SlotMask::from_bits(0xFF), SlotMask::ALL);
        assert!(SlotMask::default().is_empty());
    }
}
