use std::sync::OnceLock;

use bus_traits::Bank;

use crate::{RegisterError, Row, Scope, Slot};

/// Bytes of shadow kept for the whole chip
pub const SHADOW_LEN: usize = 202;

/// A resolved register: where it sits in the shadow and on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub offset: usize,
    pub bank: Bank,
    pub address: u8,
}

/// Resolve a row for a channel and operator. Channels `0..=2` are in part 1
/// and `3..=5` in part 2, each at the same addresses. Operators step by 4
/// addresses in hardware order, and by 3 shadow bytes.
pub fn locate(row: Row, channel: u8, slot: Option<Slot>) -> Result<Location, RegisterError> {
    let address = row.address();
    match (row.scope(), slot) {
        (Scope::Global, None) => Ok(Location {
            offset: row.offset(),
            bank: Bank::Part1,
            address,
        }),
        (Scope::Global | Scope::Channel, Some(_)) => Err(RegisterError::UnexpectedSlot { address }),
        (Scope::Slot, None) => Err(RegisterError::MissingSlot { address }),
        (scope, slot) => {
            if channel >= row.channels() {
                return Err(RegisterError::InvalidChannel { channel, address });
            }
            let bank = Bank::from_channel(channel);
            let index = channel % 3;
            let slot_index = slot.map(Slot::hardware_index).unwrap_or(0);
            let step = if scope == Scope::Slot { 3 } else { 0 };

            Ok(Location {
                offset: row.offset()
                    + bank.index() * row.bank_stride()
                    + index as usize
                    + step * slot_index,
                bank,
                address: address + index + 4 * slot_index as u8,
            })
        }
    }
}

/// Flat shadow offset to bus address and back
#[derive(Debug)]
pub struct AddressMap {
    forward: Vec<(Bank, u8)>,
    reverse: Vec<Option<usize>>,
}

static ADDRESS_MAP: OnceLock<AddressMap> = OnceLock::new();

impl AddressMap {
    /// The map is built on first use and shared after that
    pub fn get() -> &'static AddressMap {
        ADDRESS_MAP.get_or_init(Self::build)
    }

    fn build() -> Self {
        let mut forward = vec![(Bank::Part1, 0); SHADOW_LEN];
        let mut reverse = vec![None; 512];

        let mut insert = |loc: Location| {
            forward[loc.offset] = (loc.bank, loc.address);
            reverse[loc.bank.index() * 256 + loc.address as usize] = Some(loc.offset);
        };

        for row in Row::ALL {
            match row.scope() {
                Scope::Global => {
                    if let Ok(loc) = locate(row, 0, None) {
                        insert(loc);
                    }
                }
                Scope::Channel => {
                    for channel in 0..row.channels() {
                        if let Ok(loc) = locate(row, channel, None) {
                            insert(loc);
                        }
                    }
                }
                Scope::Slot => {
                    for channel in 0..row.channels() {
                        for slot in Slot::ALL {
                            if let Ok(loc) = locate(row, channel, Some(slot)) {
                                insert(loc);
                            }
                        }
                    }
                }
            }
        }

        Self { forward, reverse }
    }

    /// `None` for anything not shadowed: key on, DAC, timers' counters, or
    /// addresses that don't exist
    pub fn offset_of(&self, bank: Bank, address: u8) -> Option<usize> {
        self.reverse[bank.index() * 256 + address as usize]
    }

    /// Every shadowed register in shadow order
    pub fn iter(&self) -> impl Iterator<Item = (usize, Bank, u8)> + '_ {
        self.forward
            .iter()
            .enumerate()
            .map(|(offset, &(bank, address))| (offset, bank, address))
    }
}
