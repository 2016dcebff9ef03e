//! # YM2612 register model
//!
//! The YM2612 is programmed through about two hundred write-only registers
//! spread over two parts, most of them holding two or three parameters
//! packed together. This crate hides that layout: a caller names a
//! parameter, a channel and (where it applies) an operator, and the driver
//! works out the part, the address and which bits to change.
//!
//! ```text,ignore
//!   Field ──descriptor──> Row + width + shift
//!   Row + channel + slot ──locate──> shadow offset, part, address
//!   shadow[offset] = merge(shadow[offset], value)  ──> bus write
//! ```
//!
//! Because nothing can be read back from the chip the driver keeps a shadow
//! of every register that holds a setting. Key on (`0x28`) and the DAC
//! (`0x2A`, `0x2B`) are commands rather than settings and are written
//! straight through.
//!
//! ## Usage
//!
//! ```rust
//! use bus_nobus::NullBus;
//! use ym2612::{Field, Slot, Ym2612};
//!
//! let mut ym = Ym2612::new(NullBus);
//! ym.init().unwrap();
//! ym.set_field(0, Some(Slot::S4), Field::TotalLevel, 20).unwrap();
//! assert_eq!(ym.field(0, Some(Slot::S4), Field::TotalLevel), Ok(20));
//! // The other operators keep the default voice
//! assert_eq!(ym.field(0, Some(Slot::S1), Field::TotalLevel), Ok(35));
//! ```

mod address;
mod chip;
mod fields;
mod slot;
mod voice;

pub use address::*;
pub use chip::*;
pub use fields::*;
pub use slot::*;
pub use voice::*;

use bus_traits::BusError;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// The channel doesn't have this register
    InvalidChannel { channel: u8, address: u8 },
    /// An operator register was named without an operator
    MissingSlot { address: u8 },
    /// A channel or global register was named with an operator
    UnexpectedSlot { address: u8 },
    Bus(BusError),
}

impl Display for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisterError::InvalidChannel { channel, address } => {
                write!(f, "channel {channel} has no register {address:#04X}")
            }
            RegisterError::MissingSlot { address } => {
                write!(f, "register {address:#04X} needs an operator")
            }
            RegisterError::UnexpectedSlot { address } => {
                write!(f, "register {address:#04X} has no operators")
            }
            RegisterError::Bus(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RegisterError {}

impl From<BusError> for RegisterError {
    fn from(e: BusError) -> Self {
        RegisterError::Bus(e)
    }
}
