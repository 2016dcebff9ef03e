//! Capabilities the chip drivers need from whatever sits between them and the
//! silicon. A driver never touches pins or timing itself, it only asks for
//! a byte to be latched in to a register.

use std::{fmt::Display, time::Duration};

/// The YM2612 register file is split in two parts. Part 1 holds the globals
/// and channels 0-2, part 2 holds channels 3-5.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bank {
    #[default]
    Part1 = 0,
    Part2 = 1,
}

impl Bank {
    /// The part an FM channel `0..=5` lives in
    pub const fn from_channel(channel: u8) -> Self {
        if channel < 3 { Bank::Part1 } else { Bank::Part2 }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Level of the A1 line when latching an address in this part
    pub const fn a1(self) -> bool {
        matches!(self, Bank::Part2)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// A control or data line could not be driven
    Pin(&'static str),
    /// The host side link failed
    Io(String),
}

impl Display for BusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusError::Pin(name) => write!(f, "could not drive pin {name}"),
            BusError::Io(e) => write!(f, "bus io failed: {e}"),
        }
    }
}

impl std::error::Error for BusError {}

/// Write side of the YM2612. The chip is write-only, nothing can be read
/// back over the bus, so drivers keep their own shadow.
pub trait FmBus {
    /// Latch `address` then `data` in to `bank`. The two halves must not be
    /// split by anything else touching the bus.
    fn write(&mut self, bank: Bank, address: u8, data: u8) -> Result<(), BusError>;

    /// Pulse the chip reset line and wait out the reset time
    fn reset(&mut self) -> Result<(), BusError>;
}

/// Write side of the SN76489
pub trait PsgBus {
    /// Latch each byte in order as one uninterrupted transaction
    fn write(&mut self, data: &[u8]) -> Result<(), BusError>;
}

impl<T: FmBus + ?Sized> FmBus for &mut T {
    fn write(&mut self, bank: Bank, address: u8, data: u8) -> Result<(), BusError> {
        (**self).write(bank, address, data)
    }

    fn reset(&mut self) -> Result<(), BusError> {
        (**self).reset()
    }
}

impl<T: PsgBus + ?Sized> PsgBus for &mut T {
    fn write(&mut self, data: &[u8]) -> Result<(), BusError> {
        (**self).write(data)
    }
}

/// Minimum waits around each bus strobe. The chips have no ready line that
/// is worth wiring up, so the writer has to wait these out blind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusTiming {
    /// Address and data lines stable before the write strobe
    pub setup: Duration,
    /// Length of the FM write strobe
    pub pulse: Duration,
    /// Lines held after the strobe is released
    pub hold: Duration,
    /// Length the FM reset line is held low
    pub reset: Duration,
    /// Length of the PSG write enable strobe
    pub psg_pulse: Duration,
}

impl BusTiming {
    pub const YM2612_SN76489: Self = Self {
        setup: Duration::from_micros(1),
        pulse: Duration::from_micros(5),
        hold: Duration::from_micros(5),
        reset: Duration::from_millis(10),
        psg_pulse: Duration::from_micros(150),
    };

    /// No waiting at all, for buses with nothing physical on the end
    pub const NONE: Self = Self {
        setup: Duration::ZERO,
        pulse: Duration::ZERO,
        hold: Duration::ZERO,
        reset: Duration::ZERO,
        psg_pulse: Duration::ZERO,
    };

    /// Total time one FM register write keeps the bus busy
    pub fn fm_write(&self) -> Duration {
        // Address and data are latched separately
        (self.setup + self.pulse + self.hold) * 2
    }
}

impl Default for BusTiming {
    fn default() -> Self {
        Self::YM2612_SN76489
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_for_channel() {
        assert_eq!(Bank::from_channel(0), Bank::Part1);
        assert_eq!(Bank::from_channel(2), Bank::Part1);
        assert_eq!(Bank::from_channel(3), Bank::Part2);
        assert_eq!(Bank::from_channel(5), Bank::Part2);
        assert!(!Bank::Part1.a1());
        assert!(Bank::Part2.a1());
    }

    #[test]
    fn timing_contract() {
        let timing = BusTiming::default();
        assert_eq!(timing.setup.as_micros(), 1);
        assert_eq!(timing.pulse.as_micros(), 5);
        assert_eq!(timing.hold.as_micros(), 5);
        assert_eq!(timing.reset.as_millis(), 10);
        assert_eq!(timing.psg_pulse.as_micros(), 150);
        assert_eq!(timing.fm_write().as_micros(), 22);
        assert_eq!(BusTiming::NONE.fm_write(), Duration::ZERO);
    }
}
