//! SN76489 tone and noise driver.
//!
//! Every write to the chip is a latch byte, `1 RRR DDDD`, naming one of the
//! eight registers and carrying its low four bits. A tone period needs six
//! more bits and sends them in a second byte, `0 0 DDDDDD`, which the chip
//! applies to whichever register was latched last. The pair goes out as one
//! bus transaction so nothing can be latched in between.
//!
//! | Register | Meaning                |
//! |----------|------------------------|
//! | 0, 2, 4  | Tone 1-3 period        |
//! | 1, 3, 5  | Tone 1-3 attenuation   |
//! | 6        | Noise control          |
//! | 7        | Noise attenuation      |

use bus_traits::{BusError, PsgBus};
use log::{debug, trace};
use pitch::{NoiseMode, PSG_PERIOD_MAX};
use std::fmt::Display;

const LOG_TAG: &str = "SN76489";

const LATCH: u8 = 0x80;
/// Attenuation steps are 2dB, 15 is off
pub const SILENT: u8 = 0x0F;
const REGISTER_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PsgChannel {
    Tone1,
    Tone2,
    Tone3,
    Noise,
}

impl PsgChannel {
    pub const ALL: [PsgChannel; 4] = [
        PsgChannel::Tone1,
        PsgChannel::Tone2,
        PsgChannel::Tone3,
        PsgChannel::Noise,
    ];

    /// Period register, or noise control for the noise channel
    const fn control_register(self) -> u8 {
        (self as u8) << 1
    }

    const fn attenuation_register(self) -> u8 {
        self.control_register() + 1
    }
}

/// Attenuation for a MIDI velocity. Full velocity is full volume, anything
/// under 8 is silent.
#[inline]
pub const fn velocity_to_attenuation(velocity: u8) -> u8 {
    SILENT - ((velocity & 0x7F) >> 3)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PsgError {
    /// The noise channel has no tone period
    NoPeriod,
    Bus(BusError),
}

impl Display for PsgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PsgError::NoPeriod => write!(f, "the noise channel has no period"),
            PsgError::Bus(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PsgError {}

impl From<BusError> for PsgError {
    fn from(e: BusError) -> Self {
        PsgError::Bus(e)
    }
}

/// An SN76489 behind a bus, with a shadow of its eight registers
pub struct Sn76489<B> {
    bus: B,
    registers: [u16; REGISTER_COUNT],
}

impl<B: PsgBus> Sn76489<B> {
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            registers: [0; REGISTER_COUNT],
        }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    /// The chip powers up making noise on every channel. Shut them all up.
    pub fn init(&mut self) -> Result<(), PsgError> {
        for channel in PsgChannel::ALL {
            self.silence(channel)?;
        }
        debug!(target: LOG_TAG, "Initialised");
        Ok(())
    }

    fn latch(&mut self, register: u8, data: u8) -> Result<(), PsgError> {
        let byte = LATCH | (register & 0x07) << 4 | data & 0x0F;
        trace!(target: LOG_TAG, "r{register} = {data:#X}");
        self.bus.write(&[byte])?;
        self.registers[register as usize] = (data & 0x0F) as u16;
        Ok(())
    }

    /// Set a tone channel's period in tone clock cycles. Only the low ten
    /// bits are used.
    pub fn set_period(&mut self, channel: PsgChannel, period: u16) -> Result<(), PsgError> {
        if channel == PsgChannel::Noise {
            return Err(PsgError::NoPeriod);
        }
        let period = period & PSG_PERIOD_MAX;
        let register = channel.control_register();
        let bytes = [
            LATCH | register << 4 | (period & 0x0F) as u8,
            (period >> 4) as u8 & 0x3F,
        ];
        trace!(target: LOG_TAG, "{channel:?} period {period}");
        self.bus.write(&bytes)?;
        self.registers[register as usize] = period;
        Ok(())
    }

    pub fn set_noise(&mut self, mode: NoiseMode) -> Result<(), PsgError> {
        self.latch(PsgChannel::Noise.control_register(), mode.bits())
    }

    /// `0` is loudest, [`SILENT`] is off
    pub fn set_attenuation(&mut self, channel: PsgChannel, attenuation: u8) -> Result<(), PsgError> {
        self.latch(channel.attenuation_register(), attenuation)
    }

    pub fn set_level(&mut self, channel: PsgChannel, velocity: u8) -> Result<(), PsgError> {
        self.set_attenuation(channel, velocity_to_attenuation(velocity))
    }

    pub fn silence(&mut self, channel: PsgChannel) -> Result<(), PsgError> {
        self.set_attenuation(channel, SILENT)
    }

    /// `None` for the noise channel
    pub fn period(&self, channel: PsgChannel) -> Option<u16> {
        match channel {
            PsgChannel::Noise => None,
            _ => Some(self.registers[channel.control_register() as usize]),
        }
    }

    pub fn attenuation(&self, channel: PsgChannel) -> u8 {
        self.registers[channel.attenuation_register() as usize] as u8
    }

    /// The raw noise control bits
    pub fn noise(&self) -> u8 {
        self.registers[PsgChannel::Noise.control_register() as usize] as u8
    }

    /// All eight registers in register order
    pub fn registers(&self) -> &[u16; REGISTER_COUNT] {
        &self.registers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bus_nobus::RecordingBus;
    use pitch::{FrequencyModel, noise_for_key};

    fn psg() -> Sn76489<RecordingBus> {
        Sn76489::new(RecordingBus::new())
    }

    #[test]
    fn init_silences_everything() {
        let mut sn = psg();
        sn.init().unwrap();
        assert_eq!(
            sn.bus().psg_writes(),
            vec![vec![0x9F], vec![0xBF], vec![0xDF], vec![0xFF]]
        );
        for channel in PsgChannel::ALL {
            assert_eq!(sn.attenuation(channel), SILENT);
        }
    }

    #[test]
    fn period_is_one_transaction() {
        let mut sn = psg();
        let period = FrequencyModel::default().psg_period(69);
        assert_eq!(period, 284);
        sn.set_period(PsgChannel::Tone2, period).unwrap();
        // 284 = 0b01_0001_1100
        assert_eq!(sn.bus().psg_writes(), vec![vec![0xAC, 0x11]]);
        assert_eq!(sn.period(PsgChannel::Tone2), Some(284));
    }

    #[test]
    fn period_is_ten_bits() {
        let mut sn = psg();
        sn.set_period(PsgChannel::Tone3, 0xFFFF).unwrap();
        assert_eq!(sn.bus().psg_writes(), vec![vec![0xCF, 0x3F]]);
        assert_eq!(sn.period(PsgChannel::Tone3), Some(0x3FF));
    }

    #[test]
    fn noise_has_no_period() {
        let mut sn = psg();
        assert_eq!(sn.set_period(PsgChannel::Noise, 10), Err(PsgError::NoPeriod));
        assert!(sn.bus().is_empty());
        assert_eq!(sn.period(PsgChannel::Noise), None);
    }

    #[test]
    fn noise_control() {
        let mut sn = psg();
        sn.set_noise(noise_for_key(66)).unwrap();
        assert_eq!(sn.bus().psg_writes(), vec![vec![0xE5]]);
        assert_eq!(sn.noise(), 0b101);
    }

    #[test]
    fn velocity_levels() {
        assert_eq!(velocity_to_attenuation(127), 0);
        assert_eq!(velocity_to_attenuation(64), 7);
        assert_eq!(velocity_to_attenuation(7), 15);
        assert_eq!(velocity_to_attenuation(0), 15);

        let mut sn = psg();
        sn.set_level(PsgChannel::Tone1, 100).unwrap();
        assert_eq!(sn.bus().psg_writes(), vec![vec![0x93]]);
        assert_eq!(sn.attenuation(PsgChannel::Tone1), 3);
    }
}
