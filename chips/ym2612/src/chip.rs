use bus_traits::{Bank, FmBus};
use log::{debug, trace};
use pitch::FmPitch;

use crate::{
    AddressMap, DEFAULT_VOICE, Field, RegisterError, Row, SHADOW_LEN, Scope, Slot, SlotMask,
    Voice, locate,
};

const LOG_TAG: &str = "YM2612";

pub const FM_CHANNELS: u8 = 6;
/// Channel 3, whose operators can each be given their own frequency
pub const SPECIAL_CHANNEL: u8 = 2;

const KEY_ON: u8 = 0x28;
const DAC_SAMPLE: u8 = 0x2A;
const DAC_ENABLE: u8 = 0x2B;

/// A YM2612 behind a bus, with a shadow of every register that holds a
/// setting. The chip can't be read, so the shadow is the only record of what
/// it is doing: any change to part of a register is made by editing the
/// shadow byte and writing the whole byte out again.
pub struct Ym2612<B> {
    bus: B,
    shadow: [u8; SHADOW_LEN],
    keys: [SlotMask; FM_CHANNELS as usize],
}

impl<B: FmBus> Ym2612<B> {
    /// The shadow starts zeroed, which is what the chip holds after reset.
    /// Nothing is written until [`Ym2612::init`].
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            shadow: [0; SHADOW_LEN],
            keys: [SlotMask::NONE; FM_CHANNELS as usize],
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

    /// Reset the chip and bring it up silent with the default voice on every
    /// channel
    pub fn init(&mut self) -> Result<(), RegisterError> {
        self.bus.reset()?;
        self.shadow = [0; SHADOW_LEN];
        self.keys = [SlotMask::NONE; FM_CHANNELS as usize];

        self.store(Row::R22, 0, None, 0)?;
        for channel in 0..FM_CHANNELS {
            self.set_operators(channel, SlotMask::NONE)?;
        }
        // Timers and special mode off
        self.store(Row::R27, 0, None, 0)?;
        self.set_dac_enabled(false)?;
        for channel in 0..FM_CHANNELS {
            self.apply_default_voice(channel)?;
        }
        for slot in Slot::HARDWARE_ORDER {
            self.store(Row::R90, 0, Some(slot), 0)?;
        }
        debug!(target: LOG_TAG, "Initialised");
        Ok(())
    }

    /// Write one whole shadowed register
    fn store(
        &mut self,
        row: Row,
        channel: u8,
        slot: Option<Slot>,
        byte: u8,
    ) -> Result<(), RegisterError> {
        let loc = locate(row, channel, slot)?;
        self.bus.write(loc.bank, loc.address, byte)?;
        self.shadow[loc.offset] = byte;
        Ok(())
    }

    /// Set one parameter. The value is masked to the field's width and the
    /// other bits of the register are left as they were. Exactly one bus
    /// write is made, or none if the channel and slot don't make sense for
    /// the field.
    pub fn set_field(
        &mut self,
        channel: u8,
        slot: Option<Slot>,
        field: Field,
        value: u8,
    ) -> Result<(), RegisterError> {
        let desc = field.descriptor();
        let loc = locate(desc.row, channel, slot)?;
        let byte = desc.merge(self.shadow[loc.offset], value);
        trace!(target: LOG_TAG, "{field:?} ch {channel} {slot:?} = {value}");
        self.bus.write(loc.bank, loc.address, byte)?;
        self.shadow[loc.offset] = byte;
        Ok(())
    }

    /// The last value set for a parameter
    pub fn field(&self, channel: u8, slot: Option<Slot>, field: Field) -> Result<u8, RegisterError> {
        let desc = field.descriptor();
        let loc = locate(desc.row, channel, slot)?;
        Ok(desc.extract(self.shadow[loc.offset]))
    }

    /// The whole shadowed byte at a bus address, `None` if the address isn't
    /// shadowed
    pub fn shadow_byte(&self, bank: Bank, address: u8) -> Option<u8> {
        AddressMap::get()
            .offset_of(bank, address)
            .map(|offset| self.shadow[offset])
    }

    pub fn shadow(&self) -> &[u8; SHADOW_LEN] {
        &self.shadow
    }

    /// Every shadowed register with its bus address
    pub fn registers(&self) -> impl Iterator<Item = (Bank, u8, u8)> + '_ {
        AddressMap::get()
            .iter()
            .map(|(offset, bank, address)| (bank, address, self.shadow[offset]))
    }

    /// Set a channel's pitch. The high byte is latched by the chip until the
    /// low byte is written, so it has to go first.
    pub fn set_frequency(&mut self, channel: u8, pitch: FmPitch) -> Result<(), RegisterError> {
        if channel >= FM_CHANNELS {
            return Err(RegisterError::InvalidChannel {
                channel,
                address: Row::A4.address(),
            });
        }
        self.set_field(channel, None, Field::FrequencyHigh, pitch.high())?;
        self.set_field(channel, None, Field::FrequencyLow, pitch.low())
    }

    /// Pitch of one of channel 3's operators in special mode. S4 plays at
    /// the channel's own frequency.
    pub fn set_special_frequency(&mut self, slot: Slot, pitch: FmPitch) -> Result<(), RegisterError> {
        // 0xA8/0xAC is S3, 0xA9/0xAD is S1, 0xAA/0xAE is S2
        let index = match slot {
            Slot::S1 => 1,
            Slot::S2 => 2,
            Slot::S3 => 0,
            Slot::S4 => return self.set_frequency(SPECIAL_CHANNEL, pitch),
        };
        self.set_field(index, None, Field::SpecialFrequencyHigh, pitch.high())?;
        self.set_field(index, None, Field::SpecialFrequencyLow, pitch.low())
    }

    /// Key operators on or off. Operators not in `mask` are keyed off.
    pub fn set_operators(&mut self, channel: u8, mask: SlotMask) -> Result<(), RegisterError> {
        if channel >= FM_CHANNELS {
            return Err(RegisterError::InvalidChannel {
                channel,
                address: KEY_ON,
            });
        }
        // Part 2 channels are numbered 4..=6, 3 is unused
        let select = if channel < 3 { channel } else { channel % 3 + 4 };
        self.bus.write(Bank::Part1, KEY_ON, mask.bits() << 4 | select)?;
        self.keys[channel as usize] = mask;
        Ok(())
    }

    /// The operators last keyed on for a channel
    pub fn keys(&self, channel: u8) -> Option<SlotMask> {
        self.keys.get(channel as usize).copied()
    }

    /// Swap channel 6 between FM and the 8-bit DAC
    pub fn set_dac_enabled(&mut self, enabled: bool) -> Result<(), RegisterError> {
        let byte = if enabled { 0x80 } else { 0 };
        self.bus.write(Bank::Part1, DAC_ENABLE, byte)?;
        Ok(())
    }

    pub fn write_dac_sample(&mut self, sample: u8) -> Result<(), RegisterError> {
        self.bus.write(Bank::Part1, DAC_SAMPLE, sample)?;
        Ok(())
    }

    /// Load a voice on to a channel, one field at a time
    pub fn apply_voice(&mut self, channel: u8, voice: &Voice) -> Result<(), RegisterError> {
        if channel >= FM_CHANNELS {
            return Err(RegisterError::InvalidChannel {
                channel,
                address: Row::B0.address(),
            });
        }
        for (slot, field, value) in voice.writes() {
            self.set_field(channel, slot, field, value)?;
        }
        Ok(())
    }

    pub fn apply_default_voice(&mut self, channel: u8) -> Result<(), RegisterError> {
        self.apply_voice(channel, &DEFAULT_VOICE)
    }

    /// Copy every voice register of `from` on to `to`. Each copied byte is
    /// written out even if `to` already held it.
    pub fn mirror_voice(&mut self, from: u8, to: u8) -> Result<(), RegisterError> {
        for channel in [from, to] {
            if channel >= FM_CHANNELS {
                return Err(RegisterError::InvalidChannel {
                    channel,
                    address: Row::B0.address(),
                });
            }
        }
        for row in Row::VOICE {
            match row.scope() {
                Scope::Slot => {
                    for slot in Slot::HARDWARE_ORDER {
                        let src = locate(row, from, Some(slot))?;
                        self.store(row, to, Some(slot), self.shadow[src.offset])?;
                    }
                }
                _ => {
                    let src = locate(row, from, None)?;
                    self.store(row, to, None, self.shadow[src.offset])?;
                }
            }
        }
        debug!(target: LOG_TAG, "Mirrored voice of channel {from} on to {to}");
        Ok(())
    }
}
