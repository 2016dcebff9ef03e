use bus_traits::{FmBus, PsgBus};
use log::{debug, trace};
use midi::{MidiEvent, MidiKind};
use pitch::{FrequencyModel, noise_for_key};
use sn76489::{PsgChannel, PsgError, Sn76489};
use std::fmt::Display;
use ym2612::{Field, RegisterError, Slot, SlotMask, Ym2612};

use crate::cc::{CcTarget, lookup};

const LOG_TAG: &str = "MegaSynth";

/// The carrier in every algorithm, used to set a note's loudness
const LEVEL_SLOT: Slot = Slot::S4;

/// What a MIDI channel plays on. The split is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelRole {
    /// MIDI 0-5, one FM channel each
    Fm(u8),
    /// MIDI 6-8
    Tone(PsgChannel),
    /// MIDI 9
    Noise,
    /// MIDI 10-12, the S1, S2 and S3 frequencies of FM channel 3 in special
    /// mode. Pitch only.
    Special(Slot),
    /// MIDI 13-15
    Unused,
}

impl ChannelRole {
    pub const fn of(channel: u8) -> Self {
        match channel {
            0..=5 => ChannelRole::Fm(channel),
            6 => ChannelRole::Tone(PsgChannel::Tone1),
            7 => ChannelRole::Tone(PsgChannel::Tone2),
            8 => ChannelRole::Tone(PsgChannel::Tone3),
            9 => ChannelRole::Noise,
            10 => ChannelRole::Special(Slot::S1),
            11 => ChannelRole::Special(Slot::S2),
            12 => ChannelRole::Special(Slot::S3),
            _ => ChannelRole::Unused,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthError {
    Fm(RegisterError),
    Psg(PsgError),
}

impl Display for SynthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthError::Fm(e) => write!(f, "YM2612: {e}"),
            SynthError::Psg(e) => write!(f, "SN76489: {e}"),
        }
    }
}

impl std::error::Error for SynthError {}

impl From<RegisterError> for SynthError {
    fn from(e: RegisterError) -> Self {
        SynthError::Fm(e)
    }
}

impl From<PsgError> for SynthError {
    fn from(e: PsgError) -> Self {
        SynthError::Psg(e)
    }
}

/// Plays MIDI on a YM2612 and an SN76489
pub struct MegaSynth<F, P> {
    ym: Ym2612<F>,
    psg: Sn76489<P>,
    model: FrequencyModel,
}

impl<F: FmBus, P: PsgBus> MegaSynth<F, P> {
    pub fn new(fm_bus: F, psg_bus: P, model: FrequencyModel) -> Self {
        Self {
            ym: Ym2612::new(fm_bus),
            psg: Sn76489::new(psg_bus),
            model,
        }
    }

    pub fn ym(&self) -> &Ym2612<F> {
        &self.ym
    }

    pub fn ym_mut(&mut self) -> &mut Ym2612<F> {
        &mut self.ym
    }

    pub fn psg(&self) -> &Sn76489<P> {
        &self.psg
    }

    pub fn psg_mut(&mut self) -> &mut Sn76489<P> {
        &mut self.psg
    }

    pub fn model(&self) -> &FrequencyModel {
        &self.model
    }

    /// Bring both chips up silent
    pub fn init(&mut self) -> Result<(), SynthError> {
        self.ym.init()?;
        self.psg.init()?;
        Ok(())
    }

    /// Play one event. Anything that can't be played is logged and dropped.
    pub fn handle(&mut self, event: MidiEvent) {
        let res = match event.kind {
            MidiKind::NoteOn => self.note_on(event.channel, event.key(), event.velocity()),
            MidiKind::NoteOff => self.note_off(event.channel),
            MidiKind::ControlChange => {
                self.continuous_controller(event.channel, event.cc_number(), event.cc_value())
            }
            _ => {
                trace!(target: LOG_TAG, "Ignoring {:?}, status {:#04X}", event.kind, event.status());
                Ok(())
            }
        };
        if let Err(e) = res {
            debug!(target: LOG_TAG, "Dropped {event:?}: {e}");
        }
    }

    /// A velocity of zero is a note off
    pub fn note_on(&mut self, channel: u8, key: u8, velocity: u8) -> Result<(), SynthError> {
        if velocity == 0 {
            return self.note_off(channel);
        }
        match ChannelRole::of(channel) {
            ChannelRole::Fm(ch) => {
                self.ym.set_frequency(ch, self.model.fm_pitch(key))?;
                self.ym
                    .set_field(ch, Some(LEVEL_SLOT), Field::TotalLevel, 127 - (velocity & 0x7F))?;
                // Retrigger from the start of the envelope
                self.ym.set_operators(ch, SlotMask::NONE)?;
                self.ym.set_operators(ch, SlotMask::ALL)?;
            }
            ChannelRole::Tone(tone) => {
                self.psg.set_period(tone, self.model.psg_period(key))?;
                self.psg.set_level(tone, velocity)?;
            }
            ChannelRole::Noise => {
                self.psg.set_noise(noise_for_key(key))?;
                self.psg.set_level(PsgChannel::Noise, velocity)?;
            }
            ChannelRole::Special(slot) => {
                self.ym.set_special_frequency(slot, self.model.fm_pitch(key))?;
            }
            ChannelRole::Unused => {
                trace!(target: LOG_TAG, "Note on unused channel {channel}");
            }
        }
        Ok(())
    }

    pub fn note_off(&mut self, channel: u8) -> Result<(), SynthError> {
        match ChannelRole::of(channel) {
            ChannelRole::Fm(ch) => self.ym.set_operators(ch, SlotMask::NONE)?,
            ChannelRole::Tone(tone) => self.psg.silence(tone)?,
            ChannelRole::Noise => self.psg.silence(PsgChannel::Noise)?,
            ChannelRole::Special(_) | ChannelRole::Unused => {}
        }
        Ok(())
    }

    /// Unknown controller numbers are ignored. Channel and operator
    /// parameters only exist on the FM channels.
    pub fn continuous_controller(&mut self, channel: u8, cc: u8, value: u8) -> Result<(), SynthError> {
        match lookup(cc) {
            Some(CcTarget::Global(field)) => self.ym.set_field(0, None, field, value)?,
            Some(CcTarget::Channel(field)) => self.ym.set_field(channel, None, field, value)?,
            Some(CcTarget::Slot(slot, field)) => {
                self.ym.set_field(channel, Some(slot), field, value)?
            }
            Some(CcTarget::Reserved) => {
                trace!(target: LOG_TAG, "Reserved cc {cc} = {value}");
            }
            None => {
                trace!(target: LOG_TAG, "Unknown cc {cc} = {value}");
            }
        }
        Ok(())
    }
}
