//! # MegaSynth
//!
//! Plays a MIDI stream on a YM2612 and an SN76489, with each MIDI channel
//! tied to one voice on one chip:
//!
//! | MIDI channel | Plays on                                    |
//! |--------------|---------------------------------------------|
//! | 0-5          | YM2612 channels 1-6                         |
//! | 6-8          | SN76489 tone channels                       |
//! | 9            | SN76489 noise, the key picks the noise type |
//! | 10-12        | YM2612 channel 3 S1, S2, S3 pitch, special mode only |
//! | 13-15        | Nothing                                     |
//!
//! Control changes set YM2612 parameters directly, see [`cc`] for the
//! numbers. Nothing that arrives over MIDI can make the synth fail; anything
//! it can't play is logged at debug level and dropped.
//!
//! ```rust
//! use bus_nobus::RecordingBus;
//! use midi::MidiAssembler;
//! use pitch::FrequencyModel;
//! use synth::MegaSynth;
//!
//! let mut synth = MegaSynth::new(RecordingBus::new(), RecordingBus::new(), FrequencyModel::default());
//! synth.init().unwrap();
//!
//! let mut assembler = MidiAssembler::new();
//! for event in assembler.events(&[0x90, 69, 127]) {
//!     synth.handle(event);
//! }
//! assert_eq!(synth.ym().keys(0).map(|k| k.bits()), Some(0x0F));
//! ```

pub mod cc;
mod synth;

pub use synth::*;

#[cfg(test)]
mod test_synth;
