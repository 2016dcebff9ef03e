//! # Note to chip pitch translation
//!
//! Both sound chips are programmed with numbers that are only loosely related
//! to a frequency in Hz, and each chip wants a different number:
//!
//! - The **YM2612** takes a 3-bit octave selector (the *block*) packed above an
//!   11-bit fractional mantissa (the *F-number*). The mantissa for a given
//!   semitone is the same in every octave, only the block changes.
//! - The **SN76489** takes a 10-bit *period*, counted in cycles of its tone
//!   clock. Lower notes need longer periods, and anything below roughly C3
//!   doesn't fit in 10 bits.
//!
//! Both encodings start from one shared table of the twelve semitones of
//! octave 4, scaled by 72 to keep some fractional precision in integer math:
//!
//! ```text,ignore
//!   table[n] = round(72 × A4 × 2^((n - 9) / 12))      n = 0 (C) ..= 11 (B)
//!
//!   YM2612  block    = clamp(key / 12 - 1, 0, 7)
//!           mantissa = table[key % 12] × 2^9 / (fm_clock / 512)
//!           code     = block << 11 | mantissa
//!
//!   SN76489 period   = (psg_clock × 72 ≪≫ octave shift + table / 2) / table
//!                      halved until it fits in 10 bits
//! ```
//!
//! Halving the PSG period raises the note an octave. A note too low for the
//! chip is played an octave (or more) up rather than wrapped around to some
//! unrelated pitch.
//!
//! The dedicated noise channel has no pitch at all. Its key instead picks a
//! noise colour and shift rate from a fixed table, see [`noise_for_key`].

mod noise;

pub use noise::*;

/// Semitones in an octave
pub const NOTE_COUNT: usize = 12;
/// Scale applied to the chromatic table for integer precision
pub const FREQ_SCALE: u32 = 72;
/// MIDI key 60 is C4, so key / 12 is one more than the octave
pub const OCTAVE_OFFSET: i32 = -1;
/// Largest block the YM2612 frequency register can hold
pub const MAX_BLOCK: u8 = 7;
/// The octave the chromatic table is built for
pub const REFERENCE_OCTAVE: i32 = 4;
/// The SN76489 tone period register is 10 bits
pub const PSG_PERIOD_MAX: u16 = 0x3FF;
/// The YM2612 F-number is 11 bits
pub const FNUM_MASK: u16 = 0x7FF;
/// Lowest reference pitch a [`Tuning`] keeps
pub const MIN_REFERENCE_PITCH: f64 = 220.0;
/// Highest reference pitch a [`Tuning`] keeps. Much past this, B no longer
/// fits in an F-number at the 8MHz clock.
pub const MAX_REFERENCE_PITCH: f64 = 660.0;
/// A precise twelfth root of two
pub const SEMITONE_RATIO: f64 = 1.059_463_094_359_295_3;

/// Semitone distance from C up to the reference A
const A_INDEX: i32 = 9;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Note {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

#[allow(non_upper_case_globals)]
impl Note {
    pub const Df: Note = Note::Cs;
    pub const Ef: Note = Note::Ds;
    pub const Gf: Note = Note::Fs;
    pub const Af: Note = Note::Gs;
    pub const Bf: Note = Note::As;

    pub const ALL: [Note; NOTE_COUNT] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// The semitone of a MIDI key, disregarding octave
    pub const fn from_key(key: u8) -> Self {
        Self::ALL[key as usize % NOTE_COUNT]
    }
}

/// The MIDI octave of a key, `-1..=9`
#[inline]
pub const fn octave(key: u8) -> i32 {
    key as i32 / NOTE_COUNT as i32 + OCTAVE_OFFSET
}

/// Block for a key. Keys outside the chip's eight octaves are clamped to the
/// nearest block so they play an octave off rather than wrapping.
#[inline]
pub const fn fm_block(key: u8) -> u8 {
    let octave = octave(key);
    if octave < 0 {
        0
    } else if octave > MAX_BLOCK as i32 {
        MAX_BLOCK
    } else {
        octave as u8
    }
}

/// Reference pitch and the two chip clocks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Frequency of A4 in Hz
    pub reference_pitch: f64,
    /// YM2612 master clock in Hz
    pub fm_clock_hz: u32,
    /// SN76489 tone counter rate in Hz (master clock / 32)
    pub psg_clock_hz: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            reference_pitch: 440.0,
            fm_clock_hz: 8_000_000,
            psg_clock_hz: 125_000,
        }
    }
}

impl Tuning {
    /// The same tuning with the reference pitch pulled in to
    /// [`MIN_REFERENCE_PITCH`]`..=`[`MAX_REFERENCE_PITCH`]. Anything that
    /// isn't a number at all falls back to 440Hz.
    pub fn clamped(self) -> Self {
        let reference_pitch = if self.reference_pitch.is_finite() {
            self.reference_pitch
                .clamp(MIN_REFERENCE_PITCH, MAX_REFERENCE_PITCH)
        } else {
            Tuning::default().reference_pitch
        };
        Self {
            reference_pitch,
            ..self
        }
    }
}

/// A YM2612 block and F-number pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FmPitch {
    pub block: u8,
    pub fnum: u16,
}

impl FmPitch {
    /// Packed register code, `block << 11 | fnum`. The high byte goes to the
    /// `0xA4` row and the low byte to `0xA0`.
    pub const fn code(self) -> u16 {
        (self.block as u16 & 0x07) << 11 | (self.fnum & FNUM_MASK)
    }

    pub const fn from_code(code: u16) -> Self {
        Self {
            block: (code >> 11) as u8 & 0x07,
            fnum: code & FNUM_MASK,
        }
    }

    pub const fn high(self) -> u8 {
        (self.code() >> 8) as u8
    }

    pub const fn low(self) -> u8 {
        self.code() as u8
    }
}

/// Translates MIDI keys in to chip pitch codes. Built once, then read only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyModel {
    table: [u16; NOTE_COUNT],
    /// `fm_clock / 512`
    fm_divisor: u32,
    /// `psg_clock × 72`
    psg_numerator: u64,
}

impl Default for FrequencyModel {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl FrequencyModel {
    /// The tuning is [clamped](Tuning::clamped) first
    pub fn new(tuning: Tuning) -> Self {
        let tuning = tuning.clamped();
        let mut table = [0u16; NOTE_COUNT];
        for (n, entry) in table.iter_mut().enumerate() {
            let pitch = tuning.reference_pitch * SEMITONE_RATIO.powi(n as i32 - A_INDEX);
            *entry = (FREQ_SCALE as f64 * pitch).round() as u16;
        }

        Self {
            table,
            fm_divisor: (tuning.fm_clock_hz / 512).max(1),
            psg_numerator: tuning.psg_clock_hz as u64 * FREQ_SCALE as u64,
        }
    }

    /// The twelve scaled semitones of octave 4, C first
    pub fn table(&self) -> &[u16; NOTE_COUNT] {
        &self.table
    }

    /// Scaled frequency of a key's semitone in octave 4
    pub fn entry(&self, key: u8) -> u16 {
        self.table[key as usize % NOTE_COUNT]
    }

    pub fn fm_pitch(&self, key: u8) -> FmPitch {
        let fnum = (self.entry(key) as u32) << 9;
        FmPitch {
            block: fm_block(key),
            fnum: (fnum / self.fm_divisor).min(FNUM_MASK as u32) as u16,
        }
    }

    pub fn psg_period(&self, key: u8) -> u16 {
        let entry = (self.entry(key) as u64).max(1);
        let octave = octave(key);
        let numerator = if octave < REFERENCE_OCTAVE {
            self.psg_numerator << (REFERENCE_OCTAVE - octave)
        } else {
            self.psg_numerator >> (octave - REFERENCE_OCTAVE)
        };

        let mut period = (numerator + entry / 2) / entry;
        while period > PSG_PERIOD_MAX as u64 {
            period >>= 1;
        }
        period.max(1) as u16
    }

    /// Every key with its FM code and PSG period
    pub fn dump(&self) -> impl Iterator<Item = (u8, FmPitch, u16)> + '_ {
        (0..=127u8).map(move |key| (key, self.fm_pitch(key), self.psg_period(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hand-built YM2612 code table for an 8MHz clock. It lets the block run
    /// past 7 for the top keys and repeats a value at 115, so only keys
    /// 12..=107 are comparable.
    const REFERENCE_CODES: [u16; 128] = [
        0x0269, 0x0269, 0x0269, 0x0269, 0x0269, 0x0269, 0x0269, 0x0269, 0x0269, 0x0269, 0x0269,
        0x0269, 0x0269, 0x028D, 0x02B4, 0x02DE, 0x0309, 0x0337, 0x0368, 0x039C, 0x03D3, 0x040E,
        0x044B, 0x048D, 0x0A69, 0x0A8D, 0x0AB4, 0x0ADE, 0x0B09, 0x0B37, 0x0B68, 0x0B9C, 0x0BD3,
        0x0C0E, 0x0C4B, 0x0C8D, 0x1269, 0x128D, 0x12B4, 0x12DE, 0x1309, 0x1337, 0x1368, 0x139C,
        0x13D3, 0x140E, 0x144B, 0x148D, 0x1A69, 0x1A8D, 0x1AB4, 0x1ADE, 0x1B09, 0x1B37, 0x1B68,
        0x1B9C, 0x1BD3, 0x1C0E, 0x1C4B, 0x1C8D, 0x2269, 0x228D, 0x22B4, 0x22DE, 0x2309, 0x2337,
        0x2368, 0x239C, 0x23D3, 0x240E, 0x244B, 0x248D, 0x2A69, 0x2A8D, 0x2AB4, 0x2ADE, 0x2B09,
        0x2B37, 0x2B68, 0x2B9C, 0x2BD3, 0x2C0E, 0x2C4B, 0x2C8D, 0x3269, 0x328D, 0x32B4, 0x32DE,
        0x3309, 0x3337, 0x3368, 0x339C, 0x33D3, 0x340E, 0x344B, 0x348D, 0x3A69, 0x3A8D, 0x3AB4,
        0x3ADE, 0x3B09, 0x3B37, 0x3B68, 0x3B9C, 0x3BD3, 0x3C0E, 0x3C4B, 0x3C8D, 0x4269, 0x428D,
        0x42B4, 0x42DE, 0x4309, 0x4337, 0x4368, 0x4368, 0x43D3, 0x440E, 0x444B, 0x448D, 0x4A69,
        0x4A8D, 0x4AB4, 0x4ADE, 0x4B09, 0x4B37, 0x4B68, 0x4B9C,
    ];

    #[test]
    fn table_is_increasing() {
        let model = FrequencyModel::default();
        let table = model.table();
        for pair in table.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(table[Note::A as usize], 31680);
        assert_eq!(table[Note::C as usize], 18837);
    }

    #[test]
    fn matches_reference_codes() {
        let model = FrequencyModel::default();
        for key in 12..=107u8 {
            assert_eq!(
                model.fm_pitch(key).code(),
                REFERENCE_CODES[key as usize],
                "key {key}"
            );
        }
    }

    #[test]
    fn octave_shares_entry() {
        let model = FrequencyModel::default();
        let c4 = model.fm_pitch(60);
        let c5 = model.fm_pitch(72);
        assert_eq!(model.entry(60), model.entry(72));
        assert_eq!(c4.fnum, c5.fnum);
        assert_eq!(c4.block, 4);
        assert_eq!(c5.block, 5);
    }

    #[test]
    fn block_is_clamped() {
        assert_eq!(fm_block(0), 0);
        assert_eq!(fm_block(11), 0);
        assert_eq!(fm_block(12), 0);
        assert_eq!(fm_block(107), 7);
        assert_eq!(fm_block(108), 7);
        assert_eq!(fm_block(127), 7);

        let model = FrequencyModel::default();
        assert!(model.dump().all(|(_, fm, _)| fm.block <= MAX_BLOCK));
    }

    #[test]
    fn model_is_pure() {
        let a = FrequencyModel::default();
        let b = FrequencyModel::new(Tuning::default());
        for key in 0..=127u8 {
            assert_eq!(a.fm_pitch(key), a.fm_pitch(key));
            assert_eq!(a.psg_period(key), a.psg_period(key));
            assert_eq!(a.fm_pitch(key), b.fm_pitch(key));
            assert_eq!(a.psg_period(key), b.psg_period(key));
        }
    }

    #[test]
    fn psg_periods() {
        let model = FrequencyModel::default();
        // 125kHz / 284 ≈ 440.1Hz
        assert_eq!(model.psg_period(69), 284);
        assert_eq!(model.psg_period(81), 142);
        assert_eq!(model.psg_period(48), 956);
        // C-1 is far too low, it comes out three octaves up
        assert_eq!(model.psg_period(0), 955);

        for (key, _, period) in model.dump() {
            assert!(period >= 1 && period <= PSG_PERIOD_MAX, "key {key}");
        }
    }

    #[test]
    fn psg_periods_fall_with_pitch() {
        let model = FrequencyModel::default();
        // Above C3 nothing needs folding, so each key is shorter than the last
        for key in 49..=127u8 {
            assert!(model.psg_period(key) <= model.psg_period(key - 1), "key {key}");
        }
    }

    #[test]
    fn code_round_trip() {
        let pitch = FmPitch {
            block: 4,
            fnum: 1038,
        };
        assert_eq!(pitch.code(), 0x240E);
        assert_eq!(pitch.high(), 0x24);
        assert_eq!(pitch.low(), 0x0E);
        assert_eq!(FmPitch::from_code(0x240E), pitch);
    }

    #[test]
    fn note_names() {
        assert_eq!(Note::from_key(60), Note::C);
        assert_eq!(Note::from_key(66), Note::Fs);
        assert_eq!(Note::Gf, Note::Fs);
        assert_eq!(Note::from_key(127), Note::G);
    }

    #[test]
    fn reference_pitch_is_clamped() {
        let at = |reference_pitch| {
            FrequencyModel::new(Tuning {
                reference_pitch,
                ..Tuning::default()
            })
        };
        assert_eq!(at(800.0), at(MAX_REFERENCE_PITCH));
        assert_eq!(at(0.0), at(MIN_REFERENCE_PITCH));
        assert_eq!(at(-10.0), at(MIN_REFERENCE_PITCH));
        assert_eq!(at(f64::NAN), FrequencyModel::default());
        assert_eq!(at(f64::INFINITY), FrequencyModel::default());

        for model in [at(800.0), at(0.0)] {
            for pair in model.table().windows(2) {
                assert!(pair[0] < pair[1]);
            }
            // F-numbers rise through the octave without wrapping
            for key in 61..=71u8 {
                assert!(model.fm_pitch(key).fnum > model.fm_pitch(key - 1).fnum, "key {key}");
            }
        }
    }

    #[test]
    fn fnum_saturates() {
        // A slow clock pushes the F-number past 11 bits
        let model = FrequencyModel::new(Tuning {
            fm_clock_hz: 4_000_000,
            ..Tuning::default()
        });
        assert_eq!(model.fm_pitch(71).fnum, FNUM_MASK);
    }

    #[test]
    fn retuned_reference() {
        let model = FrequencyModel::new(Tuning {
            reference_pitch: 432.0,
            ..Tuning::default()
        });
        assert_eq!(model.entry(69), 31104);
        assert!(model.fm_pitch(69).fnum < FrequencyModel::default().fm_pitch(69).fnum);
    }
}
