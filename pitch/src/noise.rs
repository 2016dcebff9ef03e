use crate::NOTE_COUNT;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseFeedback {
    /// Short repeating pattern, sounds buzzy and tonal
    Periodic = 0,
    White = 1,
}

/// Noise shift rate. The first three divide the master clock, the last
/// follows the tone 3 period so the noise can be pitched.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftRate {
    Shift512 = 0,
    Shift1024 = 1,
    Shift2048 = 2,
    Channel3 = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoiseMode {
    pub feedback: NoiseFeedback,
    pub rate: ShiftRate,
}

impl NoiseMode {
    pub const fn new(feedback: NoiseFeedback, rate: ShiftRate) -> Self {
        Self { feedback, rate }
    }

    /// The noise control register value, `FB << 2 | NF`
    pub const fn bits(self) -> u8 {
        (self.feedback as u8) << 2 | self.rate as u8
    }
}

const fn periodic(rate: ShiftRate) -> NoiseMode {
    NoiseMode::new(NoiseFeedback::Periodic, rate)
}

const fn white(rate: ShiftRate) -> NoiseMode {
    NoiseMode::new(NoiseFeedback::White, rate)
}

/// Noise mode per semitone, C first
pub const NOISE_TABLE: [NoiseMode; NOTE_COUNT] = [
    periodic(ShiftRate::Shift512),
    periodic(ShiftRate::Shift1024),
    periodic(ShiftRate::Shift2048),
    periodic(ShiftRate::Channel3),
    periodic(ShiftRate::Channel3),
    white(ShiftRate::Shift512),
    white(ShiftRate::Shift1024),
    white(ShiftRate::Shift2048),
    white(ShiftRate::Channel3),
    white(ShiftRate::Channel3),
    white(ShiftRate::Channel3),
    white(ShiftRate::Channel3),
];

/// The noise mode played by a key on the noise channel. Only the semitone
/// matters.
#[inline]
pub const fn noise_for_key(key: u8) -> NoiseMode {
    NOISE_TABLE[key as usize % NOTE_COUNT]
}
