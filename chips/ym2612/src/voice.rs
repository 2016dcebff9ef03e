use crate::{Field, Slot};

/// Envelope and tuning of one operator
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Operator {
    pub detune: u8,
    pub multiple: u8,
    pub total_level: u8,
    pub key_scale: u8,
    pub attack_rate: u8,
    pub amplitude_modulation: u8,
    pub decay_rate: u8,
    pub sustain_rate: u8,
    pub sustain_level: u8,
    pub release_rate: u8,
}

/// Everything that shapes the sound of a channel apart from its pitch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    /// Musical order, S1 first
    pub operators: [Operator; 4],
    pub feedback: u8,
    pub algorithm: u8,
    pub pan: u8,
    pub ams: u8,
    pub pms: u8,
}

const fn op(
    detune: u8,
    multiple: u8,
    total_level: u8,
    key_scale: u8,
    attack_rate: u8,
    decay_rate: u8,
    sustain_level: u8,
    release_rate: u8,
) -> Operator {
    Operator {
        detune,
        multiple,
        total_level,
        key_scale,
        attack_rate,
        amplitude_modulation: 0,
        decay_rate,
        sustain_rate: 2,
        sustain_level,
        release_rate,
    }
}

/// A plucked electric piano, loaded on every channel at startup
pub const DEFAULT_VOICE: Voice = Voice {
    operators: [
        op(7, 1, 35, 1, 31, 5, 1, 1),
        op(3, 3, 38, 1, 31, 5, 1, 1),
        op(0, 13, 45, 2, 25, 5, 1, 1),
        op(0, 1, 0, 2, 20, 7, 10, 6),
    ],
    feedback: 1,
    algorithm: 0,
    pan: 0b11,
    ams: 0,
    pms: 0,
};

impl Voice {
    /// Every field write needed to load the voice, in load order. Operator
    /// parameters go out a register at a time across all four operators,
    /// then the channel parameters.
    pub fn writes(&self) -> Vec<(Option<Slot>, Field, u8)> {
        type Get = fn(&Operator) -> u8;
        let per_slot: [(Field, Get); 10] = [
            (Field::Detune, |o| o.detune),
            (Field::Multiple, |o| o.multiple),
            (Field::TotalLevel, |o| o.total_level),
            (Field::KeyScale, |o| o.key_scale),
            (Field::AttackRate, |o| o.attack_rate),
            (Field::AmplitudeModulation, |o| o.amplitude_modulation),
            (Field::DecayRate, |o| o.decay_rate),
            (Field::SustainRate, |o| o.sustain_rate),
            (Field::SustainLevel, |o| o.sustain_level),
            (Field::ReleaseRate, |o| o.release_rate),
        ];

        let mut out = Vec::with_capacity(45);
        // Fields sharing a register are written back to back per operator
        let groups: [&[(Field, Get)]; 6] = [
            &per_slot[0..2],
            &per_slot[2..3],
            &per_slot[3..5],
            &per_slot[5..7],
            &per_slot[7..8],
            &per_slot[8..10],
        ];
        for group in groups {
            for slot in Slot::ALL {
                let operator = &self.operators[slot.number()];
                for (field, get) in group {
                    out.push((Some(slot), *field, get(operator)));
                }
            }
        }

        out.extend([
            (None, Field::Feedback, self.feedback),
            (None, Field::Algorithm, self.algorithm),
            (None, Field::Pan, self.pan),
            (None, Field::Ams, self.ams),
            (None, Field::Pms, self.pms),
        ]);
        out
    }
}
