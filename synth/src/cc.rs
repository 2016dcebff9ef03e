//! Control change numbers and what they set. Lookup goes global table first,
//! then channel, then operator, and the first hit wins. That means 92 and 93
//! are always globals even though they also appear in the operator table.

use ym2612::{Field, Slot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CcTarget {
    Global(Field),
    Channel(Field),
    Slot(Slot, Field),
    /// Reserved for features that don't exist yet. Accepted and ignored.
    Reserved,
}

pub const GLOBAL_CCS: [(u8, CcTarget); 12] = [
    (1, CcTarget::Global(Field::LfoFrequency)),
    (74, CcTarget::Global(Field::LfoEnable)),
    (80, CcTarget::Global(Field::SpecialMode)),
    (92, CcTarget::Global(Field::Test27Low)),
    (93, CcTarget::Global(Field::Test27High)),
    (94, CcTarget::Global(Field::Test20Low)),
    (95, CcTarget::Global(Field::Test20High)),
    (96, CcTarget::Global(Field::Test2CLow)),
    (97, CcTarget::Global(Field::Test2CHigh)),
    // Transpose
    (85, CcTarget::Reserved),
    // Octave division
    (84, CcTarget::Reserved),
    // PAL/NTSC
    (83, CcTarget::Reserved),
];

pub const CHANNEL_CCS: [(u8, CcTarget); 8] = [
    (14, CcTarget::Channel(Field::Algorithm)),
    (15, CcTarget::Channel(Field::Feedback)),
    (77, CcTarget::Channel(Field::Pan)),
    (76, CcTarget::Channel(Field::Ams)),
    (75, CcTarget::Channel(Field::Pms)),
    // Instrument store
    (6, CcTarget::Reserved),
    // Instrument recall
    (9, CcTarget::Reserved),
    // Pitch bend sensitivity
    (81, CcTarget::Reserved),
];

const fn slot_ccs(first: u8, field: Field) -> [(u8, CcTarget); 4] {
    [
        (first, CcTarget::Slot(Slot::S1, field)),
        (first + 1, CcTarget::Slot(Slot::S2, field)),
        (first + 2, CcTarget::Slot(Slot::S3, field)),
        (first + 3, CcTarget::Slot(Slot::S4, field)),
    ]
}

/// Each parameter takes four consecutive numbers, S1 first
pub const SLOT_CCS: [[(u8, CcTarget); 4]; 11] = [
    slot_ccs(90, Field::SsgEg),
    slot_ccs(16, Field::TotalLevel),
    slot_ccs(20, Field::Multiple),
    slot_ccs(24, Field::Detune),
    slot_ccs(39, Field::KeyScale),
    slot_ccs(43, Field::AttackRate),
    slot_ccs(47, Field::DecayRate),
    slot_ccs(51, Field::SustainRate),
    slot_ccs(55, Field::SustainLevel),
    slot_ccs(59, Field::ReleaseRate),
    slot_ccs(70, Field::AmplitudeModulation),
];

/// What a control change number sets, `None` if it isn't one of ours
pub fn lookup(cc: u8) -> Option<CcTarget> {
    GLOBAL_CCS
        .iter()
        .chain(CHANNEL_CCS.iter())
        .chain(SLOT_CCS.iter().flatten())
        .find(|(number, _)| *number == cc)
        .map(|(_, target)| *target)
}
