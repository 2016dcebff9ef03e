//! Named parameters of the register map. Most registers pack two or more
//! parameters in to one byte, so each parameter is described by the row it
//! lives in plus a bit span within that row's bytes.

/// How a row is repeated across the chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One byte for the whole chip, in part 1
    Global,
    /// One byte per channel
    Channel,
    /// One byte per operator of each channel
    Slot,
}

/// A run of registers sharing a base address. The name is the base address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Row {
    R20,
    R22,
    R27,
    R2C,
    A0,
    A4,
    B0,
    B4,
    /// Channel 3 special mode, per operator frequency. Part 1 only.
    A8,
    AC,
    R30,
    R40,
    R50,
    R60,
    R70,
    R80,
    R90,
}

impl Row {
    /// Shadow order
    pub const ALL: [Row; 17] = [
        Row::R20,
        Row::R22,
        Row::R27,
        Row::R2C,
        Row::A0,
        Row::A4,
        Row::B0,
        Row::B4,
        Row::A8,
        Row::AC,
        Row::R30,
        Row::R40,
        Row::R50,
        Row::R60,
        Row::R70,
        Row::R80,
        Row::R90,
    ];

    /// The rows that make up a channel's sound, frequency excluded
    pub const VOICE: [Row; 9] = [
        Row::R30,
        Row::R40,
        Row::R50,
        Row::R60,
        Row::R70,
        Row::R80,
        Row::R90,
        Row::B0,
        Row::B4,
    ];

    pub const fn address(self) -> u8 {
        match self {
            Row::R20 => 0x20,
            Row::R22 => 0x22,
            Row::R27 => 0x27,
            Row::R2C => 0x2C,
            Row::A0 => 0xA0,
            Row::A4 => 0xA4,
            Row::B0 => 0xB0,
            Row::B4 => 0xB4,
            Row::A8 => 0xA8,
            Row::AC => 0xAC,
            Row::R30 => 0x30,
            Row::R40 => 0x40,
            Row::R50 => 0x50,
            Row::R60 => 0x60,
            Row::R70 => 0x70,
            Row::R80 => 0x80,
            Row::R90 => 0x90,
        }
    }

    pub const fn scope(self) -> Scope {
        match self {
            Row::R20 | Row::R22 | Row::R27 | Row::R2C => Scope::Global,
            Row::A0 | Row::A4 | Row::B0 | Row::B4 | Row::A8 | Row::AC => Scope::Channel,
            _ => Scope::Slot,
        }
    }

    /// Channels the row exists for, zero for a global row
    pub const fn channels(self) -> u8 {
        match self {
            Row::A8 | Row::AC => 3,
            _ => match self.scope() {
                Scope::Global => 0,
                _ => 6,
            },
        }
    }

    /// Shadow bytes held for the row
    pub const fn len(self) -> usize {
        match self.scope() {
            Scope::Global => 1,
            Scope::Channel => self.channels() as usize,
            Scope::Slot => self.channels() as usize * 4,
        }
    }

    /// Shadow bytes per part
    pub const fn bank_stride(self) -> usize {
        match self.scope() {
            Scope::Global => 0,
            Scope::Channel => 3,
            Scope::Slot => 12,
        }
    }

    /// Position of the row's first byte in the shadow
    pub const fn offset(self) -> usize {
        let mut offset = 0;
        let mut i = 0;
        while i < Row::ALL.len() {
            let row = Row::ALL[i];
            if row as u8 == self as u8 {
                break;
            }
            offset += row.len();
            i += 1;
        }
        offset
    }
}

/// Where one parameter lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub row: Row,
    pub width: u8,
    pub shift: u8,
    pub scope: Scope,
}

const fn define_field(row: Row, width: u8, shift: u8) -> FieldDescriptor {
    FieldDescriptor {
        row,
        width,
        shift,
        scope: row.scope(),
    }
}

impl FieldDescriptor {
    /// Mask for a value of this width, unshifted
    pub const fn mask(&self) -> u8 {
        ((1u16 << self.width) - 1) as u8
    }

    /// The bits this field occupies in its register
    pub const fn span(&self) -> u8 {
        self.mask() << self.shift
    }

    /// Replace this field's bits in `byte`, leaving the others alone
    pub const fn merge(&self, byte: u8, value: u8) -> u8 {
        (byte & !self.span()) | (value & self.mask()) << self.shift
    }

    pub const fn extract(&self, byte: u8) -> u8 {
        (byte >> self.shift) & self.mask()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    // Global
    Test20Low,
    Test20High,
    LfoFrequency,
    LfoEnable,
    /// Timer load and enable bits of 0x27
    Test27Low,
    Test27High,
    /// Channel 3 per operator frequency
    SpecialMode,
    Test2CLow,
    Test2CHigh,

    // Channel
    FrequencyLow,
    /// F-number top bits and block together
    FrequencyHigh,
    Block,
    SpecialFrequencyLow,
    SpecialFrequencyHigh,
    Algorithm,
    Feedback,
    Pms,
    Ams,
    /// Left and right output enables
    Pan,

    // Slot
    Detune,
    Multiple,
    TotalLevel,
    KeyScale,
    AttackRate,
    AmplitudeModulation,
    DecayRate,
    SustainRate,
    SustainLevel,
    ReleaseRate,
    SsgEg,
}

impl Field {
    pub const ALL: [Field; 30] = [
        Field::Test20Low,
        Field::Test20High,
        Field::LfoFrequency,
        Field::LfoEnable,
        Field::Test27Low,
        Field::Test27High,
        Field::SpecialMode,
        Field::Test2CLow,
        Field::Test2CHigh,
        Field::FrequencyLow,
        Field::FrequencyHigh,
        Field::Block,
        Field::SpecialFrequencyLow,
        Field::SpecialFrequencyHigh,
        Field::Algorithm,
        Field::Feedback,
        Field::Pms,
        Field::Ams,
        Field::Pan,
        Field::Detune,
        Field::Multiple,
        Field::TotalLevel,
        Field::KeyScale,
        Field::AttackRate,
        Field::AmplitudeModulation,
        Field::DecayRate,
        Field::SustainRate,
        Field::SustainLevel,
        Field::ReleaseRate,
        Field::SsgEg,
    ];

    pub const fn descriptor(self) -> FieldDescriptor {
        match self {
            Field::Test20Low => define_field(Row::R20, 4, 0),
            Field::Test20High => define_field(Row::R20, 4, 4),
            Field::LfoFrequency => define_field(Row::R22, 3, 0),
            Field::LfoEnable => define_field(Row::R22, 1, 3),
            Field::Test27Low => define_field(Row::R27, 6, 0),
            Field::Test27High => define_field(Row::R27, 1, 6),
            Field::SpecialMode => define_field(Row::R27, 1, 7),
            Field::Test2CLow => define_field(Row::R2C, 4, 0),
            Field::Test2CHigh => define_field(Row::R2C, 4, 4),

            Field::FrequencyLow => define_field(Row::A0, 8, 0),
            Field::FrequencyHigh => define_field(Row::A4, 6, 0),
            Field::Block => define_field(Row::A4, 3, 3),
            Field::SpecialFrequencyLow => define_field(Row::A8, 8, 0),
            Field::SpecialFrequencyHigh => define_field(Row::AC, 6, 0),
            Field::Algorithm => define_field(Row::B0, 3, 0),
            Field::Feedback => define_field(Row::B0, 3, 3),
            Field::Pms => define_field(Row::B4, 3, 0),
            Field::Ams => define_field(Row::B4, 2, 4),
            Field::Pan => define_field(Row::B4, 2, 6),

            Field::Detune => define_field(Row::R30, 3, 4),
            Field::Multiple => define_field(Row::R30, 4, 0),
            Field::TotalLevel => define_field(Row::R40, 7, 0),
            Field::KeyScale => define_field(Row::R50, 2, 6),
            Field::AttackRate => define_field(Row::R50, 5, 0),
            Field::AmplitudeModulation => define_field(Row::R60, 1, 7),
            Field::DecayRate => define_field(Row::R60, 5, 0),
            Field::SustainRate => define_field(Row::R70, 5, 0),
            Field::SustainLevel => define_field(Row::R80, 4, 4),
            Field::ReleaseRate => define_field(Row::R80, 4, 0),
            Field::SsgEg => define_field(Row::R90, 4, 0),
        }
    }

    pub const fn scope(self) -> Scope {
        self.descriptor().scope
    }
}
