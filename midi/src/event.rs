pub const MIDI_NOTEOFF: u8 = 0x80; // + key + velocity
pub const MIDI_NOTEON: u8 = 0x90; // + key + velocity
pub const MIDI_AFTERTOUCH: u8 = 0xA0; // + key + pressure
pub const MIDI_CTRLCHANGE: u8 = 0xB0; // + ctrlr + value
pub const MIDI_PRGMCHANGE: u8 = 0xC0; // + new patch
pub const MIDI_CHANPRESSURE: u8 = 0xD0; // + pressure
pub const MIDI_PITCHBEND: u8 = 0xE0; // + pitch bend (2 bytes)
pub const MIDI_SYSTEM: u8 = 0xF0;

const SYSEX_START: u8 = 0xF0;
const TIME_CODE: u8 = 0xF1;
const SONG_POSITION: u8 = 0xF2;
const SONG_SELECT: u8 = 0xF3;

/// Is this a status byte? Status bytes have the top bit set.
#[inline]
pub const fn is_status(byte: u8) -> bool {
    byte & 0x80 != 0
}

/// Is this a data byte? Anything that isn't a status byte.
#[inline]
pub const fn is_data(byte: u8) -> bool {
    !is_status(byte)
}

/// The command nibble of a status byte
#[inline]
pub const fn to_command(status: u8) -> u8 {
    status & 0xF0
}

/// The channel nibble of a status byte
#[inline]
pub const fn to_channel(status: u8) -> u8 {
    status & 0x0F
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MidiKind {
    NoteOff,
    NoteOn,
    /// Polyphonic key pressure
    Aftertouch,
    ControlChange,
    ProgramChange,
    ChannelPressure,
    PitchBend,
    /// Any `0xF_` status. The low nibble is carried in `MidiEvent::channel`
    System,
}

impl MidiKind {
    pub const ALL: [MidiKind; 8] = [
        MidiKind::NoteOff,
        MidiKind::NoteOn,
        MidiKind::Aftertouch,
        MidiKind::ControlChange,
        MidiKind::ProgramChange,
        MidiKind::ChannelPressure,
        MidiKind::PitchBend,
        MidiKind::System,
    ];

    /// `None` if `byte` is a data byte
    pub const fn from_status(byte: u8) -> Option<Self> {
        if is_data(byte) {
            return None;
        }
        Some(match to_command(byte) {
            MIDI_NOTEOFF => MidiKind::NoteOff,
            MIDI_NOTEON => MidiKind::NoteOn,
            MIDI_AFTERTOUCH => MidiKind::Aftertouch,
            MIDI_CTRLCHANGE => MidiKind::ControlChange,
            MIDI_PRGMCHANGE => MidiKind::ProgramChange,
            MIDI_CHANPRESSURE => MidiKind::ChannelPressure,
            MIDI_PITCHBEND => MidiKind::PitchBend,
            _ => MidiKind::System,
        })
    }

    pub const fn command(self) -> u8 {
        match self {
            MidiKind::NoteOff => MIDI_NOTEOFF,
            MidiKind::NoteOn => MIDI_NOTEON,
            MidiKind::Aftertouch => MIDI_AFTERTOUCH,
            MidiKind::ControlChange => MIDI_CTRLCHANGE,
            MidiKind::ProgramChange => MIDI_PRGMCHANGE,
            MidiKind::ChannelPressure => MIDI_CHANPRESSURE,
            MidiKind::PitchBend => MIDI_PITCHBEND,
            MidiKind::System => MIDI_SYSTEM,
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Total packet length, status byte included, for a status byte. `None` means
/// the packet is not supported at all and should be skipped.
///
/// See <http://www.midi.org/techspecs/midimessages.php>
pub const fn packet_length(status: u8) -> Option<usize> {
    match MidiKind::from_status(status) {
        None => None,
        Some(MidiKind::ProgramChange | MidiKind::ChannelPressure) => Some(2),
        Some(MidiKind::System) => match status {
            TIME_CODE | SONG_SELECT => Some(2),
            SONG_POSITION => Some(3),
            // System exclusive has no fixed length
            SYSEX_START => None,
            // Tune request and realtime messages carry no data
            _ => Some(1),
        },
        Some(_) => Some(3),
    }
}

/// The set of commands a [`crate::MidiAssembler`] will assemble. Everything
/// else is skipped, data bytes and all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnabledCommands(u8);

impl EnabledCommands {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0xFF);

    pub const fn with(self, kind: MidiKind) -> Self {
        Self(self.0 | kind.bit())
    }

    pub const fn without(self, kind: MidiKind) -> Self {
        Self(self.0 & !kind.bit())
    }

    pub const fn contains(self, kind: MidiKind) -> bool {
        self.0 & kind.bit() != 0
    }
}

impl Default for EnabledCommands {
    /// Note off, note on, and control change. That's all the synth uses.
    fn default() -> Self {
        Self::NONE
            .with(MidiKind::NoteOff)
            .with(MidiKind::NoteOn)
            .with(MidiKind::ControlChange)
    }
}

/// A complete MIDI packet. Built on packet completion and consumed straight
/// away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEvent {
    pub kind: MidiKind,
    /// `0..=15`
    pub channel: u8,
    /// `0..=127`, zero if the packet has no first data byte
    pub data1: u8,
    /// `0..=127`, zero if the packet has no second data byte
    pub data2: u8,
}

impl MidiEvent {
    pub const fn new(kind: MidiKind, channel: u8, data1: u8, data2: u8) -> Self {
        Self {
            kind,
            channel: channel & 0x0F,
            data1: data1 & 0x7F,
            data2: data2 & 0x7F,
        }
    }

    /// The status byte this event was assembled from
    pub const fn status(&self) -> u8 {
        self.kind.command() | self.channel
    }

    pub const fn key(&self) -> u8 {
        self.data1
    }

    pub const fn velocity(&self) -> u8 {
        self.data2
    }

    pub const fn cc_number(&self) -> u8 {
        self.data1
    }

    pub const fn cc_value(&self) -> u8 {
        self.data2
    }
}
