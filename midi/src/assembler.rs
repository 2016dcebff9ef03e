use log::{debug, trace};

use crate::event::{EnabledCommands, MidiEvent, MidiKind, is_status, packet_length};

const MIDI_PACKET_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitStatus,
    AwaitData,
}

/// Assembles a raw MIDI byte stream in to [`MidiEvent`]s.
///
/// Running status is not supported: every packet must start with its own
/// status byte, and data bytes seen while waiting for a status are dropped.
#[derive(Debug, Clone)]
pub struct MidiAssembler {
    packet: [u8; MIDI_PACKET_SIZE],
    /// Bytes stored so far, status included
    have: usize,
    /// Bytes required for the packet in progress
    need: usize,
    state: State,
    enabled: EnabledCommands,
}

impl Default for MidiAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl MidiAssembler {
    /// An assembler for note off, note on, and control change
    pub fn new() -> Self {
        Self::with_commands(EnabledCommands::default())
    }

    pub fn with_commands(enabled: EnabledCommands) -> Self {
        Self {
            packet: [0; MIDI_PACKET_SIZE],
            have: 0,
            need: 0,
            state: State::AwaitStatus,
            enabled,
        }
    }

    pub fn enabled(&self) -> EnabledCommands {
        self.enabled
    }

    /// `true` if no packet is in progress
    pub fn is_idle(&self) -> bool {
        self.state == State::AwaitStatus
    }

    fn reset(&mut self) {
        self.have = 0;
        self.state = State::AwaitStatus;
    }

    fn store(&mut self, byte: u8) {
        self.packet[self.have] = byte;
        self.have += 1;
    }

    fn packet_length(&self, status: u8) -> Option<usize> {
        let kind = MidiKind::from_status(status)?;
        if !self.enabled.contains(kind) {
            return None;
        }
        packet_length(status)
    }

    fn to_event(&self) -> MidiEvent {
        let status = self.packet[0];
        let data1 = if self.need > 1 { self.packet[1] } else { 0 };
        let data2 = if self.need > 2 { self.packet[2] } else { 0 };
        // Only ever called with a status byte in slot 0
        let kind = MidiKind::from_status(status).unwrap_or(MidiKind::System);
        MidiEvent::new(kind, status & 0x0F, data1, data2)
    }

    /// Feed the result of a serial read. A failed read aborts any packet in
    /// progress and the error itself is dropped.
    pub fn feed<E>(&mut self, input: Result<u8, E>) -> Option<MidiEvent> {
        match input {
            Ok(byte) => self.feed_byte(byte),
            Err(_) => {
                if self.state == State::AwaitData {
                    debug!("Read failed, dropping {} byte partial packet", self.have);
                }
                self.reset();
                None
            }
        }
    }

    /// Feed one byte. Returns the event if this byte completed a packet.
    pub fn feed_byte(&mut self, byte: u8) -> Option<MidiEvent> {
        if is_status(byte) {
            if self.state == State::AwaitData {
                debug!(
                    "Status {byte:#04X} interrupted packet {:#04X}, resyncing",
                    self.packet[0]
                );
            }
            self.reset();

            let Some(need) = self.packet_length(byte) else {
                trace!("Skipping unsupported status {byte:#04X}");
                return None;
            };
            self.store(byte);
            self.need = need;
            if self.have == self.need {
                self.reset();
                return Some(self.to_event());
            }
            self.state = State::AwaitData;
            return None;
        }

        if self.state == State::AwaitStatus {
            trace!("Skipping stray data byte {byte:#04X}");
            return None;
        }

        self.store(byte);
        if self.have == self.need {
            self.reset();
            return Some(self.to_event());
        }
        None
    }

    /// Feed a whole buffer, yielding each event as its packet completes
    pub fn events<'a>(&'a mut self, bytes: &'a [u8]) -> Events<'a> {
        Events {
            assembler: self,
            bytes: bytes.iter(),
        }
    }
}

/// Iterator returned by [`MidiAssembler::events`]
pub struct Events<'a> {
    assembler: &'a mut MidiAssembler,
    bytes: std::slice::Iter<'a, u8>,
}

impl Iterator for Events<'_> {
    type Item = MidiEvent;

    fn next(&mut self) -> Option<Self::Item> {
        for &byte in self.bytes.by_ref() {
            if let Some(event) = self.assembler.feed_byte(byte) {
                return Some(event);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(assembler: &mut MidiAssembler, bytes: &[u8]) -> Vec<MidiEvent> {
        assembler.events(bytes).collect()
    }

    #[test]
    fn note_on_whole_or_split() {
        for channel in 0..16u8 {
            for key in [0u8, 21, 60, 127] {
                let bytes = [0x90 | channel, key, 99];

                let mut whole = MidiAssembler::new();
                let events = collect(&mut whole, &bytes);
                assert_eq!(events.len(), 1);

                let mut split = MidiAssembler::new();
                assert!(split.feed_byte(bytes[0]).is_none());
                assert!(split.feed_byte(bytes[1]).is_none());
                let event = split.feed_byte(bytes[2]).unwrap();

                assert_eq!(events[0], event);
                assert_eq!(event.kind, MidiKind::NoteOn);
                assert_eq!(event.channel, channel);
                assert_eq!(event.key(), key);
                assert_eq!(event.velocity(), 99);
                assert!(split.is_idle());
            }
        }
    }

    #[test]
    fn early_status_resyncs() {
        let mut assembler = MidiAssembler::new();
        // Note on loses its velocity byte, CC follows straight after
        let events = collect(&mut assembler, &[0x91, 64, 0xB2, 74, 3]);
        assert_eq!(events, vec![MidiEvent::new(MidiKind::ControlChange, 2, 74, 3)]);
    }

    #[test]
    fn read_failure_aborts_packet() {
        let mut assembler = MidiAssembler::new();
        assert!(assembler.feed::<()>(Ok(0x90)).is_none());
        assert!(assembler.feed::<()>(Ok(60)).is_none());
        assert!(assembler.feed::<()>(Err(())).is_none());
        assert!(assembler.is_idle());
        // The velocity byte is now a stray data byte
        assert!(assembler.feed::<()>(Ok(100)).is_none());

        let event = collect(&mut assembler, &[0x80, 60, 0]);
        assert_eq!(event, vec![MidiEvent::new(MidiKind::NoteOff, 0, 60, 0)]);
    }

    #[test]
    fn stray_data_is_ignored() {
        let mut assembler = MidiAssembler::new();
        let events = collect(&mut assembler, &[1, 2, 3, 0x95, 10, 20, 30]);
        assert_eq!(events, vec![MidiEvent::new(MidiKind::NoteOn, 5, 10, 20)]);
        assert!(assembler.is_idle());
    }

    #[test]
    fn disabled_commands_skip_their_data() {
        let mut assembler = MidiAssembler::new();
        // Program change, pitch bend, then a real note off
        let events = collect(&mut assembler, &[0xC0, 5, 0xE0, 0x00, 0x40, 0x83, 61, 10]);
        assert_eq!(events, vec![MidiEvent::new(MidiKind::NoteOff, 3, 61, 10)]);
    }

    #[test]
    fn optional_commands() {
        let enabled = EnabledCommands::default()
            .with(MidiKind::PitchBend)
            .with(MidiKind::ProgramChange)
            .with(MidiKind::System);
        let mut assembler = MidiAssembler::with_commands(enabled);

        let events = collect(&mut assembler, &[0xC0, 5, 0xE1, 0x00, 0x40, 0xF8, 0xF3, 7]);
        assert_eq!(
            events,
            vec![
                MidiEvent::new(MidiKind::ProgramChange, 0, 5, 0),
                MidiEvent::new(MidiKind::PitchBend, 1, 0x00, 0x40),
                MidiEvent::new(MidiKind::System, 8, 0, 0),
                MidiEvent::new(MidiKind::System, 3, 7, 0),
            ]
        );
    }

    #[test]
    fn sysex_is_dropped() {
        let enabled = EnabledCommands::default().with(MidiKind::System);
        let mut assembler = MidiAssembler::with_commands(enabled);
        let events = collect(&mut assembler, &[0xF0, 0x43, 0x10, 0x7F, 0xF7, 0x90, 1, 2]);
        // 0xF7 ends the exclusive and is a 1-byte system message itself
        assert_eq!(
            events,
            vec![
                MidiEvent::new(MidiKind::System, 7, 0, 0),
                MidiEvent::new(MidiKind::NoteOn, 0, 1, 2),
            ]
        );
    }

    #[test]
    fn back_to_back_packets() {
        let mut assembler = MidiAssembler::new();
        let bytes = [0x90, 60, 100, 0x90, 64, 100, 0x80, 60, 0, 0x80, 64, 0];
        let events = collect(&mut assembler, &bytes);
        assert_eq!(events.len(), 4);
        assert_eq!(events[3], MidiEvent::new(MidiKind::NoteOff, 0, 64, 0));
    }
}
