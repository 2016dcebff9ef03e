//! Streaming MIDI packet assembly.
//!
//! MIDI arrives one byte at a time over a serial line that can glitch, drop
//! bytes, or be plugged in half way through a message. The [`MidiAssembler`]
//! is a two-state machine that turns that stream into complete [`MidiEvent`]s:
//!
//! ```text,ignore
//!              status byte (enabled command)
//!   ┌──────────────┐ ─────────────────────────> ┌──────────────┐
//!   │ AwaitStatus  │                            │  AwaitData   │ ──┐ data byte,
//!   └──────────────┘ <───────────────────────── └──────────────┘ <─┘ incomplete
//!          ▲           packet complete (event)         │
//!          │           read failure                    │ new status byte:
//!          │                                           │ drop partial packet,
//!          └───────────────────────────────────────────┘ restart from it
//! ```
//!
//! Nothing in here ever returns an error. A malformed or unsupported packet
//! only resets the machine so it is ready for the next status byte.
//!
//! ## Usage
//!
//! ```rust
//! use midi::{MidiAssembler, MidiKind};
//!
//! let mut assembler = MidiAssembler::new();
//! assert!(assembler.feed_byte(0x93).is_none());
//! assert!(assembler.feed_byte(60).is_none());
//! let event = assembler.feed_byte(100).unwrap();
//!
//! assert_eq!(event.kind, MidiKind::NoteOn);
//! assert_eq!(event.channel, 3);
//! assert_eq!(event.key(), 60);
//! assert_eq!(event.velocity(), 100);
//! ```

mod assembler;
mod event;

pub use assembler::*;
pub use event::*;

/// Standard MIDI electrical spec rate (1MHz / 32)
pub const MIDI_BAUD_RATE: u32 = 31_250;
/// Rate used when MIDI is bridged over a USB serial adapter by software
pub const BRIDGE_BAUD_RATE: u32 = 115_200;
