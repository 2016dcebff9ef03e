use bus_nobus::{BusWrite, RecordingBus};
use bus_traits::Bank;
use midi::{EnabledCommands, MidiAssembler, MidiEvent, MidiKind};
use pitch::FrequencyModel;
use sn76489::PsgChannel;
use ym2612::{Field, Slot, SlotMask};

use crate::{ChannelRole, MegaSynth};

type TestSynth = MegaSynth<RecordingBus, RecordingBus>;

/// Initialised, with the start up writes cleared away
fn synth() -> TestSynth {
    let mut synth = MegaSynth::new(
        RecordingBus::new(),
        RecordingBus::new(),
        FrequencyModel::default(),
    );
    synth.init().unwrap();
    clear(&mut synth);
    synth
}

fn clear(synth: &mut TestSynth) {
    synth.ym_mut().bus_mut().clear();
    synth.psg_mut().bus_mut().clear();
}

fn play(synth: &mut TestSynth, bytes: &[u8]) {
    let mut assembler = MidiAssembler::new();
    for event in assembler.events(bytes) {
        synth.handle(event);
    }
}

fn fm(synth: &TestSynth) -> Vec<(Bank, u8, u8)> {
    synth.ym().bus().fm_writes()
}

fn psg(synth: &TestSynth) -> Vec<Vec<u8>> {
    synth.psg().bus().psg_writes()
}

#[test]
fn init_brings_both_chips_up() {
    let mut synth = MegaSynth::new(
        RecordingBus::new(),
        RecordingBus::new(),
        FrequencyModel::default(),
    );
    synth.init().unwrap();
    assert_eq!(synth.ym().bus().log()[0], BusWrite::FmReset);
    assert_eq!(psg(&synth).len(), 4);
    for channel in PsgChannel::ALL {
        assert_eq!(synth.psg().attenuation(channel), 15);
    }
}

#[test]
fn fm_note_on_and_off() {
    let mut synth = synth();
    play(&mut synth, &[0x90, 69, 100]);
    assert_eq!(
        fm(&synth),
        vec![
            (Bank::Part1, 0xA4, 0x24),
            (Bank::Part1, 0xA0, 0x0E),
            // Carrier level, 127 - 100
            (Bank::Part1, 0x4C, 27),
            (Bank::Part1, 0x28, 0x00),
            (Bank::Part1, 0x28, 0xF0),
        ]
    );
    assert!(psg(&synth).is_empty());

    clear(&mut synth);
    play(&mut synth, &[0x80, 69, 0]);
    assert_eq!(fm(&synth), vec![(Bank::Part1, 0x28, 0x00)]);
    assert_eq!(synth.ym().keys(0), Some(SlotMask::NONE));
}

#[test]
fn fm_part_two() {
    let mut synth = synth();
    play(&mut synth, &[0x95, 60, 127]);
    let writes = fm(&synth);
    assert_eq!(writes[0], (Bank::Part2, 0xA6, 0x22));
    assert_eq!(writes[2], (Bank::Part2, 0x4E, 0));
    assert_eq!(writes[4], (Bank::Part1, 0x28, 0xF6));
    assert_eq!(synth.ym().field(5, None, Field::Block), Ok(4));
}

#[test]
fn zero_velocity_is_note_off() {
    let mut synth = synth();
    play(&mut synth, &[0x92, 64, 90]);
    clear(&mut synth);
    play(&mut synth, &[0x92, 64, 0]);
    assert_eq!(fm(&synth), vec![(Bank::Part1, 0x28, 0x02)]);

    play(&mut synth, &[0x96, 64, 0]);
    assert_eq!(psg(&synth), vec![vec![0x9F]]);
}

#[test]
fn psg_tone() {
    let mut synth = synth();
    play(&mut synth, &[0x97, 69, 127]);
    assert_eq!(psg(&synth), vec![vec![0xAC, 0x11], vec![0xB0]]);
    assert!(fm(&synth).is_empty());
    assert_eq!(synth.psg().period(PsgChannel::Tone2), Some(284));

    clear(&mut synth);
    play(&mut synth, &[0x87, 69, 64]);
    assert_eq!(psg(&synth), vec![vec![0xBF]]);
}

#[test]
fn psg_low_note_folds_up() {
    let mut synth = synth();
    play(&mut synth, &[0x98, 0, 127]);
    let period = synth.psg().period(PsgChannel::Tone3).unwrap();
    assert!(period <= 0x3FF);
    assert_eq!(period, synth.model().psg_period(0));
}

#[test]
fn psg_noise() {
    let mut synth = synth();
    play(&mut synth, &[0x99, 66, 64]);
    // White noise at 1024, attenuation 7
    assert_eq!(psg(&synth), vec![vec![0xE5], vec![0xF7]]);

    clear(&mut synth);
    play(&mut synth, &[0x99, 48, 127, 0x89, 48, 0]);
    assert_eq!(psg(&synth), vec![vec![0xE0], vec![0xF0], vec![0xFF]]);
}

#[test]
fn special_mode_pitch_only() {
    let mut synth = synth();
    for (status, high, low) in [(0x9A, 0xAD, 0xA9), (0x9B, 0xAE, 0xAA), (0x9C, 0xAC, 0xA8)] {
        clear(&mut synth);
        play(&mut synth, &[status, 69, 127]);
        assert_eq!(
            fm(&synth),
            vec![(Bank::Part1, high, 0x24), (Bank::Part1, low, 0x0E)],
            "status {status:#04X}"
        );
        assert!(psg(&synth).is_empty());
    }

    clear(&mut synth);
    play(&mut synth, &[0x8A, 69, 0, 0x8B, 69, 0, 0x8C, 69, 0]);
    assert!(fm(&synth).is_empty());
}

#[test]
fn special_channels_follow_operator_order() {
    assert_eq!(ChannelRole::of(10), ChannelRole::Special(Slot::S1));
    assert_eq!(ChannelRole::of(11), ChannelRole::Special(Slot::S2));
    assert_eq!(ChannelRole::of(12), ChannelRole::Special(Slot::S3));
}

#[test]
fn unused_channels_do_nothing() {
    let mut synth = synth();
    for channel in 13..16u8 {
        play(&mut synth, &[0x90 | channel, 60, 100, 0x80 | channel, 60, 0]);
    }
    assert!(synth.ym().bus().is_empty());
    assert!(synth.psg().bus().is_empty());
}

#[test]
fn unknown_cc_writes_nothing() {
    let mut synth = synth();
    play(&mut synth, &[0xB0, 2, 64, 0xB3, 100, 1, 0xB0, 84, 1, 0xB1, 9, 3]);
    assert!(synth.ym().bus().is_empty());
    assert!(synth.psg().bus().is_empty());
}

#[test]
fn channel_cc() {
    let mut synth = synth();
    // Algorithm 5 keeps the default feedback of 1
    play(&mut synth, &[0xB4, 14, 5]);
    assert_eq!(fm(&synth), vec![(Bank::Part2, 0xB1, 0x0D)]);

    clear(&mut synth);
    // Pan left only
    play(&mut synth, &[0xB0, 77, 2]);
    assert_eq!(fm(&synth), vec![(Bank::Part1, 0xB4, 0x80)]);
}

#[test]
fn slot_cc() {
    let mut synth = synth();
    play(&mut synth, &[0xB1, 19, 50]);
    assert_eq!(fm(&synth), vec![(Bank::Part1, 0x4D, 50)]);
    assert_eq!(synth.ym().field(1, Some(Slot::S4), Field::TotalLevel), Ok(50));

    clear(&mut synth);
    // S2 detune, beside a multiple of 3
    play(&mut synth, &[0xB2, 25, 1]);
    assert_eq!(fm(&synth), vec![(Bank::Part1, 0x3A, 0x13)]);
}

#[test]
fn global_cc_beats_slot_cc() {
    let mut synth = synth();
    play(&mut synth, &[0xB0, 92, 0x3F]);
    assert_eq!(fm(&synth), vec![(Bank::Part1, 0x27, 0x3F)]);
    assert_eq!(synth.ym().field(0, Some(Slot::S3), Field::SsgEg), Ok(0));
}

#[test]
fn global_cc_from_any_channel() {
    let mut synth = synth();
    play(&mut synth, &[0xB9, 74, 127, 0xBF, 1, 5]);
    assert_eq!(
        fm(&synth),
        vec![(Bank::Part1, 0x22, 0x08), (Bank::Part1, 0x22, 0x0D)]
    );
}

#[test]
fn fm_cc_on_psg_channel_is_dropped() {
    let mut synth = synth();
    play(&mut synth, &[0xB7, 14, 3, 0xBA, 16, 3]);
    assert!(synth.ym().bus().is_empty());
}

#[test]
fn noisy_stream() {
    let mut synth = synth();
    // Stray data, a cut off note on, then a clean one
    play(&mut synth, &[64, 100, 0x90, 60, 0x90, 69, 100]);
    let writes = fm(&synth);
    assert_eq!(writes.len(), 5);
    assert_eq!(writes[0], (Bank::Part1, 0xA4, 0x24));
}

#[test]
fn other_events_are_ignored() {
    let mut synth = synth();
    synth.handle(MidiEvent::new(MidiKind::PitchBend, 0, 0, 0x7F));
    synth.handle(MidiEvent::new(MidiKind::ProgramChange, 3, 4, 0));

    let mut assembler = MidiAssembler::with_commands(EnabledCommands::ALL);
    for event in assembler.events(&[0xE0, 0, 0x40, 0xD1, 20, 0xF8]) {
        synth.handle(event);
    }
    assert!(synth.ym().bus().is_empty());
    assert!(synth.psg().bus().is_empty());
}
