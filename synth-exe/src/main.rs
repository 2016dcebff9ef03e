//! MegaSynth: plays a MIDI byte stream on a YM2612 and an SN76489.
//!
//! MIDI comes in from a serial port at the MIDI rate or from a USB serial
//! bridge, or is replayed from a file or stdin. Every chip write is logged
//! at trace level.

mod cli;
mod config;

use bus_nobus::TraceBus;
use cli::*;
use log::{debug, error, info, warn};
use midi::MidiAssembler;
use mimalloc::MiMalloc;
use pitch::{FrequencyModel, Tuning};
use simplelog::TermLogger;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::time::Duration;
use synth::MegaSynth;

use crate::config::UserConfig;

const BASE_DIR: &str = "megasynth/";
/// How long a serial read waits before the packet in progress is dropped
const READ_TIMEOUT: Duration = Duration::from_millis(100);

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

type Synth = MegaSynth<TraceBus, TraceBus>;

fn main() -> Result<(), Box<dyn Error>> {
    let mut options: CLIOptions = argh::from_env();

    // Loaded ahead of the logger as it can set the log level
    let mut user_config = UserConfig::load()?;
    user_config.sync_cli(&mut options);

    TermLogger::init(
        options.verbose.unwrap_or(log::LevelFilter::Info),
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;
    user_config.write();

    let tuning = Tuning {
        reference_pitch: options.reference_pitch.unwrap_or(440.0),
        ..Tuning::default()
    };
    if tuning.clamped() != tuning {
        warn!(
            "Reference pitch {} is out of range, using {}",
            tuning.reference_pitch,
            tuning.clamped().reference_pitch
        );
    }
    let model = FrequencyModel::new(tuning);

    if options.dump_freqs {
        dump_freqs(&model);
        return Ok(());
    }

    let mut synth = MegaSynth::new(TraceBus::new("YM2612"), TraceBus::new("SN76489"), model);
    synth.init()?;
    info!("Init YM2612 and SN76489");

    let mut assembler = MidiAssembler::new();
    match options.input.as_deref() {
        Some("-") => {
            info!("Reading MIDI from stdin");
            play_reader(&mut synth, &mut assembler, io::stdin().lock())?;
        }
        Some(path) => {
            info!("Reading MIDI from {path}");
            play_reader(&mut synth, &mut assembler, BufReader::new(File::open(path)?))?;
        }
        None => play_serial(&mut synth, &mut assembler, &options)?,
    }

    if options.dump_registers {
        dump_registers(&synth);
    }
    Ok(())
}

/// Play everything up to the end of the stream
fn play_reader(
    synth: &mut Synth,
    assembler: &mut MidiAssembler,
    reader: impl Read,
) -> Result<(), Box<dyn Error>> {
    for byte in reader.bytes() {
        if let Some(event) = assembler.feed_byte(byte?) {
            synth.handle(event);
        }
    }
    if !assembler.is_idle() {
        debug!("Input ended part way through a packet");
    }
    Ok(())
}

/// Play until the port goes away
fn play_serial(
    synth: &mut Synth,
    assembler: &mut MidiAssembler,
    options: &CLIOptions,
) -> Result<(), Box<dyn Error>> {
    if options.port.is_empty() {
        let ports: Vec<String> = serialport::available_ports()?
            .into_iter()
            .map(|p| p.port_name)
            .collect();
        error!("No serial port given, found: {}", ports.join(", "));
        return Err("no serial port, pass --port or --input".into());
    }

    let baud = options.baud.map_or(midi::MIDI_BAUD_RATE, |b| b.0);
    let mut port = serialport::new(&options.port, baud)
        .timeout(READ_TIMEOUT)
        .open()?;
    info!("Listening on {} at {baud} baud", options.port);

    let mut buf = [0u8; 64];
    loop {
        match port.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(len) => {
                for event in assembler.events(&buf[..len]) {
                    synth.handle(event);
                }
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                assembler.feed(Err::<u8, _>(e));
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
}

fn dump_freqs(model: &FrequencyModel) {
    println!("key  block  fnum   code    psg");
    for (key, pitch, period) in model.dump() {
        println!(
            "{key:>3}  {:>5}  {:>4}  {:#06X}  {period:>5}",
            pitch.block,
            pitch.fnum,
            pitch.code()
        );
    }
}

fn dump_registers(synth: &Synth) {
    println!("YM2612");
    for (bank, address, value) in synth.ym().registers() {
        println!("  {bank:?} {address:#04X} = {value:#04X}");
    }
    println!("SN76489");
    for (register, value) in synth.psg().registers().iter().enumerate() {
        println!("  r{register} = {value:#05X}");
    }
}
