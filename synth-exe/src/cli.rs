use argh::FromArgs;
use midi::{BRIDGE_BAUD_RATE, MIDI_BAUD_RATE};
use std::str::FromStr;

/// Serial speed. Either a named preset or a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baud(pub u32);

impl FromStr for Baud {
    type Err = std::io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "midi" => Ok(Self(MIDI_BAUD_RATE)),
            "bridge" => Ok(Self(BRIDGE_BAUD_RATE)),
            other => other.parse().map(Self).map_err(|_| {
                std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "Invalid baud, use midi, bridge, or a number",
                )
            }),
        }
    }
}

/// Play MIDI on a YM2612 and an SN76489
#[derive(Debug, Clone, FromArgs)]
pub struct CLIOptions {
    /// verbose level: off, error, warn, info, debug, trace
    #[argh(option)]
    pub verbose: Option<log::LevelFilter>,
    /// serial port to read MIDI from
    #[argh(option, default = "Default::default()")]
    pub port: String,
    /// serial speed <midi, bridge> or a number. midi is 31250, bridge is
    /// 115200 for a USB serial MIDI bridge
    #[argh(option)]
    pub baud: Option<Baud>,
    /// read MIDI bytes from a file instead of the serial port, `-` for stdin
    #[argh(option)]
    pub input: Option<String>,
    /// frequency of A4 in Hz
    #[argh(option)]
    pub reference_pitch: Option<f64>,
    /// print the pitch code and PSG period of every key, then exit
    #[argh(option, default = "false")]
    pub dump_freqs: bool,
    /// print the chip registers when the input ends
    #[argh(option, default = "false")]
    pub dump_registers: bool,
}
