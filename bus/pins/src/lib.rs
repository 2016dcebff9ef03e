//! Bit-banged parallel buses for a YM2612 and an SN76489 wired straight to
//! GPIO. Generic over `embedded-hal` output pins and delay so the same code
//! runs on any board with eleven spare pins for the FM chip and ten for the
//! PSG (the data lines can be shared).
//!
//! Every register write is two strobes, the address then the data, and the
//! chip latches garbage if anything else drives the bus between them. Each
//! transaction runs inside an [`Interrupts`] guard supplied by the board.

use bus_traits::{Bank, BusError, BusTiming, FmBus, PsgBus};
use embedded_hal::{delay::DelayNs, digital::OutputPin};
use log::debug;
use std::time::Duration;

const LOG_TAG: &str = "PinBus";

/// Keeps anything else off the bus for the length of one transaction. On a
/// microcontroller this masks interrupts; the handlers that feed the MIDI
/// buffer must not run half way through a register write.
pub trait Interrupts {
    fn free<R>(&mut self, f: impl FnOnce() -> R) -> R;
}

/// For boards where nothing else can touch the bus
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGuard;

impl Interrupts for NoGuard {
    fn free<R>(&mut self, f: impl FnOnce() -> R) -> R {
        f()
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool, name: &'static str) -> Result<(), BusError> {
    let res = if high { pin.set_high() } else { pin.set_low() };
    res.map_err(|_| BusError::Pin(name))
}

fn wait<D: DelayNs>(delay: &mut D, time: Duration) {
    if !time.is_zero() {
        delay.delay_ns(time.as_nanos().min(u32::MAX as u128) as u32);
    }
}

/// Eight data lines, D0 first
pub struct DataBus<P> {
    pins: [P; 8],
}

impl<P: OutputPin> DataBus<P> {
    pub fn new(pins: [P; 8]) -> Self {
        Self { pins }
    }

    pub fn write_u8(&mut self, byte: u8) -> Result<(), BusError> {
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            drive(pin, byte & (1 << bit) != 0, "D")?;
        }
        Ok(())
    }
}

/// Control lines of the YM2612. `/RD` is tied high, the chip is never read.
pub struct FmPins<P> {
    /// `/CS`
    pub cs: P,
    /// `/WR`
    pub wr: P,
    /// Low selects an address, high selects data
    pub a0: P,
    /// Low for part 1, high for part 2
    pub a1: P,
    /// `/IC` reset
    pub ic: P,
}

struct FmLines<P, D> {
    data: DataBus<P>,
    pins: FmPins<P>,
    delay: D,
    timing: BusTiming,
}

impl<P: OutputPin, D: DelayNs> FmLines<P, D> {
    fn idle(&mut self) -> Result<(), BusError> {
        drive(&mut self.pins.ic, true, "IC")?;
        drive(&mut self.pins.cs, true, "CS")?;
        drive(&mut self.pins.wr, true, "WR")?;
        drive(&mut self.pins.a0, false, "A0")?;
        drive(&mut self.pins.a1, false, "A1")
    }

    fn strobe(&mut self, byte: u8) -> Result<(), BusError> {
        drive(&mut self.pins.cs, false, "CS")?;
        self.data.write_u8(byte)?;
        wait(&mut self.delay, self.timing.setup);
        drive(&mut self.pins.wr, false, "WR")?;
        wait(&mut self.delay, self.timing.pulse);
        drive(&mut self.pins.wr, true, "WR")?;
        wait(&mut self.delay, self.timing.hold);
        drive(&mut self.pins.cs, true, "CS")
    }

    fn set_register(&mut self, bank: Bank, address: u8, data: u8) -> Result<(), BusError> {
        drive(&mut self.pins.a1, bank.a1(), "A1")?;
        drive(&mut self.pins.a0, false, "A0")?;
        self.strobe(address)?;
        drive(&mut self.pins.a0, true, "A0")?;
        self.strobe(data)
    }

    fn reset(&mut self) -> Result<(), BusError> {
        drive(&mut self.pins.ic, false, "IC")?;
        wait(&mut self.delay, self.timing.reset);
        drive(&mut self.pins.ic, true, "IC")?;
        wait(&mut self.delay, self.timing.reset);
        Ok(())
    }
}

/// YM2612 on GPIO
pub struct PinFmBus<P, D, G> {
    lines: FmLines<P, D>,
    guard: G,
}

impl<P: OutputPin, D: DelayNs, G: Interrupts> PinFmBus<P, D, G> {
    /// Takes the pins and drives them to their idle levels
    pub fn new(
        data: [P; 8],
        pins: FmPins<P>,
        delay: D,
        guard: G,
        timing: BusTiming,
    ) -> Result<Self, BusError> {
        let mut lines = FmLines {
            data: DataBus::new(data),
            pins,
            delay,
            timing,
        };
        lines.idle()?;
        debug!(target: LOG_TAG, "FM bus ready, {:?} per write", timing.fm_write());
        Ok(Self { lines, guard })
    }

    /// Give the pins back
    pub fn release(self) -> ([P; 8], FmPins<P>, D, G) {
        (
            self.lines.data.pins,
            self.lines.pins,
            self.lines.delay,
            self.guard,
        )
    }
}

impl<P: OutputPin, D: DelayNs, G: Interrupts> FmBus for PinFmBus<P, D, G> {
    fn write(&mut self, bank: Bank, address: u8, data: u8) -> Result<(), BusError> {
        let lines = &mut self.lines;
        self.guard.free(|| lines.set_register(bank, address, data))
    }

    fn reset(&mut self) -> Result<(), BusError> {
        self.lines.reset()
    }
}

/// Control lines of the SN76489
pub struct PsgPins<P> {
    /// `/WE`
    pub we: P,
    /// `/CE`
    pub ce: P,
}

struct PsgLines<P, D> {
    data: DataBus<P>,
    pins: PsgPins<P>,
    delay: D,
    timing: BusTiming,
}

impl<P: OutputPin, D: DelayNs> PsgLines<P, D> {
    fn idle(&mut self) -> Result<(), BusError> {
        drive(&mut self.pins.we, true, "WE")?;
        drive(&mut self.pins.ce, true, "CE")
    }

    fn latch(&mut self, byte: u8) -> Result<(), BusError> {
        self.data.write_u8(byte)?;
        drive(&mut self.pins.we, false, "WE")?;
        drive(&mut self.pins.ce, false, "CE")?;
        // The chip holds READY low for 32 clocks while it takes the byte
        wait(&mut self.delay, self.timing.psg_pulse);
        drive(&mut self.pins.ce, true, "CE")?;
        drive(&mut self.pins.we, true, "WE")
    }
}

/// SN76489 on GPIO
pub struct PinPsgBus<P, D, G> {
    lines: PsgLines<P, D>,
    guard: G,
}

impl<P: OutputPin, D: DelayNs, G: Interrupts> PinPsgBus<P, D, G> {
    pub fn new(
        data: [P; 8],
        pins: PsgPins<P>,
        delay: D,
        guard: G,
        timing: BusTiming,
    ) -> Result<Self, BusError> {
        let mut lines = PsgLines {
            data: DataBus::new(data),
            pins,
            delay,
            timing,
        };
        lines.idle()?;
        Ok(Self { lines, guard })
    }

    pub fn release(self) -> ([P; 8], PsgPins<P>, D, G) {
        (
            self.lines.data.pins,
            self.lines.pins,
            self.lines.delay,
            self.guard,
        )
    }
}

impl<P: OutputPin, D: DelayNs, G: Interrupts> PsgBus for PinPsgBus<P, D, G> {
    fn write(&mut self, data: &[u8]) -> Result<(), BusError> {
        let lines = &mut self.lines;
        self.guard.free(|| -> Result<(), BusError> {
            for &byte in data {
                lines.latch(byte)?;
            }
            Ok(())
        })
    }
}
