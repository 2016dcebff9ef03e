//! Buses with no chip on the end. Used on a host to run the synth without
//! hardware, and by tests to see exactly what would have gone out.

use bus_traits::{Bank, BusError, FmBus, PsgBus};
use log::{info, trace};

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBus;

impl FmBus for NullBus {
    fn write(&mut self, _: Bank, _: u8, _: u8) -> Result<(), BusError> {
        Ok(())
    }

    fn reset(&mut self) -> Result<(), BusError> {
        Ok(())
    }
}

impl PsgBus for NullBus {
    fn write(&mut self, _: &[u8]) -> Result<(), BusError> {
        Ok(())
    }
}

/// Logs every transaction at trace level and keeps a count
#[derive(Debug, Clone)]
pub struct TraceBus {
    tag: &'static str,
    writes: usize,
}

impl TraceBus {
    pub fn new(tag: &'static str) -> Self {
        Self { tag, writes: 0 }
    }

    /// Transactions seen since creation, resets included
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Drop for TraceBus {
    fn drop(&mut self) {
        info!(target: self.tag, "Closing bus after {} transactions", self.writes);
    }
}

impl FmBus for TraceBus {
    fn write(&mut self, bank: Bank, address: u8, data: u8) -> Result<(), BusError> {
        self.writes += 1;
        trace!(target: self.tag, "part {} {address:#04X} <- {data:#04X}", bank.index() + 1);
        Ok(())
    }

    fn reset(&mut self) -> Result<(), BusError> {
        self.writes += 1;
        trace!(target: self.tag, "reset");
        Ok(())
    }
}

impl PsgBus for TraceBus {
    fn write(&mut self, data: &[u8]) -> Result<(), BusError> {
        self.writes += 1;
        trace!(target: self.tag, "latch {data:02X?}");
        Ok(())
    }
}

/// One recorded transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusWrite {
    Fm { bank: Bank, address: u8, data: u8 },
    FmReset,
    Psg(Vec<u8>),
}

/// Keeps every transaction in order so they can be inspected afterwards
#[derive(Debug, Default, Clone)]
pub struct RecordingBus {
    log: Vec<BusWrite>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> &[BusWrite] {
        &self.log
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }

    /// Hand back the log so far and start a new one
    pub fn take(&mut self) -> Vec<BusWrite> {
        std::mem::take(&mut self.log)
    }

    /// The FM register writes only, as `(bank, address, data)`
    pub fn fm_writes(&self) -> Vec<(Bank, u8, u8)> {
        self.log
            .iter()
            .filter_map(|w| match *w {
                BusWrite::Fm {
                    bank,
                    address,
                    data,
                } => Some((bank, address, data)),
                _ => None,
            })
            .collect()
    }

    /// The PSG transactions only
    pub fn psg_writes(&self) -> Vec<Vec<u8>> {
        self.log
            .iter()
            .filter_map(|w| match w {
                BusWrite::Psg(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }
}

impl FmBus for RecordingBus {
    fn write(&mut self, bank: Bank, address: u8, data: u8) -> Result<(), BusError> {
        self.log.push(BusWrite::Fm {
            bank,
            address,
            data,
        });
        Ok(())
    }

    fn reset(&mut self) -> Result<(), BusError> {
        self.log.push(BusWrite::FmReset);
        Ok(())
    }
}

impl PsgBus for RecordingBus {
    fn write(&mut self, data: &[u8]) -> Result<(), BusError> {
        self.log.push(BusWrite::Psg(data.to_vec()));
        Ok(())
    }
}
