//! User configuration options.

use crate::cli::{Baud, CLIOptions};
use crate::BASE_DIR;
use dirs::config_dir;
use log::{error, info, warn};
use midi::MIDI_BAUD_RATE;
use nanoserde::{DeRon, SerRon};
use std::{
    fs::{File, OpenOptions, create_dir_all},
    io::{self, Read, Write},
    path::PathBuf,
};

const LOG_TAG: &str = "UserConfig";

fn get_cfg_file() -> io::Result<PathBuf> {
    let mut dir = config_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Couldn't find the user config dir")
    })?;
    dir.push(BASE_DIR);
    if !dir.exists() {
        create_dir_all(&dir)?;
    }
    dir.push("user.ron");
    Ok(dir)
}

#[derive(Debug, Clone, PartialEq, DeRon, SerRon)]
pub struct UserConfig {
    pub port: String,
    pub baud: u32,
    pub reference_pitch: f64,
    pub log_level: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud: MIDI_BAUD_RATE,
            reference_pitch: 440.0,
            log_level: log::LevelFilter::Info.to_string(),
        }
    }
}

impl UserConfig {
    /// Read the config, writing out a default one if it's missing or broken
    pub fn load() -> io::Result<Self> {
        let path = get_cfg_file()?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        let mut buf = String::new();
        if let Ok(read_len) = file.read_to_string(&mut buf) {
            if read_len == 0 {
                return UserConfig::create_default(&mut file);
            }
            if let Ok(data) = UserConfig::deserialize_ron(&buf) {
                info!(target: LOG_TAG, "Loaded user config file");
                return Ok(data);
            }
            warn!(target: LOG_TAG, "Could not deserialise {path:?} recreating config");
            file = File::create(&path)?;
        }
        UserConfig::create_default(&mut file)
    }

    fn create_default(file: &mut File) -> io::Result<Self> {
        let config = UserConfig::default();
        file.write_all(config.serialize_ron().as_bytes())?;
        info!(target: LOG_TAG, "Created default user config file");
        Ok(config)
    }

    pub fn write(&self) {
        let res = get_cfg_file()
            .and_then(File::create)
            .and_then(|mut file| file.write_all(self.serialize_ron().as_bytes()));
        if let Err(err) = res {
            error!(target: LOG_TAG, "Could not write config: {err}");
        }
    }

    /// Sync the CLI options and UserOptions with each other. Anything given
    /// on the command line wins and is remembered.
    pub fn sync_cli(&mut self, cli: &mut CLIOptions) {
        info!(target: LOG_TAG, "Checking CLI options");

        if !cli.port.is_empty() && cli.port != self.port {
            cli.port.clone_into(&mut self.port);
            info!(target: LOG_TAG, "Serial port changed to: {}", &cli.port);
        } else {
            self.port.clone_into(&mut cli.port);
        }

        if let Some(Baud(baud)) = cli.baud {
            self.baud = baud;
        } else {
            cli.baud = Some(Baud(self.baud));
        }

        if let Some(pitch) = cli.reference_pitch {
            self.reference_pitch = pitch;
        } else {
            cli.reference_pitch = Some(self.reference_pitch);
        }

        if let Some(level) = cli.verbose {
            self.log_level = level.to_string();
        } else {
            cli.verbose = self.log_level.parse().ok();
        }
    }
}
