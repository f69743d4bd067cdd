use anyhow::Result;
use serde::{Deserialize, Serialize};

use std::fs::{File, create_dir_all};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use crate::util::export::raster::{CommandRasterizer, DEFAULT_RASTERIZER_COMMAND, Settle};
use crate::util::export::{DEFAULT_SCALE, DEFAULT_SETTLE_DELAY};

const APP_NAME: &str = "billpress";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub(crate) struct Config {
    pub(crate) output_folder: Option<PathBuf>,
    pub(crate) file_open_command: Option<String>,
    pub(crate) open_after_save: bool,
    pub(crate) rasterizer_command: String,
    pub(crate) rasterizer_args: Vec<String>,
    pub(crate) scale: u32,
    pub(crate) settle_delay_ms: u64,
    pub(crate) wait_for_load: bool,
    pub(crate) strict_totals: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_folder: None,
            file_open_command: None,
            open_after_save: false,
            rasterizer_command: String::from(DEFAULT_RASTERIZER_COMMAND),
            rasterizer_args: vec![],
            scale: DEFAULT_SCALE,
            settle_delay_ms: DEFAULT_SETTLE_DELAY.as_millis() as u64,
            wait_for_load: false,
            strict_totals: false,
        }
    }
}

impl Config {
    pub(crate) fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub(crate) fn rasterizer(&self) -> CommandRasterizer {
        CommandRasterizer::new(self.rasterizer_command.clone(), self.rasterizer_args.clone())
            .with_settle(Settle {
                delay: self.settle_delay(),
                wait_for_load: self.wait_for_load,
            })
    }
}

pub(crate) fn load_config() -> Result<Config> {
    let config_file = check_config_exists()?;
    let mut file = File::open(&config_file)?;
    let mut buf = String::default();
    File::read_to_string(&mut file, &mut buf)?;
    parse_config(&buf)
}

pub(crate) fn parse_config(input: &str) -> Result<Config> {
    let res: Config = toml::from_str(input)?;
    Ok(res)
}

fn check_config_exists() -> Result<PathBuf> {
    let mut dir: PathBuf = dirs::config_dir().unwrap_or_else(|| "./".into());
    dir.push(APP_NAME);

    if !dir.exists() {
        create_dir_all(&dir)?;
    }
    dir.push(CONFIG_FILE);
    if !dir.exists() {
        let mut fd = File::create(&dir)?;
        let serialized = toml::to_string(&Config::default())?;
        fd.write_all(serialized.as_bytes())?;
    }
    Ok(dir)
}
