/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::{Error, Result};

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    pub scheduler: SchedulerConfig,
    pub elevator: ElevatorConfig,
    pub dispatcher: DispatcherConfig,
    pub presentation: PresentationConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SchedulerConfig {
    pub n_elevators: usize,
    pub n_floors: u8,
}

/// Simulated timing of a single elevator, all values in milliseconds.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ElevatorConfig {
    pub move_time: u64,
    pub door_time: u64,
    pub time_slice: u64,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct DispatcherConfig {
    pub idle_wait: u64,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct PresentationConfig {
    pub render_interval: u64,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            scheduler: SchedulerConfig {
                n_elevators: 5,
                n_floors: 20,
            },
            elevator: ElevatorConfig {
                move_time: 1000,
                door_time: 2000,
                time_slice: 100,
            },
            dispatcher: DispatcherConfig { idle_wait: 20 },
            presentation: PresentationConfig {
                render_interval: 30,
            },
        }
    }
}

impl ElevatorConfig {
    pub fn move_time(&self) -> Duration {
        Duration::from_millis(self.move_time)
    }

    pub fn door_time(&self) -> Duration {
        Duration::from_millis(self.door_time)
    }

    pub fn time_slice(&self) -> Duration {
        Duration::from_millis(self.time_slice)
    }
}

impl DispatcherConfig {
    pub fn idle_wait(&self) -> Duration {
        Duration::from_millis(self.idle_wait)
    }
}

impl PresentationConfig {
    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render_interval)
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.scheduler.n_elevators == 0 {
            return Err(Error::InvalidConfig(
                "scheduler.n_elevators must be at least 1".into(),
            ));
        }
        if self.scheduler.n_floors < 2 {
            return Err(Error::InvalidConfig(
                "scheduler.n_floors must be at least 2".into(),
            ));
        }
        if self.elevator.time_slice == 0 {
            return Err(Error::InvalidConfig(
                "elevator.time_slice must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config(path: &Path) -> Result<Config> {
    let config_str = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}
