/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::path::PathBuf;
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::Direction;

/***************************************/
/*       Public data structures        */
/***************************************/
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of [`Error`], for callers that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    Config,
    Io,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("floor {floor} is out of range (building has {n_floors} floors)")]
    InvalidFloor { floor: u8, n_floors: u8 },

    #[error("elevator {id} does not exist (bank has {n_elevators} elevators)")]
    InvalidElevator { id: usize, n_elevators: usize },

    #[error("there is no {direction:?} hall call button on floor {floor}")]
    InvalidHallCall { floor: u8, direction: Direction },

    #[error("failed to read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidFloor { .. }
            | Error::InvalidElevator { .. }
            | Error::InvalidHallCall { .. } => ErrorKind::InvalidArgument,
            Error::ConfigRead { .. } | Error::ConfigParse(_) | Error::InvalidConfig(_) => {
                ErrorKind::Config
            }
            Error::Spawn(_) => ErrorKind::Io,
        }
    }
}
