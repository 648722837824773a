//! Errors raised while reading weather data.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("unknown {field} identifier {value:?}")]
    UnknownIdentifier { field: &'static str, value: String },
    #[error("invalid weather config: {0}")]
    Config(#[from] ron::error::SpannedError),
    #[error("could not read weather config: {0}")]
    Io(#[from] std::io::Error),
}

pub type WeatherResult<T> = Result<T, WeatherError>;
