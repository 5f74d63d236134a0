use thiserror::Error;

use crate::transport::ErrorCode;

#[derive(Debug, Error)]
pub enum Error {
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("{what} {reason}: {value}")]
    InvalidArgument {
        what: &'static str,
        reason: &'static str,
        value: i64,
    },

    #[error("index {index} is outside of LED range: 0...{}", last_index(.length))]
    IndexOutOfRange { index: i64, length: usize },

    #[error("Leds are not initialized")]
    NotInitialized,

    #[error("Leds could not be initialized: {0}")]
    DeviceInitFailed(ErrorCode),

    #[error("Leds failed to render: {0}")]
    RenderFailed(ErrorCode),

    #[error("could not allocate a buffer of {length} LEDs")]
    AllocationFailed { length: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

fn last_index(length: &usize) -> i64 {
    *length as i64 - 1
}
