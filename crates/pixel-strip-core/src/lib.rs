pub mod buffer;
pub mod color;
pub mod config;
pub mod device;
pub mod error;
pub mod range;
pub mod transport;

pub use buffer::PixelBuffer;
pub use color::{compose_color, Rgb};
pub use config::{StripConfig, StripOptions};
pub use device::{Leds, State};
pub use error::{Error, Result};
pub use range::FillRange;
pub use transport::{ErrorCode, FakeTransport, Transport};
