use std::mem;

use log::{debug, info, warn};

use crate::buffer::PixelBuffer;
use crate::color::compose_color;
use crate::config::{mask_brightness, StripConfig, StripOptions};
use crate::error::{Error, Result};
use crate::range::FillRange;
use crate::transport::Transport;

/// Lifecycle of a [`Leds`] handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Configured but the transport has not been opened.
    Uninitialized,
    /// The transport is open and the LED buffer exists.
    Active,
    /// The transport has been released. Terminal.
    Closed,
}

enum Channel<D> {
    Uninitialized,
    Active { device: D, leds: PixelBuffer },
    Closed,
}

/// A string of LEDs on one GPIO pin.
///
/// Buffer edits only touch memory; call [`Leds::show`] to push them to the
/// strip. The transport is released on [`Leds::close`] or, failing that,
/// when the handle is dropped.
pub struct Leds<T: Transport> {
    config: StripConfig,
    transport: T,
    channel: Channel<T::Device>,
}

impl<T: Transport> Leds<T> {
    /// Wrap a configuration and transport without touching the hardware yet.
    pub fn new(config: StripConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            channel: Channel::Uninitialized,
        }
    }

    /// Validate the configuration and open the transport.
    pub fn create(length: i64, gpio: i64, options: StripOptions, transport: T) -> Result<Self> {
        let config = StripConfig::new(length, gpio, options)?;
        let mut leds = Self::new(config, transport);
        leds.open()?;
        Ok(leds)
    }

    /// Open the transport and allocate the buffer.
    ///
    /// A failed open leaves the handle closed for good; build a new one to
    /// retry.
    pub fn open(&mut self) -> Result<()> {
        match self.channel {
            Channel::Uninitialized => {}
            Channel::Active { .. } => return Ok(()),
            Channel::Closed => return Err(Error::NotInitialized),
        }

        let leds = match PixelBuffer::new(self.config.length) {
            Ok(leds) => leds,
            Err(e) => {
                self.channel = Channel::Closed;
                return Err(e);
            }
        };

        match self.transport.init(&self.config) {
            Ok(device) => {
                info!(
                    "initialized {} LEDs on GPIO {} (DMA {}, {} Hz)",
                    self.config.length, self.config.gpio, self.config.dma, self.config.frequency
                );
                self.channel = Channel::Active { device, leds };
                Ok(())
            }
            Err(code) => {
                warn!(
                    "LEDs on GPIO {} could not be initialized: {code}",
                    self.config.gpio
                );
                self.channel = Channel::Closed;
                Err(Error::DeviceInitFailed(code))
            }
        }
    }

    pub fn state(&self) -> State {
        match self.channel {
            Channel::Uninitialized => State::Uninitialized,
            Channel::Active { .. } => State::Active,
            Channel::Closed => State::Closed,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == State::Active
    }

    pub fn config(&self) -> &StripConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn length(&self) -> usize {
        self.config.length
    }

    pub fn gpio(&self) -> u32 {
        self.config.gpio
    }

    pub fn dma(&self) -> u32 {
        self.config.dma
    }

    pub fn frequency(&self) -> u32 {
        self.config.frequency
    }

    pub fn invert(&self) -> bool {
        self.config.invert
    }

    pub fn brightness(&self) -> u8 {
        self.config.brightness
    }

    /// Set the brightness applied on the next [`Leds::show`]. Only the low 8
    /// bits are kept; hue is unaffected.
    pub fn set_brightness(&mut self, brightness: i64) -> Result<()> {
        if let Channel::Closed = self.channel {
            return Err(Error::NotInitialized);
        }
        self.config.brightness = mask_brightness(brightness)?;
        Ok(())
    }

    /// Push the buffer to the strip.
    pub fn show(&mut self) -> Result<()> {
        let Channel::Active { device, leds } = &mut self.channel else {
            return Err(Error::NotInitialized);
        };
        debug!("rendering {} LEDs", leds.len());
        self.transport
            .render(device, &self.config, leds.as_slice())
            .map_err(|code| {
                warn!("LEDs on GPIO {} failed to render: {code}", self.config.gpio);
                Error::RenderFailed(code)
            })
    }

    /// Turn every LED off in the buffer. Nothing is rendered.
    pub fn clear(&mut self) -> Result<()> {
        self.leds_mut()?.clear();
        Ok(())
    }

    /// Turn every LED off and render straight away.
    pub fn clear_and_show(&mut self) -> Result<()> {
        self.clear()?;
        self.show()
    }

    /// Release the transport. Later buffer operations fail with
    /// [`Error::NotInitialized`]. Closing a handle that is not active does
    /// nothing.
    pub fn close(&mut self) {
        if !self.is_active() {
            return;
        }
        if let Channel::Active { device, .. } = mem::replace(&mut self.channel, Channel::Closed) {
            self.transport.fini(device);
            info!("closed LEDs on GPIO {}", self.config.gpio);
        }
    }

    pub fn get(&self, index: i64) -> Result<u32> {
        self.leds()?.get(index)
    }

    /// Set the LED at `index`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: i64, color: u32) -> Result<()> {
        self.leds_mut()?.set(index, color);
        Ok(())
    }

    pub fn set_pixel(&mut self, index: i64, color: u32) -> Result<()> {
        self.set(index, color)
    }

    pub fn set_pixel_rgb(&mut self, index: i64, red: i64, green: i64, blue: i64) -> Result<()> {
        self.set(index, compose_color(red, green, blue))
    }

    /// Copy of the buffered colors. These are not necessarily on the strip
    /// yet; that depends on whether [`Leds::show`] has been called.
    pub fn to_vec(&self) -> Result<Vec<u32>> {
        Ok(self.leds()?.to_vec())
    }

    /// Overwrite the buffer from the front with `colors`. Extra colors are
    /// ignored; LEDs past the end of `colors` keep their value.
    pub fn replace(&mut self, colors: &[u32]) -> Result<()> {
        self.leds_mut()?.replace(colors);
        Ok(())
    }

    pub fn reverse(&mut self) -> Result<()> {
        self.leds_mut()?.reverse();
        Ok(())
    }

    /// Rotate so the color at `count` comes first; negative counts from the end.
    pub fn rotate(&mut self, count: i64) -> Result<()> {
        self.leds_mut()?.rotate(count);
        Ok(())
    }

    pub fn fill(&mut self, color: u32, range: impl Into<FillRange>) -> Result<()> {
        self.leds_mut()?.fill(color, range);
        Ok(())
    }

    pub fn fill_with<F>(&mut self, range: impl Into<FillRange>, f: F) -> Result<()>
    where
        F: FnMut(usize) -> u32,
    {
        self.leds_mut()?.fill_with(range, f);
        Ok(())
    }

    fn leds(&self) -> Result<&PixelBuffer> {
        match &self.channel {
            Channel::Active { leds, .. } => Ok(leds),
            _ => Err(Error::NotInitialized),
        }
    }

    fn leds_mut(&mut self) -> Result<&mut PixelBuffer> {
        match &mut self.channel {
            Channel::Active { leds, .. } => Ok(leds),
            _ => Err(Error::NotInitialized),
        }
    }
}

impl<T: Transport> Drop for Leds<T> {
    fn drop(&mut self) {
        if self.is_active() {
            warn!("LEDs on GPIO {} dropped while open", self.config.gpio);
            self.close();
        }
    }
}
