use std::fmt;
use std::io::{self, Write};

use colored::Colorize;
use log::{debug, warn};

use crate::color::{scale, unpack, Rgb};
use crate::config::StripConfig;

/// Status code reported by a failing transport call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode(pub i32);

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The hardware side of a strip: programs the DMA/PWM channel and clocks
/// the buffer out on the GPIO line.
///
/// Only one transport may drive a given GPIO/DMA pair at a time. That is a
/// property of the hardware and is left to the caller.
pub trait Transport {
    /// Handle to an initialized channel.
    type Device;

    fn init(&mut self, config: &StripConfig) -> Result<Self::Device, ErrorCode>;

    /// Send packed colors to the strip, scaled by `config.brightness`.
    fn render(
        &mut self,
        device: &mut Self::Device,
        config: &StripConfig,
        leds: &[u32],
    ) -> Result<(), ErrorCode>;

    /// Release the channel.
    fn fini(&mut self, device: Self::Device);
}

const DEFAULT_GLYPH: &str = "◉ ";
const WRITE_FAILED: ErrorCode = ErrorCode(-1);

struct DebugOutput {
    glyph: String,
    out: Box<dyn Write>,
}

/// A transport with no hardware behind it.
///
/// Every render keeps the brightness-scaled frame for inspection. With debug
/// output enabled it also draws the strip as one line of colored glyphs,
/// redrawn in place on each render.
#[derive(Default)]
pub struct FakeTransport {
    debug: Option<DebugOutput>,
    frame: Vec<Rgb>,
    renders: usize,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw each render to `out`. An empty or missing glyph uses `"◉ "`.
    pub fn with_debug(glyph: Option<&str>, out: impl Write + 'static) -> Self {
        let glyph = match glyph {
            Some(g) if !g.is_empty() => g.to_string(),
            _ => DEFAULT_GLYPH.to_string(),
        };
        Self {
            debug: Some(DebugOutput {
                glyph,
                out: Box::new(out),
            }),
            ..Self::default()
        }
    }

    pub fn stdout(glyph: Option<&str>) -> Self {
        Self::with_debug(glyph, io::stdout())
    }

    /// The brightness-scaled colors of the most recent render.
    pub fn frame(&self) -> &[Rgb] {
        &self.frame
    }

    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl Transport for FakeTransport {
    type Device = ();

    fn init(&mut self, config: &StripConfig) -> Result<(), ErrorCode> {
        debug!(
            "fake transport: {} LEDs on GPIO {} (DMA {})",
            config.length, config.gpio, config.dma
        );
        self.frame.clear();
        Ok(())
    }

    fn render(&mut self, _: &mut (), config: &StripConfig, leds: &[u32]) -> Result<(), ErrorCode> {
        self.frame = leds
            .iter()
            .map(|&c| scale(unpack(c), config.brightness))
            .collect();
        self.renders += 1;

        if let Some(debug) = self.debug.as_mut() {
            let mut line = String::from("\r");
            for rgb in &self.frame {
                let dot = debug.glyph.as_str().truecolor(rgb.r, rgb.g, rgb.b);
                line.push_str(&dot.to_string());
            }
            debug
                .out
                .write_all(line.as_bytes())
                .and_then(|_| debug.out.flush())
                .map_err(|e| {
                    warn!("fake transport: debug output failed: {e}");
                    WRITE_FAILED
                })?;
        }
        Ok(())
    }

    fn fini(&mut self, _: ()) {
        if let Some(debug) = self.debug.as_mut() {
            if let Err(e) = writeln!(debug.out) {
                warn!("fake transport: debug output failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::config::StripOptions;

    #[derive(Clone, Default)]
    struct SharedSink(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedSink {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn config(brightness: i64) -> StripConfig {
        let options = StripOptions {
            brightness: Some(brightness),
            ..Default::default()
        };
        StripConfig::new(3, 18, options).unwrap()
    }

    #[test]
    fn error_code_display() {
        assert_eq!(ErrorCode(-7).to_string(), "-7");
    }

    #[test]
    fn render_keeps_scaled_frame() {
        let mut transport = FakeTransport::new();
        let config = config(127);
        transport.init(&config).unwrap();
        transport
            .render(&mut (), &config, &[0xC80000, 0x00FF00, 0])
            .unwrap();
        assert_eq!(transport.renders(), 1);
        assert_eq!(
            transport.frame(),
            &[Rgb::new(100, 0, 0), Rgb::new(0, 127, 0), Rgb::new(0, 0, 0)]
        );
    }

    #[test]
    fn debug_output_draws_one_glyph_per_led() {
        let sink = SharedSink::default();
        let mut transport = FakeTransport::with_debug(Some("*"), sink.clone());
        let config = config(255);
        transport.init(&config).unwrap();
        transport.render(&mut (), &config, &[1, 2, 3]).unwrap();
        transport.fini(());

        let out = sink.contents();
        assert!(out.starts_with('\r'));
        assert!(out.ends_with('\n'));
        assert_eq!(out.matches('*').count(), 3);
    }

    #[test]
    fn debug_output_default_glyph() {
        let sink = SharedSink::default();
        let mut transport = FakeTransport::with_debug(Some(""), sink.clone());
        let config = config(255);
        transport.render(&mut (), &config, &[1, 2]).unwrap();
        assert_eq!(sink.contents().matches('◉').count(), 2);
    }

    #[test]
    fn debug_write_failure_is_a_render_error() {
        let mut transport = FakeTransport::with_debug(None, BrokenSink);
        let config = config(255);
        let err = transport.render(&mut (), &config, &[1]).unwrap_err();
        assert_eq!(err, WRITE_FAILED);
    }
}
