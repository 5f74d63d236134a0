use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_DMA: u32 = 5;
pub const DEFAULT_FREQUENCY: u32 = 800_000;
pub const DEFAULT_BRIGHTNESS: u8 = 255;

/// Optional settings for a strip. Anything left as `None` takes its default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripOptions {
    /// DMA channel, defaults to 5.
    pub dma: Option<i64>,
    /// Output frequency in Hz, defaults to 800 kHz.
    pub frequency: Option<u32>,
    /// Invert the output signal (NPN level shifter), defaults to `false`.
    pub invert: Option<bool>,
    /// Brightness, defaults to 255. Only the low 8 bits are kept.
    pub brightness: Option<i64>,
}

/// Validated configuration for one LED channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripConfig {
    pub length: usize,
    pub gpio: u32,
    pub dma: u32,
    pub frequency: u32,
    pub invert: bool,
    pub brightness: u8,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StripDocument {
    length: i64,
    gpio: i64,
    dma: Option<i64>,
    frequency: Option<u32>,
    invert: Option<bool>,
    brightness: Option<i64>,
}

impl StripDocument {
    fn into_config(self) -> Result<StripConfig> {
        let options = StripOptions {
            dma: self.dma,
            frequency: self.frequency,
            invert: self.invert,
            brightness: self.brightness,
        };
        StripConfig::new(self.length, self.gpio, options)
    }
}

impl StripConfig {
    pub fn new(length: i64, gpio: i64, options: StripOptions) -> Result<Self> {
        let length = usize::try_from(non_negative("length", length)?)
            .map_err(|_| too_large("length", length))?;
        let gpio = to_u32("GPIO", gpio)?;
        let dma = match options.dma {
            Some(dma) => to_u32("DMA channel", dma)?,
            None => DEFAULT_DMA,
        };
        let brightness = match options.brightness {
            Some(brightness) => mask_brightness(brightness)?,
            None => DEFAULT_BRIGHTNESS,
        };

        Ok(Self {
            length,
            gpio,
            dma,
            frequency: options.frequency.unwrap_or(DEFAULT_FREQUENCY),
            invert: options.invert.unwrap_or(false),
            brightness,
        })
    }

    /// Parse a TOML document with `length`, `gpio` and any of the option keys.
    pub fn from_toml(s: &str) -> Result<Self> {
        let doc: StripDocument = toml::from_str(s)?;
        doc.into_config()
    }

    /// Parse a JSON object with `length`, `gpio` and any of the option keys.
    pub fn from_json(s: &str) -> Result<Self> {
        let doc: StripDocument = serde_json::from_str(s)?;
        doc.into_config()
    }
}

/// Reject negative brightness, then keep the low 8 bits.
pub fn mask_brightness(value: i64) -> Result<u8> {
    Ok((non_negative("brightness", value)? & 0xFF) as u8)
}

fn non_negative(what: &'static str, value: i64) -> Result<i64> {
    if value < 0 {
        return Err(Error::InvalidArgument {
            what,
            reason: "cannot be negative",
            value,
        });
    }
    Ok(value)
}

fn to_u32(what: &'static str, value: i64) -> Result<u32> {
    u32::try_from(non_negative(what, value)?).map_err(|_| too_large(what, value))
}

fn too_large(what: &'static str, value: i64) -> Error {
    Error::InvalidArgument {
        what,
        reason: "is too large",
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied() {
        let config = StripConfig::new(8, 18, StripOptions::default()).unwrap();
        assert_eq!(config.length, 8);
        assert_eq!(config.gpio, 18);
        assert_eq!(config.dma, 5);
        assert_eq!(config.frequency, 800_000);
        assert!(!config.invert);
        assert_eq!(config.brightness, 255);
    }

    #[test]
    fn options_override_defaults() {
        let options = StripOptions {
            dma: Some(10),
            frequency: Some(400_000),
            invert: Some(true),
            brightness: Some(64),
        };
        let config = StripConfig::new(30, 12, options).unwrap();
        assert_eq!(config.dma, 10);
        assert_eq!(config.frequency, 400_000);
        assert!(config.invert);
        assert_eq!(config.brightness, 64);
    }

    #[test]
    fn zero_length_is_allowed() {
        let config = StripConfig::new(0, 18, StripOptions::default()).unwrap();
        assert_eq!(config.length, 0);
    }

    #[test]
    fn negative_values_rejected() {
        let err = StripConfig::new(-1, 18, StripOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument {
                what: "length",
                value: -1,
                ..
            }
        ));
        assert_eq!(err.to_string(), "length cannot be negative: -1");

        let err = StripConfig::new(8, -2, StripOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { what: "GPIO", .. }));

        let options = StripOptions {
            dma: Some(-5),
            ..Default::default()
        };
        let err = StripConfig::new(8, 18, options).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument {
                what: "DMA channel",
                ..
            }
        ));

        let options = StripOptions {
            brightness: Some(-1),
            ..Default::default()
        };
        let err = StripConfig::new(8, 18, options).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument {
                what: "brightness",
                ..
            }
        ));
    }

    #[test]
    fn oversized_gpio_rejected() {
        let err = StripConfig::new(8, i64::from(u32::MAX) + 1, StripOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument {
                what: "GPIO",
                reason: "is too large",
                ..
            }
        ));
    }

    #[test]
    fn brightness_masked_to_8_bits() {
        assert_eq!(mask_brightness(255).unwrap(), 255);
        assert_eq!(mask_brightness(256).unwrap(), 0);
        assert_eq!(mask_brightness(300).unwrap(), 44);
        assert!(mask_brightness(-3).is_err());
    }

    #[test]
    fn from_toml_minimal() {
        let config = StripConfig::from_toml("length = 8\ngpio = 18\n").unwrap();
        assert_eq!(config.length, 8);
        assert_eq!(config.gpio, 18);
        assert_eq!(config.dma, DEFAULT_DMA);
        assert_eq!(config.brightness, DEFAULT_BRIGHTNESS);
    }

    #[test]
    fn from_toml_full() {
        let toml = r#"
length = 60
gpio = 18
dma = 10
frequency = 400000
invert = true
brightness = 32
"#;
        let config = StripConfig::from_toml(toml).unwrap();
        assert_eq!(
            config,
            StripConfig {
                length: 60,
                gpio: 18,
                dma: 10,
                frequency: 400_000,
                invert: true,
                brightness: 32,
            }
        );
    }

    #[test]
    fn from_toml_validates() {
        let err = StripConfig::from_toml("length = -4\ngpio = 18\n").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { what: "length", .. }));
    }

    #[test]
    fn from_toml_rejects_unknown_keys() {
        let err = StripConfig::from_toml("length = 8\ngpio = 18\ncolour = 1\n").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn from_toml_requires_length_and_gpio() {
        assert!(StripConfig::from_toml("length = 8\n").is_err());
        assert!(StripConfig::from_toml("").is_err());
    }

    #[test]
    fn from_json() {
        let config =
            StripConfig::from_json(r#"{"length": 8, "gpio": 18, "brightness": 511}"#).unwrap();
        assert_eq!(config.length, 8);
        assert_eq!(config.brightness, 255);
    }

    #[test]
    fn from_json_rejects_wrong_types() {
        let err = StripConfig::from_json(r#"{"length": "eight", "gpio": 18}"#).unwrap_err();
        assert!(matches!(err, Error::JsonParse(_)));
    }
}
