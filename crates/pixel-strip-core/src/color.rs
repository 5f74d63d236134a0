/// Unpacked RGB color, the same type smart-leds drivers consume.
pub type Rgb = smart_leds::RGB8;

/// Mask selecting the 24 bits of a packed color.
pub const COLOR_MASK: u32 = 0x00FF_FFFF;

/// Given a set of RGB values return a single 24-bit color value.
///
/// Each channel is truncated to its low 8 bits before packing, so values
/// outside `0..=255` wrap instead of being rejected.
pub const fn compose_color(red: i64, green: i64, blue: i64) -> u32 {
    (((red & 0xFF) as u32) << 16) | (((green & 0xFF) as u32) << 8) | ((blue & 0xFF) as u32)
}

/// Drop anything above the 24 color bits.
pub const fn to_color(value: u32) -> u32 {
    value & COLOR_MASK
}

/// Split a packed color into its channels.
pub const fn unpack(color: u32) -> Rgb {
    Rgb {
        r: (color >> 16) as u8,
        g: (color >> 8) as u8,
        b: color as u8,
    }
}

/// Scale a color by a brightness in `0..=255`; 255 leaves the color untouched.
pub fn scale(rgb: Rgb, brightness: u8) -> Rgb {
    let factor = brightness as u16 + 1;
    let channel = |c: u8| ((c as u16 * factor) >> 8) as u8;
    Rgb {
        r: channel(rgb.r),
        g: channel(rgb.g),
        b: channel(rgb.b),
    }
}
