use crate::color::to_color;
use crate::error::{Error, Result};
use crate::range::FillRange;

/// Packed 24-bit colors for one LED channel.
///
/// The length is fixed when the buffer is allocated. Reads are bounds
/// checked; writes that land outside the strip are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    leds: Vec<u32>,
}

impl PixelBuffer {
    /// Allocate `length` LEDs, all off.
    pub fn new(length: usize) -> Result<Self> {
        let mut leds = Vec::new();
        leds.try_reserve_exact(length)
            .map_err(|_| Error::AllocationFailed { length })?;
        leds.resize(length, 0);
        Ok(Self { leds })
    }

    pub fn len(&self) -> usize {
        self.leds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leds.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.leds
    }

    pub fn get(&self, index: i64) -> Result<u32> {
        self.slot(index)
            .map(|i| self.leds[i])
            .ok_or(Error::IndexOutOfRange {
                index,
                length: self.leds.len(),
            })
    }

    /// Write a color; out-of-range indices are ignored.
    pub fn set(&mut self, index: i64, color: u32) {
        if let Some(i) = self.slot(index) {
            self.leds[i] = to_color(color);
        }
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.leds.clone()
    }

    /// Copy colors from `colors` starting at LED 0.
    ///
    /// Only the overlapping prefix is written: extra source colors are
    /// ignored and LEDs past the end of `colors` keep their value.
    pub fn replace(&mut self, colors: &[u32]) {
        for (led, &color) in self.leds.iter_mut().zip(colors) {
            *led = to_color(color);
        }
    }

    pub fn reverse(&mut self) {
        reverse_span(&mut self.leds);
    }

    /// Rotate in place so that the color at `count` comes first.
    ///
    /// A negative `count` counts from the end, `-1` being the last LED.
    pub fn rotate(&mut self, count: i64) {
        let len = self.leds.len();
        if len == 0 {
            return;
        }
        let count = count.rem_euclid(len as i64) as usize;
        if count == 0 {
            return;
        }
        reverse_span(&mut self.leds[count..]);
        reverse_span(&mut self.leds[..count]);
        reverse_span(&mut self.leds);
    }

    /// Set every LED covered by `range` to `color`.
    pub fn fill(&mut self, color: u32, range: impl Into<FillRange>) {
        let color = to_color(color);
        let span = range.into().resolve(self.leds.len());
        self.leds[span].fill(color);
    }

    /// Set every LED covered by `range` to the color `f` returns for its index.
    ///
    /// `f` is called once per covered index, in ascending order.
    pub fn fill_with<F>(&mut self, range: impl Into<FillRange>, mut f: F)
    where
        F: FnMut(usize) -> u32,
    {
        let span = range.into().resolve(self.leds.len());
        for i in span {
            self.leds[i] = to_color(f(i));
        }
    }

    pub fn clear(&mut self) {
        self.leds.fill(0);
    }

    fn slot(&self, index: i64) -> Option<usize> {
        usize::try_from(index).ok().filter(|&i| i < self.leds.len())
    }
}

// Two-pointer swap from both ends toward the middle.
fn reverse_span(leds: &mut [u32]) {
    if leds.is_empty() {
        return;
    }
    let mut lo = 0;
    let mut hi = leds.len() - 1;
    while lo < hi {
        leds.swap(lo, hi);
        lo += 1;
        hi -= 1;
    }
}
