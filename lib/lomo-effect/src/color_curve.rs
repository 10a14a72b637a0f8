use crate::{Effect, Result, ensure_not_empty};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbImage;

/// Smallest usable curve strength, lower values threshold the channel.
pub const MIN_STRENGTH: i32 = 8;

/// Largest value the strength slider produces.
pub const MAX_STRENGTH: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub fn index(&self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// 256-entry intensity remap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable([u8; 256]);

impl LookupTable {
    /// Sigmoid tone curve `256 / (1 + e^(-(x - 0.5) / (s / 100)))` with `x = i / 256`.
    ///
    /// `strength` is clamped to `[MIN_STRENGTH, MAX_STRENGTH]`. The curve gets
    /// steeper as the strength drops.
    pub fn sigmoid(strength: i32) -> Self {
        let scale = strength.clamp(MIN_STRENGTH, MAX_STRENGTH) as f64 / 100.0;
        let mut table = [0u8; 256];

        for (i, entry) in table.iter_mut().enumerate() {
            let x = i as f64 / 256.0;
            let y = 256.0 / (1.0 + (-(x - 0.5) / scale).exp());
            *entry = y.round().clamp(0.0, 255.0) as u8;
        }

        Self(table)
    }

    pub fn get(&self, intensity: u8) -> u8 {
        self.0[intensity as usize]
    }

    pub fn as_slice(&self) -> &[u8; 256] {
        &self.0
    }

    /// Remap one channel of `image` in place, the others are not touched.
    pub fn apply_to_channel(&self, image: &mut RgbImage, channel: Channel) {
        let index = channel.index();
        for pixel in image.pixels_mut() {
            pixel[index] = self.0[pixel[index] as usize];
        }
    }
}

/// Red-channel "warmth" curve
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ColorCurveConfig {
    #[derivative(Default(value = "10"))]
    strength: i32, // [0, 20]

    #[derivative(Default(value = "Channel::Red"))]
    channel: Channel,
}

impl ColorCurveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strength(&self) -> i32 {
        self.strength
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn effective_strength(&self) -> i32 {
        self.strength.clamp(MIN_STRENGTH, MAX_STRENGTH)
    }

    pub fn lookup_table(&self) -> LookupTable {
        LookupTable::sigmoid(self.strength)
    }
}

impl Effect for ColorCurveConfig {
    fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        ensure_not_empty(image)?;

        log::debug!(
            "color curve: strength={} (effective {}), channel={:?}, size={}x{}",
            self.strength,
            self.effective_strength(),
            self.channel,
            image.width(),
            image.height()
        );

        let lut = self.lookup_table();
        let mut output = image.clone();
        lut.apply_to_channel(&mut output, self.channel);

        Ok(output)
    }
}
