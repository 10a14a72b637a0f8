//! Dark halo vignette.
//!
//! A float mask starts at 0.5 everywhere, gets a fully bright disc painted at
//! the image center, and is then box blurred with a kernel as wide as the disc
//! radius so the edge fades out. The source is multiplied by the mask.

use crate::{Effect, Error, Result, blur, ensure_not_empty};
use derivative::Derivative;
use derive_setters::Setters;
use image::{ImageBuffer, Luma, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;
use rayon::prelude::*;

/// Mask value outside the bright disc.
pub const BACKGROUND: f32 = 0.5;

/// Mask value inside the bright disc.
pub const FOREGROUND: f32 = 1.0;

/// Pixel radius of the bright disc for a radius given in percent of the
/// limiting half-dimension. Never smaller than one pixel.
pub fn effective_radius(width: u32, height: u32, radius_percent: i32) -> u32 {
    let max_radius = width.min(height) as f64 / 2.0;
    let percent = radius_percent.clamp(0, 100) as f64 / 100.0;
    ((max_radius * percent).round() as u32).max(1)
}

/// Brightness multiplier for every pixel, one plane shared by all channels.
#[derive(Debug, Clone)]
pub struct HaloMask {
    plane: ImageBuffer<Luma<f32>, Vec<f32>>,
    radius: u32,
}

impl HaloMask {
    pub fn build(width: u32, height: u32, radius_percent: i32) -> Self {
        let radius = effective_radius(width, height, radius_percent);
        let mut plane = ImageBuffer::from_pixel(width, height, Luma([BACKGROUND]));

        draw_filled_circle_mut(
            &mut plane,
            ((width / 2) as i32, (height / 2) as i32),
            radius as i32,
            Luma([FOREGROUND]),
        );

        blur::box_blur(&mut plane, width as usize, height as usize, radius as usize);

        Self { plane, radius }
    }

    pub fn effective_radius(&self) -> u32 {
        self.radius
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.plane.dimensions()
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.plane.get_pixel(x, y)[0]
    }

    pub fn values(&self) -> &[f32] {
        self.plane.as_raw()
    }

    /// Multiply `image` by the mask and convert back to 8 bits.
    pub fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        if image.dimensions() != self.dimensions() {
            return Err(Error::ImageProc(format!(
                "mask is {:?} but image is {:?}",
                self.dimensions(),
                image.dimensions()
            )));
        }

        let mut pixels = image.as_raw().clone();
        pixels
            .par_chunks_exact_mut(3)
            .zip(self.plane.as_raw().par_iter())
            .for_each(|(pixel, factor)| {
                for channel in pixel.iter_mut() {
                    *channel = (*channel as f32 * factor).round().clamp(0.0, 255.0) as u8;
                }
            });

        RgbImage::from_raw(image.width(), image.height(), pixels)
            .ok_or_else(|| Error::ImageProc("vignette output buffer size mismatch".to_string()))
    }
}

#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct VignetteConfig {
    #[derivative(Default(value = "100"))]
    radius: i32, // percent, [0, 100]
}

impl VignetteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn effective_radius(&self, width: u32, height: u32) -> u32 {
        effective_radius(width, height, self.radius)
    }

    pub fn halo_mask(&self, width: u32, height: u32) -> HaloMask {
        HaloMask::build(width, height, self.radius)
    }
}

impl Effect for VignetteConfig {
    fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        ensure_not_empty(image)?;

        let (width, height) = image.dimensions();
        let mask = self.halo_mask(width, height);

        log::debug!(
            "vignette: radius={}% (effective {}px), size={}x{}",
            self.radius,
            mask.effective_radius(),
            width,
            height
        );

        mask.apply(image)
    }
}
