pub mod blur;
pub mod color_curve;
pub mod vignette;

pub use color_curve::{Channel, ColorCurveConfig, LookupTable};
pub use vignette::{HaloMask, VignetteConfig};

use image::RgbImage;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Image is empty")]
    EmptyImage,
    #[error("Image processing error: {0}")]
    ImageProc(String),
}

/// A pure pixel transform. The source image is left untouched.
pub trait Effect {
    fn apply(&self, image: &RgbImage) -> Result<RgbImage>;
}

pub(crate) fn ensure_not_empty(image: &RgbImage) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::EmptyImage);
    }

    Ok(())
}
