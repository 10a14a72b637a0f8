//! Filter pipeline state.
//!
//! The curve always runs on the original picture and the vignette runs on the
//! curve result when one exists. Changing the curve drops any vignette result,
//! so the preview shows the plain curve until the radius slider moves again.

use crate::{Error, Result};
use image::{ImageReader, RgbImage, codecs::jpeg::JpegEncoder};
use lomo_effect::{ColorCurveConfig, Effect, VignetteConfig};
use std::{
    fs::File,
    io::{BufWriter, Write},
    mem,
    path::{Path, PathBuf},
};

pub const OUTPUT_FILE: &str = "output.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loaded,
    CurveApplied,
    VignetteApplied,
}

#[derive(Debug)]
enum State {
    Loaded,
    CurveApplied {
        curved: RgbImage,
    },
    VignetteApplied {
        curved: Option<RgbImage>,
        display: RgbImage,
    },
}

/// Session-ending key commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Save,
    Dismiss,
}

impl Command {
    /// `None` for events without text, which leave the session running.
    pub fn from_key_text(text: &str) -> Option<Self> {
        match text {
            "" => None,
            "q" => Some(Command::Quit),
            "s" => Some(Command::Save),
            _ => Some(Command::Dismiss),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    Saved(PathBuf),
    Dismissed,
}

#[derive(Debug)]
pub struct Controller {
    original: RgbImage,
    curve: ColorCurveConfig,
    vignette: VignetteConfig,
    state: State,
    output_path: PathBuf,
    jpeg_quality: u8,
}

impl Controller {
    pub fn new(original: RgbImage, curve: ColorCurveConfig, vignette: VignetteConfig) -> Self {
        Self {
            original,
            curve,
            vignette,
            state: State::Loaded,
            output_path: PathBuf::from(OUTPUT_FILE),
            jpeg_quality: 95,
        }
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn stage(&self) -> Stage {
        match self.state {
            State::Loaded => Stage::Loaded,
            State::CurveApplied { .. } => Stage::CurveApplied,
            State::VignetteApplied { .. } => Stage::VignetteApplied,
        }
    }

    pub fn curve(&self) -> &ColorCurveConfig {
        &self.curve
    }

    pub fn vignette(&self) -> &VignetteConfig {
        &self.vignette
    }

    /// The image currently on screen.
    pub fn displayed(&self) -> &RgbImage {
        match &self.state {
            State::Loaded => &self.original,
            State::CurveApplied { curved } => curved,
            State::VignetteApplied { display, .. } => display,
        }
    }

    pub fn on_color_curve_changed(&mut self, strength: i32) -> Result<&RgbImage> {
        let curve = self.curve.clone().with_strength(strength);
        let curved = curve
            .apply(&self.original)
            .map_err(|e| Error::library("color curve", e))?;

        self.curve = curve;
        self.state = State::CurveApplied { curved };
        Ok(self.displayed())
    }

    pub fn on_vignette_changed(&mut self, radius: i32) -> Result<&RgbImage> {
        let vignette = self.vignette.clone().with_radius(radius);

        let source = match &self.state {
            State::CurveApplied { curved }
            | State::VignetteApplied {
                curved: Some(curved),
                ..
            } => curved,
            _ => &self.original,
        };

        let display = vignette
            .apply(source)
            .map_err(|e| Error::library("vignette", e))?;
        self.vignette = vignette;

        let curved = match mem::replace(&mut self.state, State::Loaded) {
            State::Loaded => None,
            State::CurveApplied { curved } => Some(curved),
            State::VignetteApplied { curved, .. } => curved,
        };

        self.state = State::VignetteApplied { curved, display };
        Ok(self.displayed())
    }

    pub fn handle_key(&self, text: &str) -> Result<Option<SessionEnd>> {
        match Command::from_key_text(text) {
            Some(command) => self.handle_command(command).map(Some),
            None => Ok(None),
        }
    }

    pub fn handle_command(&self, command: Command) -> Result<SessionEnd> {
        match command {
            Command::Quit => Ok(SessionEnd::Quit),
            Command::Save => self.save().map(SessionEnd::Saved),
            Command::Dismiss => Ok(SessionEnd::Dismissed),
        }
    }

    /// Write the displayed image to the output path, replacing any existing file.
    pub fn save(&self) -> Result<PathBuf> {
        save_jpeg(self.displayed(), &self.output_path, self.jpeg_quality)
            .map_err(|e| Error::library("save", e))?;

        log::info!("saved {}", self.output_path.display());
        Ok(self.output_path.clone())
    }
}

pub fn load_image(path: &Path) -> Result<RgbImage> {
    let load_error = |e: &dyn std::fmt::Display| Error::ImageLoad {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let image = ImageReader::open(path)
        .map_err(|e| load_error(&e))?
        .with_guessed_format()
        .map_err(|e| load_error(&e))?
        .decode()
        .map_err(|e| load_error(&e))?
        .to_rgb8();

    if image.width() == 0 || image.height() == 0 {
        return Err(load_error(&"picture is empty"));
    }

    log::info!(
        "loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );

    Ok(image)
}

fn save_jpeg(image: &RgbImage, path: &Path, quality: u8) -> image::ImageResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    JpegEncoder::new_with_quality(&mut writer, quality).encode_image(image)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient() -> RgbImage {
        RgbImage::from_fn(120, 90, |x, y| {
            Rgb([(x * 2) as u8, (y * 2) as u8, ((x + y) % 256) as u8])
        })
    }

    fn controller(image: RgbImage) -> Controller {
        Controller::new(image, ColorCurveConfig::new(), VignetteConfig::new())
    }

    #[test]
    fn test_starts_with_original() {
        let img = gradient();
        let c = controller(img.clone());

        assert_eq!(c.stage(), Stage::Loaded);
        assert_eq!(c.displayed(), &img);
    }

    #[test]
    fn test_curve_then_vignette() {
        let img = gradient();
        let mut c = controller(img.clone());

        let curved = c.on_color_curve_changed(12).unwrap().clone();
        assert_eq!(c.stage(), Stage::CurveApplied);
        assert_eq!(curved, ColorCurveConfig::new().with_strength(12).apply(&img).unwrap());

        let shown = c.on_vignette_changed(50).unwrap().clone();
        assert_eq!(c.stage(), Stage::VignetteApplied);
        assert_eq!(shown, VignetteConfig::new().with_radius(50).apply(&curved).unwrap());
    }

    #[test]
    fn test_vignette_without_curve_uses_original() {
        let img = gradient();
        let mut c = controller(img.clone());

        let shown = c.on_vignette_changed(50).unwrap().clone();
        assert_eq!(shown, VignetteConfig::new().with_radius(50).apply(&img).unwrap());
    }

    #[test]
    fn test_pipeline_order_matters() {
        let img = gradient();

        let mut a = controller(img.clone());
        a.on_color_curve_changed(12).unwrap();
        let with_curve = a.on_vignette_changed(50).unwrap().clone();

        let mut b = controller(img);
        let without_curve = b.on_vignette_changed(50).unwrap().clone();

        assert_ne!(with_curve, without_curve);
    }

    #[test]
    fn test_repeated_vignette_keeps_curve_upstream() {
        let img = gradient();
        let mut c = controller(img.clone());
        let curved = c.on_color_curve_changed(9).unwrap().clone();

        c.on_vignette_changed(80).unwrap();
        let second = c.on_vignette_changed(30).unwrap().clone();

        assert_eq!(second, VignetteConfig::new().with_radius(30).apply(&curved).unwrap());
    }

    #[test]
    fn test_curve_replaces_vignette() {
        let img = gradient();
        let mut c = controller(img.clone());
        c.on_vignette_changed(20).unwrap();

        let shown = c.on_color_curve_changed(15).unwrap().clone();
        assert_eq!(c.stage(), Stage::CurveApplied);
        assert_eq!(shown, ColorCurveConfig::new().with_strength(15).apply(&img).unwrap());
    }

    #[test]
    fn test_display_is_function_of_parameters() {
        let img = gradient();

        let mut a = controller(img.clone());
        a.on_color_curve_changed(20).unwrap();
        a.on_vignette_changed(10).unwrap();
        a.on_color_curve_changed(11).unwrap();
        a.on_vignette_changed(60).unwrap();

        let mut b = controller(img);
        b.on_color_curve_changed(11).unwrap();
        b.on_vignette_changed(60).unwrap();

        assert_eq!(a.displayed(), b.displayed());
        assert_eq!(a.curve().strength(), 11);
        assert_eq!(a.vignette().radius(), 60);
    }

    #[test]
    fn test_failed_filter_keeps_parameters() {
        let mut c = Controller::new(
            RgbImage::new(0, 0),
            ColorCurveConfig::new().with_strength(14),
            VignetteConfig::new().with_radius(60),
        );

        assert!(matches!(
            c.on_color_curve_changed(9),
            Err(Error::Library { operation: "color curve", .. })
        ));
        assert!(matches!(
            c.on_vignette_changed(20),
            Err(Error::Library { operation: "vignette", .. })
        ));

        assert_eq!(c.curve().strength(), 14);
        assert_eq!(c.vignette().radius(), 60);
        assert_eq!(c.stage(), Stage::Loaded);
    }

    #[test]
    fn test_keys() {
        assert_eq!(Command::from_key_text("q"), Some(Command::Quit));
        assert_eq!(Command::from_key_text("s"), Some(Command::Save));
        assert_eq!(Command::from_key_text("x"), Some(Command::Dismiss));
        assert_eq!(Command::from_key_text("Q"), Some(Command::Dismiss));
        assert_eq!(Command::from_key_text(""), None);

        let c = controller(gradient());
        assert_eq!(c.handle_key("").unwrap(), None);
        assert_eq!(c.handle_key("q").unwrap(), Some(SessionEnd::Quit));
        assert_eq!(c.handle_key("z").unwrap(), Some(SessionEnd::Dismissed));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OUTPUT_FILE);
        std::fs::write(&path, b"stale").unwrap();

        let mut c = controller(gradient()).with_output_path(&path);
        c.on_color_curve_changed(12).unwrap();
        c.on_vignette_changed(70).unwrap();

        assert_eq!(c.handle_key("s").unwrap(), Some(SessionEnd::Saved(path.clone())));

        let saved = load_image(&path).unwrap();
        let shown = c.displayed();
        assert_eq!(saved.dimensions(), shown.dimensions());

        let total: u64 = saved
            .as_raw()
            .iter()
            .zip(shown.as_raw())
            .map(|(a, b)| (*a as i32 - *b as i32).unsigned_abs() as u64)
            .sum();
        let mean = total as f64 / shown.as_raw().len() as f64;
        assert!(mean < 4.0, "mean abs error {mean}");
    }

    #[test]
    fn test_save_failure_is_library_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(OUTPUT_FILE);

        let c = controller(gradient()).with_output_path(path);
        let err = c.handle_key("s").unwrap_err();
        assert!(matches!(err, Error::Library { operation: "save", .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_image(Path::new("/definitely/not/here.png")).unwrap_err();
        match err {
            Error::ImageLoad { path, .. } => assert_eq!(path, PathBuf::from("/definitely/not/here.png")),
            e => panic!("unexpected error: {e:?}"),
        }
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"this is not a picture").unwrap();

        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, Error::ImageLoad { .. }));
        assert!(err.to_string().starts_with("Unable to open picture"));
    }

    #[test]
    fn test_mid_gray_scenario() {
        let img = RgbImage::from_pixel(100, 100, Rgb([128, 128, 128]));
        let mut c = controller(img);

        let curved = c.on_color_curve_changed(10).unwrap();
        assert!(curved.pixels().all(|p| p.0 == [128, 128, 128]));

        assert_eq!(c.vignette().effective_radius(100, 100), 50);
        let shown = c.on_vignette_changed(0).unwrap().clone();
        assert_eq!(c.vignette().effective_radius(100, 100), 1);

        assert_eq!(shown.get_pixel(50, 50).0, [128, 128, 128]);
        assert_eq!(shown.get_pixel(10, 10).0, [64, 64, 64]);
        let dark = shown.pixels().filter(|p| p.0 == [64, 64, 64]).count();
        assert!(dark > 100 * 100 - 10);
    }
}
