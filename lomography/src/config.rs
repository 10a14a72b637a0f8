use anyhow::{Context, Result, bail};
use log::debug;
use once_cell::sync::Lazy;
use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::Mutex};

const CARGO_TOML: &str = include_str!("../Cargo.toml");
static CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| Mutex::new(Config::default()));

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(skip)]
    pub is_first_run: bool,

    #[serde(skip)]
    pub app_name: String,

    #[serde(default)]
    pub preview: Preview,

    #[serde(default)]
    pub output: Output,
}

/// Initial slider positions
#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Preview {
    #[derivative(Default(value = "10"))]
    pub strength: i32,

    #[derivative(Default(value = "100"))]
    pub radius: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Output {
    #[derivative(Default(value = "95"))]
    pub jpeg_quality: u8,
}

impl Config {
    /// Locates the config file and loads it, writing defaults on first run.
    pub fn init(&mut self) -> Result<()> {
        let metadata =
            toml::from_str::<toml::Table>(CARGO_TOML).with_context(|| "parse Cargo.toml failed")?;

        self.app_name = metadata
            .get("package")
            .and_then(|package| package.get("name"))
            .and_then(|name| name.as_str())
            .unwrap_or("lomography")
            .to_string();

        let app_dirs = AppDirs::new(Some(&self.app_name), true)
            .with_context(|| "no platform config directory")?;

        self.config_path = app_dirs
            .config_dir
            .join(format!("{}.toml", self.app_name));
        fs::create_dir_all(&app_dirs.config_dir)?;

        self.load().with_context(|| "load config file failed")?;
        debug!("{:?}", self);
        Ok(())
    }

    fn load(&mut self) -> Result<()> {
        match fs::read_to_string(&self.config_path) {
            Ok(text) => match Self::parse(&text) {
                Ok(mut c) => {
                    c.config_path = self.config_path.clone();
                    c.is_first_run = self.is_first_run;
                    c.app_name = self.app_name.clone();
                    *self = c;

                    Ok(())
                }
                Err(e) => {
                    log::warn!("invalid config {}: {e}", self.config_path.display());
                    self.reset()
                }
            },
            Err(_) => self.reset(),
        }
    }

    fn parse(text: &str) -> Result<Config> {
        Ok(toml::from_str::<Config>(text)?)
    }

    /// Back up whatever is on disk and write the defaults in its place.
    fn reset(&mut self) -> Result<()> {
        self.is_first_run = true;

        if let Some(bak_file) = &self.config_path.as_os_str().to_str() {
            _ = fs::copy(&self.config_path, format!("{}.bak", bak_file));
        }

        self.save()
    }

    pub fn save(&self) -> Result<()> {
        match toml::to_string_pretty(self) {
            Ok(text) => Ok(fs::write(&self.config_path, text)
                .with_context(|| "save config failed".to_string())?),
            Err(e) => bail!(format!("convert config from toml format failed. {e:?}")),
        }
    }
}

/// Initializes the global configuration, falling back to defaults on error.
pub fn init() {
    let mut config = CONFIG.lock().unwrap_or_else(|e| e.into_inner());
    if let Err(e) = config.init() {
        log::warn!("{e:?}, using default config");
    }
}

pub fn all() -> Config {
    CONFIG.lock().unwrap_or_else(|e| e.into_inner()).clone()
}
