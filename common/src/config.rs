use std::path::{Path, PathBuf};

use eyre::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tokio::fs::read_to_string;

use crate::plot::Plot;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub name: String,
    #[serde(default)]
    pub settings: Settings,
    pub figures: Vec<Figure>,
    pub plots: Vec<Box<dyn Plot>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub criterion_dir: PathBuf,
    pub custom_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Number of indexed files per source, `<prefix>0.json` .. `<prefix>{runs-1}.json`
    pub runs: usize,
    /// Lower y limit for panels that don't set their own
    pub y_min: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            criterion_dir: PathBuf::from("criterion_data"),
            custom_dir: PathBuf::from("custom_bench_data"),
            output_dir: PathBuf::from("."),
            runs: 10,
            y_min: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// Output file stem
    pub name: String,
    #[serde(default = "default_figure_title")]
    pub title: String,
    #[serde(default = "default_figure_width")]
    pub width: u32,
    #[serde(default = "default_figure_height")]
    pub height: u32,
    pub panels: Vec<Panel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub title: String,
    pub source: Source,
    pub y_max: f64,
    pub y_min: Option<f64>,
}

impl Panel {
    pub fn y_range(&self, settings: &Settings) -> (f64, f64) {
        (self.y_min.unwrap_or(settings.y_min), self.y_max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    /// Criterion `sample.json` files with parallel `times` and `iters`
    Criterion { prefix: String },
    /// Flat arrays of nanoseconds written by the cache-timing harness
    Custom { prefix: String },
}

impl Source {
    pub fn prefix(&self) -> &str {
        match self {
            Source::Criterion { prefix } | Source::Custom { prefix } => prefix,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Source::Criterion { .. } => "criterion",
            Source::Custom { .. } => "custom",
        }
    }

    pub fn dir<'a>(&self, settings: &'a Settings) -> &'a Path {
        match self {
            Source::Criterion { .. } => &settings.criterion_dir,
            Source::Custom { .. } => &settings.custom_dir,
        }
    }
}

fn default_figure_title() -> String {
    "Sampling ed25519 verify".to_owned()
}

// 10x6 inches at 100 dpi
fn default_figure_width() -> u32 {
    1000
}

fn default_figure_height() -> u32 {
    600
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = read_to_string(path)
            .await
            .wrap_err_with(|| format!("Read config {}", path.display()))?;
        let config: Config = serde_yml::from_str(&raw)
            .wrap_err_with(|| format!("Parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.settings.runs == 0 {
            bail!("settings.runs must be at least 1");
        }
        for figure in &self.figures {
            if figure.panels.is_empty() {
                bail!("Figure {} has no panels", figure.name);
            }
            if figure.width == 0 || figure.height == 0 {
                bail!("Figure {} has an empty canvas", figure.name);
            }
            for panel in &figure.panels {
                let (lo, hi) = panel.y_range(&self.settings);
                if !(lo < hi) {
                    bail!(
                        "Panel {} of figure {} has an empty y range ({lo}, {hi})",
                        panel.title,
                        figure.name
                    );
                }
            }
        }
        Ok(())
    }
}
