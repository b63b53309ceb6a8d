use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use eyre::{Context, ContextCompat, Result};
use futures::future::try_join_all;
use itertools::Itertools;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tokio::fs::read_to_string;
use tracing::debug;

use crate::{
    NANOS_PER_MICRO,
    config::{Figure, Panel, Settings, Source},
};

#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("{}: {times} times but {iters} iteration counts", file.display())]
    LengthMismatch {
        file: PathBuf,
        times: usize,
        iters: usize,
    },
    #[error("{}: sample {index} has an iteration count of zero", file.display())]
    ZeroIterations { file: PathBuf, index: usize },
    #[error("{}: no samples", file.display())]
    Empty { file: PathBuf },
}

/// Raw criterion `sample.json`, other fields are ignored
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CriterionSample {
    pub iters: Vec<f64>,
    pub times: Vec<f64>,
}

impl CriterionSample {
    /// Per-iteration latency of every sample in microseconds
    pub fn latencies_us(&self, file: &Path) -> Result<Vec<f64>, DataError> {
        if self.times.len() != self.iters.len() {
            return Err(DataError::LengthMismatch {
                file: file.to_path_buf(),
                times: self.times.len(),
                iters: self.iters.len(),
            });
        }
        if self.times.is_empty() {
            return Err(DataError::Empty {
                file: file.to_path_buf(),
            });
        }
        self.times
            .iter()
            .zip(&self.iters)
            .enumerate()
            .map(|(index, (time, iters))| {
                if *iters == 0.0 {
                    Err(DataError::ZeroIterations {
                        file: file.to_path_buf(),
                        index,
                    })
                } else {
                    Ok(time / iters / NANOS_PER_MICRO)
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    /// Latencies in microseconds
    pub samples: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelData {
    pub title: String,
    pub y_range: (f64, f64),
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureData {
    pub name: String,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub panels: Vec<PanelData>,
}

pub fn indexed_name(prefix: &str, index: usize) -> String {
    format!("{prefix}{index}")
}

fn json_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

async fn read_json<T: DeserializeOwned>(file: &Path) -> Result<T> {
    let raw = read_to_string(file)
        .await
        .wrap_err_with(|| format!("Read {}", file.display()))?;
    serde_json::from_str(&raw).wrap_err_with(|| format!("Parse {}", file.display()))
}

/// Loads `<dir>/<name>.json` written by criterion and returns microseconds per iteration
pub async fn load_criterion_data(dir: &Path, name: &str) -> Result<Vec<f64>> {
    let file = json_path(dir, name);
    let sample: CriterionSample = read_json(&file).await?;
    let data = sample.latencies_us(&file)?;
    debug!("Loaded {} criterion samples from {}", data.len(), file.display());
    Ok(data)
}

async fn load_custom_file(dir: &Path, name: &str) -> Result<Vec<f64>> {
    let file = json_path(dir, name);
    let nanos: Vec<f64> = read_json(&file).await?;
    if nanos.is_empty() {
        return Err(DataError::Empty { file }.into());
    }
    debug!("Loaded {} custom samples from {}", nanos.len(), file.display());
    Ok(nanos.into_iter().map(|x| x / NANOS_PER_MICRO).collect())
}

pub async fn load_criterion_runs(dir: &Path, prefix: &str, runs: usize) -> Result<Vec<Vec<f64>>> {
    try_join_all((0..runs).map(|i| {
        let name = indexed_name(prefix, i);
        async move { load_criterion_data(dir, &name).await }
    }))
    .await
}

/// Loads `<dir>/<prefix>0.json` .. `<dir>/<prefix>{runs-1}.json`, each a list of nanoseconds
pub async fn load_custom_data(dir: &Path, prefix: &str, runs: usize) -> Result<Vec<Vec<f64>>> {
    try_join_all((0..runs).map(|i| {
        let name = indexed_name(prefix, i);
        async move { load_custom_file(dir, &name).await }
    }))
    .await
}

/// Loads every run of a source, labelled `<prefix><i>`
pub async fn load_source(settings: &Settings, source: &Source) -> Result<Vec<Series>> {
    let dir = source.dir(settings);
    let prefix = source.prefix();
    let runs = match source {
        Source::Criterion { .. } => load_criterion_runs(dir, prefix, settings.runs).await,
        Source::Custom { .. } => load_custom_data(dir, prefix, settings.runs).await,
    }
    .wrap_err_with(|| format!("Load {} {prefix}", source.kind()))?;

    Ok(runs
        .into_iter()
        .enumerate()
        .map(|(i, samples)| Series {
            label: indexed_name(prefix, i),
            samples,
        })
        .collect())
}

fn panel_data(settings: &Settings, panel: &Panel, series: Vec<Series>) -> PanelData {
    PanelData {
        title: panel.title.clone(),
        y_range: panel.y_range(settings),
        series,
    }
}

pub async fn load_panel(settings: &Settings, panel: &Panel) -> Result<PanelData> {
    let series = load_source(settings, &panel.source)
        .await
        .wrap_err_with(|| format!("Load panel {}", panel.title))?;
    Ok(panel_data(settings, panel, series))
}

pub async fn load_figure(settings: &Settings, figure: &Figure) -> Result<FigureData> {
    let panels = try_join_all(figure.panels.iter().map(|p| load_panel(settings, p))).await?;
    Ok(FigureData {
        name: figure.name.clone(),
        title: figure.title.clone(),
        width: figure.width,
        height: figure.height,
        panels,
    })
}

/// Sources referenced by the figures, each once, in first-use order
pub fn unique_sources(figures: &[Figure]) -> Vec<&Source> {
    figures
        .iter()
        .flat_map(|f| &f.panels)
        .map(|p| &p.source)
        .unique()
        .collect()
}

/// Builds figure data from sources that were already loaded
pub fn assemble_figures(
    settings: &Settings,
    figures: &[Figure],
    loaded: &HashMap<Source, Vec<Series>>,
) -> Result<Vec<FigureData>> {
    figures
        .iter()
        .map(|figure| {
            let panels = figure
                .panels
                .iter()
                .map(|panel| {
                    let series = loaded.get(&panel.source).with_context(|| {
                        format!(
                            "{} {} was not loaded",
                            panel.source.kind(),
                            panel.source.prefix()
                        )
                    })?;
                    Ok(panel_data(settings, panel, series.clone()))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(FigureData {
                name: figure.name.clone(),
                title: figure.title.clone(),
                width: figure.width,
                height: figure.height,
                panels,
            })
        })
        .collect()
}
