use core::fmt::Debug;
use std::path::{Path, PathBuf};

use dyn_clone::{DynClone, clone_trait_object};
use eyre::Result;
use futures::future::join_all;
use tokio::fs::create_dir_all;
use tracing::debug;

use crate::data::FigureData;

#[typetag::serde(tag = "type")]
#[async_trait::async_trait]
pub trait Plot: Debug + DynClone + Send + Sync {
    fn name(&self) -> &'static str;
    /// Renders a figure
    ///
    /// Arguments:
    /// * `figure` - Loaded latencies of every panel in the figure
    /// * `plot_path` - The directory to write into
    ///
    /// Returns the files that were written
    async fn plot(&self, figure: &FigureData, plot_path: &Path) -> Result<Vec<PathBuf>>;
}
clone_trait_object!(Plot);

pub async fn ensure_plot_dirs(dirs: &[PathBuf]) -> Result<()> {
    let create_jobs = dirs.iter().map(create_dir_all);
    for res in join_all(create_jobs).await {
        res?;
    }
    Ok(())
}

/// Runs every plot over every figure and collects the written files
pub async fn plot(
    plots: &[Box<dyn Plot>],
    figures: &[FigureData],
    plot_path: &Path,
) -> Result<Vec<PathBuf>> {
    if plots.is_empty() {
        debug!("No plots");
        return Ok(Vec::new());
    }

    ensure_plot_dirs(&[plot_path.to_path_buf()]).await?;
    let mut written = Vec::new();
    for figure in figures {
        for plot in plots {
            debug!("Running {} for {}", plot.name(), figure.name);
            written.extend(plot.plot(figure, plot_path).await?);
        }
    }
    Ok(written)
}
