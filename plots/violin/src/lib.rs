use std::path::{Path, PathBuf};

use common::{
    data::{FigureData, PanelData},
    plot::Plot,
    stats::ViolinStats,
};
use eyre::{ContextCompat, Result};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use tracing::{debug, warn};

pub mod geometry;
pub mod render;
pub mod style;

use crate::{geometry::count_outside, render::render_figure, style::ViolinStyle};

/// One SVG per figure, a violin per series and a subplot per panel
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Violin {
    #[serde(default)]
    pub style: ViolinStyle,
}

#[async_trait::async_trait]
#[typetag::serde]
impl Plot for Violin {
    fn name(&self) -> &'static str {
        "violin"
    }

    async fn plot(&self, figure: &FigureData, plot_path: &Path) -> Result<Vec<PathBuf>> {
        let filepath = plot_path.join(format!("{}.svg", figure.name));
        let violin = self.clone();
        let figure = figure.clone();
        let target = filepath.clone();
        spawn_blocking(move || {
            let panels = figure
                .panels
                .iter()
                .map(|panel| Ok((panel.clone(), violin.panel_stats(&figure.name, panel)?)))
                .collect::<Result<Vec<_>>>()?;
            render_figure(
                &target,
                (figure.width, figure.height),
                &figure.title,
                &panels,
                &violin.style,
            )
        })
        .await??;

        debug!("Wrote {}", filepath.display());
        Ok(vec![filepath])
    }
}

impl Violin {
    fn panel_stats(&self, figure: &str, panel: &PanelData) -> Result<Vec<ViolinStats>> {
        for series in &panel.series {
            let hidden = count_outside(&series.samples, panel.y_range);
            if hidden > 0 {
                warn!(
                    "{figure}/{}: {hidden} of {} samples of {} lie outside {:?}",
                    panel.title,
                    series.samples.len(),
                    series.label,
                    panel.y_range
                );
            }
        }

        panel
            .series
            .par_iter()
            .map(|series| {
                ViolinStats::compute(&series.samples, self.style.points, &self.style.quantiles)
                    .with_context(|| format!("No samples in {} of {figure}", series.label))
            })
            .collect()
    }
}
