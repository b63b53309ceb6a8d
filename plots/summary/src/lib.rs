use std::path::{Path, PathBuf};

use common::{data::FigureData, plot::Plot, stats::Summary};
use eyre::{ContextCompat, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Per-series mean, deviation and confidence interval written next to the figures
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Summaries {
    /// Pretty print the json
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureSummary {
    pub figure: String,
    pub title: String,
    pub panels: Vec<PanelSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSummary {
    pub title: String,
    pub series: Vec<SeriesSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub label: String,
    #[serde(flatten)]
    pub summary: Summary,
}

pub fn summarize(figure: &FigureData) -> Result<FigureSummary> {
    let panels = figure
        .panels
        .iter()
        .map(|panel| {
            let series = panel
                .series
                .iter()
                .map(|series| {
                    let summary = Summary::from_samples(&series.samples)
                        .with_context(|| format!("No samples in {}", series.label))?;
                    Ok(SeriesSummary {
                        label: series.label.clone(),
                        summary,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(PanelSummary {
                title: panel.title.clone(),
                series,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FigureSummary {
        figure: figure.name.clone(),
        title: figure.title.clone(),
        panels,
    })
}

#[async_trait::async_trait]
#[typetag::serde]
impl Plot for Summaries {
    fn name(&self) -> &'static str {
        "summary"
    }

    async fn plot(&self, figure: &FigureData, plot_path: &Path) -> Result<Vec<PathBuf>> {
        let summary = summarize(figure)?;
        for panel in &summary.panels {
            for s in &panel.series {
                info!(
                    "{} / {} / {}: {:.2} +/-{:.2} us (n={}, ci +/-{:.2})",
                    summary.figure,
                    panel.title,
                    s.label,
                    s.summary.mean,
                    s.summary.std_dev,
                    s.summary.n,
                    s.summary.ci
                );
            }
        }

        let filepath = plot_path.join(format!("{}.summary.json", figure.name));
        let json = if self.pretty {
            serde_json::to_string_pretty(&summary)?
        } else {
            serde_json::to_string(&summary)?
        };
        tokio::fs::write(&filepath, json).await?;
        Ok(vec![filepath])
    }
}
