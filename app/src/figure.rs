use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use common::{
    config::Config,
    data::{assemble_figures, load_source, unique_sources},
    plot::plot,
};
use eyre::Result;
use futures::future::try_join_all;
use indicatif::ProgressBar;
use tracing::debug;

pub async fn list_figures(config_file: &Path) -> Result<()> {
    let config = Config::load(config_file).await?;
    println!("{}", config.name);
    for figure in &config.figures {
        println!(
            "{} -> {}",
            figure.title,
            config.settings.output_dir.join(&figure.name).display()
        );
        for panel in &figure.panels {
            let (lo, hi) = panel.y_range(&config.settings);
            println!(
                "    {}: {} {}[0..{}] y=({lo}, {hi})",
                panel.title,
                panel.source.kind(),
                panel.source.prefix(),
                config.settings.runs
            );
        }
    }
    Ok(())
}

pub async fn plot_figures(config_file: &Path, no_progress: bool) -> Result<Vec<PathBuf>> {
    let config = Config::load(config_file).await?;
    debug!(
        "Loaded {} with {} figures and {} plots",
        config.name,
        config.figures.len(),
        config.plots.len()
    );

    let sources = unique_sources(&config.figures);
    let progress = if no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(sources.len() as u64)
    };

    let loaded = try_join_all(sources.into_iter().map(|source| {
        let progress = progress.clone();
        let settings = &config.settings;
        async move {
            let series = load_source(settings, source).await?;
            progress.inc(1);
            Ok::<_, eyre::Report>((source.clone(), series))
        }
    }))
    .await?
    .into_iter()
    .collect::<HashMap<_, _>>();
    progress.finish_and_clear();
    debug!("Loaded {} distinct sources", loaded.len());

    let figures = assemble_figures(&config.settings, &config.figures, &loaded)?;
    plot(&config.plots, &figures, &config.settings.output_dir).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: PathBuf, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[tokio::test]
    async fn plots_summaries_for_configured_figures() {
        // violin crate must be linked for its tag to resolve
        let _ = (violin::Violin::default(), summary::Summaries::default());

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for i in 0..2 {
            write(
                root.join(format!("criterion_data/traditional{i}.json")),
                r#"{"iters":[1.0,2.0],"times":[60000.0,124000.0]}"#,
            );
            write(
                root.join(format!("custom_bench_data/no_flush{i}.json")),
                "[61000, 63000]",
            );
        }

        let config = format!(
            r#"
name: ed25519
settings:
  criterion_dir: {root}/criterion_data
  custom_dir: {root}/custom_bench_data
  output_dir: {root}/out
  runs: 2
figures:
  - name: mixed
    panels:
      - title: Random Samples
        source: {{ kind: criterion, prefix: traditional }}
        y_max: 65
      - title: No cache flush
        source: {{ kind: custom, prefix: no_flush }}
        y_max: 70
plots:
  - type: Summaries
"#,
            root = root.display()
        );
        let config_file = root.join("config.yaml");
        std::fs::write(&config_file, config).unwrap();

        let written = plot_figures(&config_file, true).await.unwrap();
        assert_eq!(written, vec![root.join("out/mixed.summary.json")]);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(value["title"], "Sampling ed25519 verify");
        assert_eq!(value["panels"][0]["series"][1]["label"], "traditional1");
        assert_eq!(value["panels"][0]["series"][0]["mean"], 61.0);
        assert_eq!(value["panels"][1]["series"][0]["mean"], 62.0);
    }

    #[tokio::test]
    async fn shipped_config_describes_the_three_figures() {
        let _ = (violin::Violin::default(), summary::Summaries::default());

        let config = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/../config.yaml"))
            .await
            .unwrap();
        let names = config
            .figures
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "criterion_sampling",
                "criterion_sampling_no_warmup",
                "custom_bench"
            ]
        );
        // byz_warmup is shared by the first two figures
        assert_eq!(unique_sources(&config.figures).len(), 5);
        assert_eq!(config.figures[2].title, "Invalidating caches");
        assert_eq!(
            config.figures[2].panels[1].y_range(&config.settings),
            (50.0, 70.0)
        );
        assert_eq!(
            config.plots.iter().map(|p| p.name()).collect::<Vec<_>>(),
            vec!["violin", "summary"]
        );
    }

    #[tokio::test]
    async fn missing_data_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let config = format!(
            r#"
name: ed25519
settings:
  custom_dir: {root}/nothing_here
  output_dir: {root}/out
figures:
  - name: custom_bench
    panels:
      - title: No cache flush
        source: {{ kind: custom, prefix: no_flush }}
        y_max: 70
plots: []
"#,
            root = root.display()
        );
        let config_file = root.join("config.yaml");
        std::fs::write(&config_file, config).unwrap();
        assert!(plot_figures(&config_file, true).await.is_err());
    }
}
