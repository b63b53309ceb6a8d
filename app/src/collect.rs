use std::path::{Path, PathBuf};

use common::data::indexed_name;
use eyre::{Context, Result};
use futures::future::try_join_all;
use tokio::fs::{copy, create_dir_all};
use tracing::debug;

/// Where criterion keeps the raw samples of the latest run of `<group>/<id>`
fn sample_path(criterion_root: &Path, group: &str, id: usize) -> PathBuf {
    criterion_root
        .join(group)
        .join(id.to_string())
        .join("new")
        .join("sample.json")
}

/// Copies `<root>/<group>/<i>/new/sample.json` to `<dest>/<prefix><i>.json` for every run
pub async fn collect(
    criterion_root: &Path,
    group: &str,
    prefix: &str,
    dest: &Path,
    runs: usize,
) -> Result<usize> {
    create_dir_all(dest)
        .await
        .wrap_err_with(|| format!("Create {}", dest.display()))?;

    let copies = (0..runs).map(|i| {
        let from = sample_path(criterion_root, group, i);
        let to = dest.join(format!("{}.json", indexed_name(prefix, i)));
        async move {
            copy(&from, &to)
                .await
                .wrap_err_with(|| format!("Copy {} to {}", from.display(), to.display()))?;
            debug!("Copied {} to {}", from.display(), to.display());
            Ok::<_, eyre::Report>(())
        }
    });
    Ok(try_join_all(copies).await?.len())
}

#[cfg(test)]
mod tests {
    use common::data::load_criterion_data;

    use super::*;

    #[tokio::test]
    async fn copies_group_into_flat_layout() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("criterion");
        for i in 0..3 {
            let sample = sample_path(&root, "byz_samples_nowarmup", i);
            std::fs::create_dir_all(sample.parent().unwrap()).unwrap();
            std::fs::write(
                sample,
                format!(r#"{{"sampling_mode":"Flat","iters":[1.0],"times":[{}]}}"#, 60_000 + i),
            )
            .unwrap();
        }

        let dest = dir.path().join("criterion_data");
        let copied = collect(&root, "byz_samples_nowarmup", "byz_nowarmup", &dest, 3)
            .await
            .unwrap();
        assert_eq!(copied, 3);

        let data = load_criterion_data(&dest, "byz_nowarmup2").await.unwrap();
        assert_eq!(data, vec![60.002]);
    }

    #[tokio::test]
    async fn missing_run_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect(dir.path(), "traditional_group", "traditional", &dir.path().join("out"), 1)
            .await
            .unwrap_err();
        assert!(format!("{err}").contains("sample.json"));
    }
}
