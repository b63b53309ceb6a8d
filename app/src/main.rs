use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use tracing::error;
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

mod collect;
mod figure;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, default_value_t = false)]
    no_progress: bool,
    #[arg(short, long)]
    log: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured figures
    Ls {
        #[arg(short, long, default_value = "config.yaml")]
        config_file: PathBuf,
    },
    /// Render every configured figure
    Plot {
        #[arg(short, long, default_value = "config.yaml")]
        config_file: PathBuf,
    },
    /// Copy criterion's sample.json files into the flat data layout
    Collect {
        /// Criterion output folder
        #[arg(long, default_value = "target/criterion")]
        criterion_root: PathBuf,
        /// Benchmark group, ie. byz_samples_warmup
        #[arg(short, long)]
        group: String,
        /// File prefix, ie. byz_warmup
        #[arg(short, long)]
        prefix: String,
        #[arg(short, long, default_value = "criterion_data")]
        dest: PathBuf,
        #[arg(short, long, default_value_t = 10)]
        runs: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("warn".to_owned());
    let args = Cli::parse();
    let file_appender = tracing_appender::rolling::never(".", "log.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let mut env_filter = EnvFilter::new(format!("sampling_plots={log_level}"));

    if !args.log.is_empty() {
        for log in &args.log {
            env_filter = env_filter.add_directive(log.parse()?);
        }
    }

    for module in default_plots::PLOT_CRATES {
        if !args.log.iter().any(|x| x.starts_with(module)) {
            env_filter = env_filter.add_directive(format!("{module}={log_level}").parse()?);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            layer()
                .with_timer(ChronoLocal::new("%v %k:%M:%S %z".to_owned()))
                .compact(),
        )
        .with(layer().with_writer(non_blocking))
        .init();

    default_plots::init_plots();

    let result = match args.command {
        Commands::Ls { config_file } => figure::list_figures(&config_file).await,
        Commands::Plot { config_file } => figure::plot_figures(&config_file, args.no_progress)
            .await
            .map(|written| {
                for file in written {
                    println!("{}", file.display());
                }
            }),
        Commands::Collect {
            criterion_root,
            group,
            prefix,
            dest,
            runs,
        } => collect::collect(&criterion_root, &group, &prefix, &dest, runs)
            .await
            .map(|copied| println!("Copied {copied} files into {}", dest.display())),
    };

    if let Err(err) = &result {
        error!("{err:#?}");
    }
    result
}
