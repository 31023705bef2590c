use std::path::PathBuf;

use anyhow::Context;
use autodatasets::ui::table::dataset_table;
use autodatasets::ui::tracker::progress_reporter;
use autodatasets::{AutoDatasets, ListFilter, Settings};
use autodatasets_fetch::{FetchOptions, Fetcher, ReqwestClient};
use clap::{Parser, Subcommand};

const USER_AGENT: &str = concat!("autodatasets/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Parser)]
#[command(
    name = "autodatasets",
    version,
    about = "Download, verify and cache machine-learning datasets"
)]
pub struct App {
    /// Dataset registry to read and update [default: <cache-dir>/datasets.csv]
    #[arg(long, global = true, env = "AUTODATASETS_REGISTRY", value_name = "PATH")]
    registry: Option<PathBuf>,

    /// Cache directory [default: ~/.autodatasets]
    #[arg(long, global = true, env = "AUTODATASETS_HOME", value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show registered datasets, without resource addresses and checksums
    #[command(visible_alias = "ls")]
    List(List),

    /// Download a dataset into the cache and print its local paths
    Download(Download),
}

#[derive(Debug, clap::Args)]
struct List {
    #[arg(long)]
    name: Option<String>,

    #[arg(long = "type", value_name = "TYPE")]
    kind: Option<String>,

    #[arg(long)]
    task: Option<String>,
}

#[derive(Debug, clap::Args)]
struct Download {
    /// Dataset name as listed in the registry
    name: String,

    /// Re-download even when the cached files match their checksums
    #[arg(long, short)]
    force: bool,
}

impl App {
    pub async fn run(self) -> anyhow::Result<()> {
        let settings = Settings::resolve(self.cache_dir, self.registry)?;
        settings.seed_registry()?;

        let client = ReqwestClient::new().context("failed to build the HTTP client")?;
        let options = FetchOptions::default()
            .header("User-Agent", USER_AGENT)
            .on_progress(progress_reporter());
        let fetcher = Fetcher::new(client).with_options(options);

        let mut datasets = AutoDatasets::open(&settings, fetcher).with_context(|| {
            format!("failed to open registry {}", settings.registry_path.display())
        })?;

        match self.command {
            Command::List(list) => list.run(&datasets),
            Command::Download(download) => download.run(&mut datasets).await,
        }
    }
}

impl List {
    fn run(self, datasets: &AutoDatasets<ReqwestClient>) -> anyhow::Result<()> {
        let filter = ListFilter {
            name: self.name,
            kind: self.kind,
            task: self.task,
        };
        let listings = datasets.list(&filter)?;
        println!("{}", dataset_table(&listings));
        Ok(())
    }
}

impl Download {
    async fn run(self, datasets: &mut AutoDatasets<ReqwestClient>) -> anyhow::Result<()> {
        let paths = datasets
            .download_dataset_with(&self.name, self.force)
            .await
            .with_context(|| format!("failed to download dataset {}", self.name))?;
        for path in paths {
            println!("{}", path.display());
        }
        Ok(())
    }
}
