use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "repopage", version, about)]
pub struct Cli {
    /// GitHub login whose repositories to list. Defaults to `default_user`
    /// from the config, then to the authenticated user.
    pub user: Option<String>,

    /// Repositories per page (1-100)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub page_size: Option<u8>,

    /// Config file to use instead of the default location
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// API base URL, for GitHub Enterprise
    #[arg(long)]
    pub api_url: Option<String>,
}
