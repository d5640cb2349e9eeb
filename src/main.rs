use arctic_precip::cli::{run, Cli};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli)
}
