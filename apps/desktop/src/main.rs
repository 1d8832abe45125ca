use aegis_desktop::cli::Cli;
use clap::Parser;

#[aegis_runtime::main(event_loop)]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let status = aegis_desktop::run(cli).await?;
    if !status.is_success() {
        std::process::exit(status.code());
    }
    Ok(())
}
