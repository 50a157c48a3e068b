use anyhow::Context;
use bank_accounts::{bank::Bank, config::Config, menu::Menu};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_args(std::env::args().skip(1));
    let mut bank = Bank::open(&config.accounts_file).with_context(|| {
        format!(
            "Failed to open accounts file {}",
            config.accounts_file.display()
        )
    })?;
    info!(
        path = %bank.path().display(),
        accounts = bank.view_all_accounts().len(),
        "opened accounts file"
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Menu::new(stdin.lock(), stdout.lock()).run(&mut bank)?;

    Ok(())
}

// Logs go to stderr so they never interleave with the menu on stdout.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
