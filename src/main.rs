use clap::Parser;
use csvcheck::utils::{logger, validation::Validate};
use csvcheck::{CheckError, CliConfig, Validator};

fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger();
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = run(&config) {
        if e.is_verdict() {
            println!("{}", e);
        } else {
            tracing::debug!("{} (severity: {:?})", e, e.severity());
            eprintln!("csvcheck: {}", e);
        }
        std::process::exit(e.exit_code());
    }
}

fn run(config: &CliConfig) -> Result<(), CheckError> {
    config.validate()?;

    let summary = Validator::new().check_path(&config.path)?;
    tracing::info!(
        "{} is consistent: {} records",
        config.path.display(),
        summary.records
    );
    Ok(())
}
