use anyhow::Result;
use clap::Parser;
use digikam_select::select_core::convert::CONVERT_BIN;
use digikam_select::select_core::{
    Action, Cli, Config, ImageMagick, StdinPrompt, Verbosity, list_records, select_records,
    transfer_records,
};
use simplelog::{
    CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger, WriteLogger,
};
use std::fs::File;
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);

    // Initialize loggers; stdout is reserved for results
    let term_config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        verbosity.level_filter(),
        term_config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )];

    if cli.log {
        loggers.push(WriteLogger::new(
            cli.log_level,
            simplelog::Config::default(),
            File::create("digikam-select.log")?,
        ));
    }

    CombinedLogger::init(loggers)?;

    let config = Config::from_cli(&cli)?;
    let records = select_records(&config)?;

    match &config.action {
        Action::List(format) => {
            list_records(&records, *format, &mut io::stdout().lock())?;
        }

        Action::Transfer(opts) => {
            let converter = ImageMagick::with_binary(
                opts.convert_bin.clone().unwrap_or_else(|| CONVERT_BIN.into()),
            );
            let mut prompt = StdinPrompt::new();
            let report =
                transfer_records(&records, opts, config.verbosity, &converter, &mut prompt)?;

            if config.verbosity != Verbosity::Quiet {
                let dry = if opts.dry_run { " (dry run)" } else { "" };
                println!("\nDone{}:", dry);
                if opts.dry_run {
                    println!("  {} files would be written", report.planned);
                } else {
                    println!("  {} files written", report.materialized);
                }
                println!("  {} files skipped", report.skipped);
                if report.failed > 0 {
                    println!("  {} files failed", report.failed);
                }
                if opts.sync {
                    println!(
                        "  {} files {}",
                        report.removed,
                        if opts.dry_run { "would be removed" } else { "removed" }
                    );
                }
            }
        }
    }

    Ok(())
}
