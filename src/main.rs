use anyhow::Context;
use batch_squeeze::cli::{Args, Commands};
use batch_squeeze::{commands, logger, AdmissionLimit, Quality};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose);

    match args.command {
        Commands::Compress {
            inputs,
            output,
            quality,
            limit_kb,
            recursive,
        } => {
            let quality = Quality::new(quality)?;
            let limit = AdmissionLimit::from_kb(limit_kb);
            commands::compress(&inputs, &output, quality, limit, recursive)
                .context("compression failed")?;
        }
        Commands::Info { input } => {
            commands::info(&input)
                .with_context(|| format!("could not inspect {}", input.display()))?;
        }
    }

    Ok(())
}
