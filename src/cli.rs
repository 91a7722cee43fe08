use crate::constants::{DEFAULT_ADMISSION_LIMIT_KB, DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "batch-squeeze",
    about = "Re-encode batches of images at a chosen quality and bundle the results",
    long_about = "batch-squeeze re-encodes JPEG, PNG and WebP images at a chosen quality, \
                  keeping each image's format and dimensions. A single input produces a single \
                  compressed file; several inputs produce one ZIP archive. Images that cannot be \
                  re-encoded are reported and skipped without stopping the batch.",
    version,
    after_help = "EXAMPLES:\n  \
    batch-squeeze compress photo.jpg -q 60\n  \
    batch-squeeze compress ./images -r -o ./out\n  \
    batch-squeeze compress \"shots/*.png\" --limit-kb 50000\n  \
    batch-squeeze info photo.png"
)]
pub struct Args {
    #[arg(long, global = true, help = "Only log errors")]
    pub quiet: bool,

    #[arg(short = 'v', long, global = true, help = "Log each processed item")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Compress one or more images",
        long_about = "Re-encode every input at the given quality. One input is written as \
                      compressed_<name>; several inputs are written as compressed_images.zip."
    )]
    Compress {
        #[arg(
            required = true,
            help = "Input files, directories, or glob patterns",
            long_help = "Inputs are processed in the order given. Directories and glob patterns \
                         expand to their jpg, jpeg, png and webp files, sorted by name."
        )]
        inputs: Vec<String>,

        #[arg(short = 'o', long, default_value = ".", help = "Output directory")]
        output: PathBuf,

        #[arg(
            short = 'q',
            long,
            default_value_t = DEFAULT_QUALITY,
            value_parser = clap::value_parser!(u8).range(MIN_QUALITY as i64..=MAX_QUALITY as i64),
            help = "Compression quality (10-95, lower = smaller file)",
            long_help = "Compression quality from 10 (smallest) to 95 (best fidelity). \
                         JPEG and WebP are re-encoded lossily at this quality. \
                         For PNG: >=90 uses Zopfli, >=70 uses high compression, <70 uses standard compression."
        )]
        quality: u8,

        #[arg(
            long,
            env = "BATCH_SQUEEZE_LIMIT_KB",
            default_value_t = DEFAULT_ADMISSION_LIMIT_KB,
            help = "Maximum total input size in KB",
            long_help = "Batches whose inputs add up to more than this many KB are rejected \
                         before any image is read."
        )]
        limit_kb: u64,

        #[arg(short = 'r', long, help = "Process subdirectories recursively")]
        recursive: bool,
    },

    #[command(
        about = "Display image information",
        long_about = "Show the detected format, dimensions and colour type of an image, \
                      and the format it would be re-encoded as."
    )]
    Info {
        #[arg(help = "Image file path to analyze")]
        input: PathBuf,
    },
}
