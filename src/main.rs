use clap::Parser;
use log::info;
use sam2msa::assembler::DEFAULT_NAME_PREFIX;
use sam2msa::commands::{convert, stats};
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Common options shared between all commands
#[derive(Parser, Debug)]
struct CommonOpts {
    /// Path to the single-contig reference FASTA (plain or BGZF-compressed).
    #[clap(short = 'r', long, value_parser)]
    reference: PathBuf,

    /// Path to the aligned reads (SAM, BAM or CRAM).
    #[clap(short = 'a', long, value_parser)]
    alignments: PathBuf,

    /// Number of threads for decompressing the inputs.
    #[clap(short = 't', long, value_parser, default_value_t = NonZeroUsize::new(1).unwrap())]
    num_threads: NonZeroUsize,

    /// Verbosity level (0 = warn, 1 = info, 2 = debug)
    #[clap(short, long, default_value = "1")]
    verbose: u8,
}

/// Convert reference-aligned reads into a fixed-width multiple sequence alignment.
#[derive(Parser, Debug)]
#[command(author, version, about, disable_help_subcommand = true)]
enum Args {
    /// Write the alignment and the read name mapping
    Convert {
        #[clap(flatten)]
        common: CommonOpts,

        /// Path of the alignment file to write
        #[clap(short = 'o', long, value_parser)]
        output: PathBuf,

        /// Path of the original-to-assigned read name mapping to write
        #[clap(short = 'm', long, value_parser)]
        name_mapping: PathBuf,

        /// Prefix of the names given to alignment rows
        #[clap(long, value_parser, default_value = DEFAULT_NAME_PREFIX)]
        name_prefix: String,
    },
    /// Count the reads that would be written or rejected, without writing anything
    Stats {
        #[clap(flatten)]
        common: CommonOpts,
    },
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    match args {
        Args::Convert {
            common,
            output,
            name_mapping,
            name_prefix,
        } => {
            initialize_logger(&common);
            convert::run_convert(
                &common.reference,
                &common.alignments,
                &output,
                &name_mapping,
                &name_prefix,
                common.num_threads,
            )?;
        }
        Args::Stats { common } => {
            initialize_logger(&common);
            let summary = stats::run_stats(&common.reference, &common.alignments, common.num_threads)?;
            info!("Processed {} reads", summary.reads_seen);
            stats::write_summary(io::stdout().lock(), &summary)?;
        }
    }

    Ok(())
}

fn initialize_logger(common: &CommonOpts) {
    env_logger::Builder::new()
        .filter_level(match common.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();
}
