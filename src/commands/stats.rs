use crate::aligned_read::AlignedReadReader;
use crate::assembler::{AlignmentAssembler, PipelineState, RunSummary};
use crate::error::MsaError;
use crate::filter::RejectReason;
use crate::reference::load_reference;
use log::info;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::Path;

/// Run the projection without writing any output and tally the outcomes
pub fn run_stats(
    reference_file: &Path,
    alignment_file: &Path,
    threads: NonZeroUsize,
) -> Result<RunSummary, MsaError> {
    info!("Running stats command");

    let reference = load_reference(reference_file, threads)?;
    let assembler = AlignmentAssembler::new(reference.len());
    let mut state = PipelineState::default();

    for read in AlignedReadReader::from_path(alignment_file, threads)? {
        assembler.process(&mut state, &read?)?;
    }

    Ok(state.summary)
}

/// Tab-separated summary, one reason per line
pub fn write_summary<W: Write>(mut out: W, summary: &RunSummary) -> io::Result<()> {
    writeln!(out, "reads\t{}", summary.reads_seen)?;
    writeln!(out, "rows\t{}", summary.rows_emitted)?;
    writeln!(out, "rejected\t{}", summary.total_rejected())?;
    for reason in RejectReason::ALL {
        writeln!(out, "{}\t{}", reason.label(), summary.rejected(reason))?;
    }
    Ok(())
}
