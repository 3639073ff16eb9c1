use crate::aligned_read::{AlignedRead, AlignedReadReader};
use crate::assembler::{AlignmentAssembler, PipelineState, ReadOutcome, RunSummary};
use crate::error::MsaError;
use crate::msa_writer::MsaWriter;
use crate::reference::{load_reference, ReferenceSequence};
use log::info;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::Path;

/// Convert an alignment file into a reference-anchored MSA plus a name mapping
pub fn run_convert(
    reference_file: &Path,
    alignment_file: &Path,
    output: &Path,
    name_mapping: &Path,
    name_prefix: &str,
    threads: NonZeroUsize,
) -> Result<RunSummary, MsaError> {
    info!("Running convert command");

    let reference = load_reference(reference_file, threads)?;
    info!(
        "Reference {}: {} bp from {}",
        reference.name,
        reference.len(),
        reference_file.display()
    );

    let reads = AlignedReadReader::from_path(alignment_file, threads)?;
    let mut writer = MsaWriter::create(output, name_mapping, &reference)?;
    let mut state = PipelineState::new(name_prefix);

    let result = convert_reads(&reference, reads, &mut writer, &mut state);
    // Rows written before a fatal error stay on disk
    let finished = writer.finish();
    result?;
    finished?;

    let summary = state.summary;
    info!(
        "Processed {} reads: {} rows written, {} rejected",
        summary.reads_seen,
        summary.rows_emitted,
        summary.total_rejected()
    );
    info!("Alignment written to {}", output.display());
    info!("Name mapping written to {}", name_mapping.display());

    Ok(summary)
}

/// Stream `reads` through the assembler into `writer`, stopping at the first fatal error
pub fn convert_reads<I, W>(
    reference: &ReferenceSequence,
    reads: I,
    writer: &mut MsaWriter<W>,
    state: &mut PipelineState,
) -> Result<(), MsaError>
where
    I: IntoIterator<Item = Result<AlignedRead, MsaError>>,
    W: Write,
{
    let assembler = AlignmentAssembler::new(reference.len());

    for read in reads {
        let read = read?;
        if let ReadOutcome::Emitted(row, mapping) = assembler.process(state, &read)? {
            writer.write_row(&row, &mapping)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cigar::parse_cigar;

    fn reference() -> ReferenceSequence {
        ReferenceSequence {
            name: "ref".to_string(),
            bases: b"ACGTACGTACGTACGTACGT".to_vec(),
        }
    }

    fn read(name: &str, start: usize, end: usize, cigar: &str, seq: &str) -> Result<AlignedRead, MsaError> {
        Ok(AlignedRead {
            query_name: name.to_string(),
            query_sequence: seq.as_bytes().to_vec(),
            reference_start: start,
            reference_end: end,
            cigar_ops: parse_cigar(cigar).unwrap(),
        })
    }

    fn run(reads: Vec<Result<AlignedRead, MsaError>>) -> (Result<(), MsaError>, String, String, PipelineState) {
        let reference = reference();
        let mut writer = MsaWriter::new(Vec::new(), Vec::new(), &reference).unwrap();
        let mut state = PipelineState::default();
        let result = convert_reads(&reference, reads, &mut writer, &mut state);
        let (alignment, mapping) = writer.finish().unwrap();
        (
            result,
            String::from_utf8(alignment).unwrap(),
            String::from_utf8(mapping).unwrap(),
            state,
        )
    }

    #[test]
    fn test_example_scenarios() {
        let (result, alignment, mapping, state) = run(vec![
            read("s1", 5, 15, "10M", "ACGTACGTAC"),
            read("s2", 5, 12, "3S7M", "TTTACGTACG"),
            read("s3", 0, 10, "4M2D4M", "AAAACCCC"),
            read("s4", 0, 10, "10M5H", "ACGTACGTAC"),
            read("s5", 15, 25, "10M", "ACGTACGTAC"),
            read("s6", 10, 20, "10M5S", "ACGTACGTACGGGGG"),
        ]);
        assert!(result.is_ok());
        assert_eq!(
            alignment,
            ">ref\nACGTACGTACGTACGTACGT\n\
             >amplicon_1\t10\t6\t15\n-----ACGTACGTAC-----\n\
             >amplicon_2\t10\t6\t12\n--TTTACGTACG--------\n\
             >amplicon_3\t8\t1\t10\nAAAA--CCCC----------\n"
        );
        assert_eq!(mapping, "s1\tamplicon_1\ns2\tamplicon_2\ns3\tamplicon_3\n");
        assert_eq!(state.summary.rows_emitted, 3);
        assert_eq!(state.summary.total_rejected(), 3);
    }

    #[test]
    fn test_fatal_operation_stops_the_stream() {
        let (result, alignment, mapping, _) = run(vec![
            read("first", 0, 4, "4M", "ACGT"),
            read("bad", 0, 4, "2M2=", "ACGT"),
            read("after", 0, 4, "4M", "ACGT"),
        ]);
        assert!(matches!(
            result,
            Err(MsaError::UnhandledCigarOperation { ref read_name, op: '=' }) if read_name == "bad"
        ));
        assert_eq!(
            alignment,
            ">ref\nACGTACGTACGTACGTACGT\n>amplicon_1\t4\t1\t4\nACGT----------------\n"
        );
        assert_eq!(mapping, "first\tamplicon_1\n");
    }

    #[test]
    fn test_names_match_between_outputs() {
        let (_, alignment, mapping, _) = run(vec![
            read("a", 0, 4, "4M", "ACGT"),
            read("b", 2, 20, "2M", "AC"),
            read("long", 10, 20, "10M5S", "ACGTACGTACGGGGG"),
            read("c", 1, 5, "4M", "ACGT"),
        ]);
        let msa_names: Vec<&str> = alignment
            .lines()
            .skip(2)
            .filter_map(|l| l.strip_prefix('>'))
            .map(|l| l.split('\t').next().unwrap())
            .collect();
        let mapped_names: Vec<&str> = mapping
            .lines()
            .map(|l| l.split('\t').nth(1).unwrap())
            .collect();
        assert_eq!(msa_names, mapped_names);
        assert_eq!(msa_names, vec!["amplicon_1", "amplicon_2", "amplicon_4"]);
    }

    #[test]
    fn test_input_error_is_propagated() {
        let (result, _, _, _) = run(vec![
            read("a", 0, 4, "4M", "ACGT"),
            Err(MsaError::AlignmentInput("truncated file".to_string())),
        ]);
        assert!(matches!(result, Err(MsaError::AlignmentInput(_))));
    }
}
