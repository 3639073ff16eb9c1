//! Aligned reads as produced by an external aligner
//!
//! SAM, BAM and CRAM are read through htslib, which detects the format from
//! the file contents.

use crate::cigar::{format_cigar, CigarOp};
use crate::error::MsaError;
use log::debug;
use rust_htslib::bam::{self, Read as _};
use std::num::NonZeroUsize;
use std::path::Path;

/// One alignment record, reduced to what the projection needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRead {
    pub query_name: String,
    pub query_sequence: Vec<u8>,
    /// 0-based
    pub reference_start: usize,
    /// 0-based, exclusive
    pub reference_end: usize,
    pub cigar_ops: Vec<CigarOp>,
}

impl AlignedRead {
    /// Build a read from an htslib record. The end coordinate is derived from the CIGAR.
    pub fn from_record(record: &bam::Record) -> Self {
        let cigar = record.cigar();
        AlignedRead {
            query_name: String::from_utf8_lossy(record.qname()).into_owned(),
            query_sequence: record.seq().as_bytes(),
            reference_start: record.pos().max(0) as usize,
            reference_end: cigar.end_pos().max(0) as usize,
            cigar_ops: cigar.iter().map(CigarOp::from).collect(),
        }
    }

    pub fn cigar_string(&self) -> String {
        format_cigar(&self.cigar_ops)
    }
}

/// Streams [`AlignedRead`]s from an alignment file in file order
pub struct AlignedReadReader {
    reader: bam::Reader,
    record: bam::Record,
}

impl AlignedReadReader {
    pub fn from_path(path: &Path, threads: NonZeroUsize) -> Result<Self, MsaError> {
        let mut reader = bam::Reader::from_path(path).map_err(|e| {
            MsaError::AlignmentInput(format!(
                "Failed to open alignment file '{}': {}",
                path.display(),
                e
            ))
        })?;

        if threads.get() > 1 {
            reader.set_threads(threads.get()).map_err(|e| {
                MsaError::AlignmentInput(format!(
                    "Failed to set {} reader threads for '{}': {}",
                    threads,
                    path.display(),
                    e
                ))
            })?;
        }
        debug!("Opened alignment file {}", path.display());

        Ok(AlignedReadReader {
            reader,
            record: bam::Record::new(),
        })
    }
}

impl Iterator for AlignedReadReader {
    type Item = Result<AlignedRead, MsaError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read(&mut self.record)? {
            Ok(()) => Some(Ok(AlignedRead::from_record(&self.record))),
            Err(e) => Some(Err(MsaError::AlignmentInput(format!(
                "Failed to read alignment record: {}",
                e
            )))),
        }
    }
}
