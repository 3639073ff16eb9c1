//! Per-read assembly of alignment rows
//!
//! Each read goes through the filter, then the CIGAR projection, then is
//! right-padded to the reference width. Counters live in [`PipelineState`],
//! which the caller owns and passes to every call.

use crate::aligned_read::AlignedRead;
use crate::cigar::{self, GAP};
use crate::error::MsaError;
use crate::filter::{check_read, RejectReason};
use log::{debug, error, warn};
use rustc_hash::FxHashMap;

pub const DEFAULT_NAME_PREFIX: &str = "amplicon_";

/// One line pair of the alignment file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRow {
    pub assigned_name: String,
    pub query_index_consumed: usize,
    pub reference_start_1based: usize,
    pub reference_end: usize,
    pub gapped_sequence: Vec<u8>,
}

/// Original read name to assigned row name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMapping {
    pub original_query_name: String,
    pub assigned_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Emitted(AlignmentRow, NameMapping),
    Rejected(RejectReason),
}

/// Tallies for a run
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub reads_seen: usize,
    pub rows_emitted: usize,
    rejections: FxHashMap<RejectReason, usize>,
}

impl RunSummary {
    pub fn record_rejection(&mut self, reason: RejectReason) {
        *self.rejections.entry(reason).or_insert(0) += 1;
    }

    pub fn rejected(&self, reason: RejectReason) -> usize {
        self.rejections.get(&reason).copied().unwrap_or(0)
    }

    pub fn total_rejected(&self) -> usize {
        self.rejections.values().sum()
    }
}

/// Mutable state threaded through every [`AlignmentAssembler::process`] call
#[derive(Debug)]
pub struct PipelineState {
    name_prefix: String,
    // Last index handed out; names are 1-based
    amplicon_index: usize,
    pub summary: RunSummary,
}

impl PipelineState {
    pub fn new(name_prefix: &str) -> Self {
        PipelineState {
            name_prefix: name_prefix.to_string(),
            amplicon_index: 0,
            summary: RunSummary::default(),
        }
    }

    fn next_name(&mut self) -> String {
        self.amplicon_index += 1;
        format!("{}{}", self.name_prefix, self.amplicon_index)
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        PipelineState::new(DEFAULT_NAME_PREFIX)
    }
}

/// Turns aligned reads into fixed-width rows for one reference
pub struct AlignmentAssembler {
    reference_len: usize,
}

impl AlignmentAssembler {
    pub fn new(reference_len: usize) -> Self {
        AlignmentAssembler { reference_len }
    }

    /// Process one read.
    ///
    /// Rejections are logged and returned as [`ReadOutcome::Rejected`].
    /// An operation the projection cannot handle is a fatal error.
    pub fn process(&self, state: &mut PipelineState, read: &AlignedRead) -> Result<ReadOutcome, MsaError> {
        state.summary.reads_seen += 1;

        if let Err(reason) = check_read(read, self.reference_len) {
            return Ok(reject(state, read, reason));
        }

        // Names are handed out before the length check, so a rejected template leaves a gap
        let assigned_name = state.next_name();
        debug!(
            "{} -> {} at {} ({})",
            read.query_name,
            assigned_name,
            read.reference_start,
            read.cigar_string()
        );

        let interpretation = cigar::interpret(read.reference_start, &read.query_sequence, &read.cigar_ops)
            .map_err(|op| {
                error!(
                    "Read contains CIGAR operation '{}' that is not handled. Aborting at read with id: {}",
                    op, read.query_name
                );
                MsaError::UnhandledCigarOperation {
                    read_name: read.query_name.clone(),
                    op,
                }
            })?;

        let mut gapped_sequence = interpretation.template;
        if gapped_sequence.len() < self.reference_len {
            gapped_sequence.resize(self.reference_len, GAP);
        }
        if gapped_sequence.len() != self.reference_len {
            debug!(
                "Template for {} is {} bp against a {} bp reference",
                read.query_name,
                gapped_sequence.len(),
                self.reference_len
            );
            return Ok(reject(state, read, RejectReason::TemplateLengthMismatch));
        }

        state.summary.rows_emitted += 1;
        let row = AlignmentRow {
            assigned_name: assigned_name.clone(),
            query_index_consumed: interpretation.query_index,
            reference_start_1based: read.reference_start + 1,
            reference_end: read.reference_end,
            gapped_sequence,
        };
        let mapping = NameMapping {
            original_query_name: read.query_name.clone(),
            assigned_name,
        };
        Ok(ReadOutcome::Emitted(row, mapping))
    }
}

fn reject(state: &mut PipelineState, read: &AlignedRead, reason: RejectReason) -> ReadOutcome {
    warn!("{}. Discarding read with id: {}", reason, read.query_name);
    state.summary.record_rejection(reason);
    ReadOutcome::Rejected(reason)
}
