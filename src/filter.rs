use crate::aligned_read::AlignedRead;
use crate::cigar::CigarKind;

/// Why a read was left out of the alignment
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RejectReason {
    NoCigar,
    HardClipPresent,
    SkipRegionPresent,
    AlignsOffReferenceEnd,
    MissingSequence,
    TemplateLengthMismatch,
}

impl RejectReason {
    /// All reasons in reporting order
    pub const ALL: [RejectReason; 6] = [
        RejectReason::NoCigar,
        RejectReason::HardClipPresent,
        RejectReason::SkipRegionPresent,
        RejectReason::AlignsOffReferenceEnd,
        RejectReason::MissingSequence,
        RejectReason::TemplateLengthMismatch,
    ];

    /// Short identifier used in summaries
    pub fn label(self) -> &'static str {
        match self {
            RejectReason::NoCigar => "no_cigar",
            RejectReason::HardClipPresent => "hard_clip",
            RejectReason::SkipRegionPresent => "skipped_region",
            RejectReason::AlignsOffReferenceEnd => "off_reference_end",
            RejectReason::MissingSequence => "missing_sequence",
            RejectReason::TemplateLengthMismatch => "template_length_mismatch",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::NoCigar => write!(f, "CIGAR string not present"),
            RejectReason::HardClipPresent => write!(f, "CIGAR string contains hard clipping ('H')"),
            RejectReason::SkipRegionPresent => {
                write!(f, "CIGAR string contains skipped region ('N')")
            }
            RejectReason::AlignsOffReferenceEnd => write!(f, "query aligns off end of reference"),
            RejectReason::MissingSequence => write!(f, "query sequence not present"),
            RejectReason::TemplateLengthMismatch => {
                write!(f, "aligned template does not match reference length")
            }
        }
    }
}

/// Decide whether `read` can be projected onto a reference of `reference_len` bases.
///
/// Rules are checked in order and the first failing one is reported.
pub fn check_read(read: &AlignedRead, reference_len: usize) -> Result<(), RejectReason> {
    if read.cigar_ops.is_empty() {
        return Err(RejectReason::NoCigar);
    }
    if read.cigar_ops.iter().any(|op| op.kind == CigarKind::HardClip) {
        return Err(RejectReason::HardClipPresent);
    }
    if read.cigar_ops.iter().any(|op| op.kind == CigarKind::Skip) {
        return Err(RejectReason::SkipRegionPresent);
    }
    if read.reference_end > reference_len {
        return Err(RejectReason::AlignsOffReferenceEnd);
    }
    if read.query_sequence.is_empty() {
        return Err(RejectReason::MissingSequence);
    }
    Ok(())
}
