//! CIGAR operations and their projection onto reference coordinates
//!
//! A read's operations are replayed against a template that starts at
//! reference coordinate 0, so the resulting string can be stacked under the
//! reference column by column.

use log::debug;
use rust_htslib::bam::record::Cigar;

/// Filler for positions with no read base
pub const GAP: u8 = b'-';

/// The kind of a CIGAR operation.
///
/// `Unsupported` carries any SAM operation code the interpreter does not
/// project (`P`, `=`, `X`); meeting one aborts the run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CigarKind {
    Match,
    Insertion,
    Deletion,
    Skip,
    SoftClip,
    HardClip,
    Unsupported(char),
}

impl CigarKind {
    /// SAM operation code
    pub fn code(self) -> char {
        match self {
            CigarKind::Match => 'M',
            CigarKind::Insertion => 'I',
            CigarKind::Deletion => 'D',
            CigarKind::Skip => 'N',
            CigarKind::SoftClip => 'S',
            CigarKind::HardClip => 'H',
            CigarKind::Unsupported(c) => c,
        }
    }

    pub fn from_code(code: char) -> Self {
        match code {
            'M' => CigarKind::Match,
            'I' => CigarKind::Insertion,
            'D' => CigarKind::Deletion,
            'N' => CigarKind::Skip,
            'S' => CigarKind::SoftClip,
            'H' => CigarKind::HardClip,
            other => CigarKind::Unsupported(other),
        }
    }
}

/// A (kind, length) pair
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CigarOp {
    pub kind: CigarKind,
    pub len: usize,
}

impl CigarOp {
    pub fn new(kind: CigarKind, len: usize) -> Self {
        CigarOp { kind, len }
    }
}

impl From<&Cigar> for CigarOp {
    fn from(cigar: &Cigar) -> Self {
        CigarOp::new(CigarKind::from_code(cigar.char()), cigar.len() as usize)
    }
}

/// Parse a textual CIGAR such as `5S20M2D10M`. `*` and the empty string give no operations.
pub fn parse_cigar(cigar: &str) -> Option<Vec<CigarOp>> {
    if cigar == "*" {
        return Some(Vec::new());
    }

    let mut ops = Vec::new();
    let mut len: Option<usize> = None;
    for c in cigar.chars() {
        if let Some(digit) = c.to_digit(10) {
            len = Some(len.unwrap_or(0).checked_mul(10)?.checked_add(digit as usize)?);
        } else {
            ops.push(CigarOp::new(CigarKind::from_code(c), len.take()?));
        }
    }

    // A trailing length without an operation is invalid
    if len.is_some() {
        return None;
    }
    Some(ops)
}

/// Render operations back to SAM text
pub fn format_cigar(ops: &[CigarOp]) -> String {
    if ops.is_empty() {
        return "*".to_string();
    }
    ops.iter()
        .map(|op| format!("{}{}", op.len, op.kind.code()))
        .collect()
}

/// Result of replaying a read's operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    /// Gapped read anchored at reference coordinate 0, not yet padded on the right
    pub template: Vec<u8>,
    /// Number of query bases consumed
    pub query_index: usize,
}

/// Replay `ops` for a read aligned at 0-based `reference_start`.
///
/// A leading soft clip is placed at the coordinates it would occupy had it
/// aligned, i.e. starting `len` bases before `reference_start`. Clipped bases
/// that would fall before coordinate 0 are left out of the template, rather
/// than shifting the whole row right to make room for them.
///
/// Hard-clipped bases are absent from `query`, so a hard clip moves neither
/// the template nor the query cursor.
///
/// Returns the offending operation code as the error on an unsupported kind.
pub fn interpret(reference_start: usize, query: &[u8], ops: &[CigarOp]) -> Result<Interpretation, char> {
    let mut leading_overhang = 0;
    let offset = match ops.first() {
        Some(CigarOp { kind: CigarKind::SoftClip, len }) => {
            leading_overhang = len.saturating_sub(reference_start);
            reference_start.saturating_sub(*len)
        }
        _ => reference_start,
    };

    let mut template = vec![GAP; offset];
    let mut query_index = 0;

    for (i, op) in ops.iter().enumerate() {
        match op.kind {
            CigarKind::Match => {
                template.extend_from_slice(query_slice(query, query_index, op.len));
                query_index += op.len;
            }
            CigarKind::Insertion => {
                query_index += op.len;
            }
            CigarKind::Deletion => {
                template.resize(template.len() + op.len, GAP);
            }
            CigarKind::Skip => {
                template.resize(template.len() + op.len, GAP);
                query_index += op.len;
            }
            CigarKind::SoftClip => {
                let skip = if i == 0 { leading_overhang } else { 0 };
                template.extend_from_slice(query_slice(query, query_index + skip, op.len - skip));
                query_index += op.len;
            }
            CigarKind::HardClip => {}
            CigarKind::Unsupported(code) => return Err(code),
        }
    }

    Ok(Interpretation {
        template,
        query_index,
    })
}

// Clamped to the end of the query
fn query_slice(query: &[u8], start: usize, len: usize) -> &[u8] {
    let start = start.min(query.len());
    let end = start.saturating_add(len).min(query.len());
    if end - start < len {
        debug!(
            "Query of {} bp ends inside an operation: wanted {} bases from {}, got {}",
            query.len(),
            len,
            start,
            end - start
        );
    }
    &query[start..end]
}
