//! Single-contig reference loading
//!
//! The reference defines the width of every alignment row. Plain and
//! BGZF-compressed FASTA files are supported.

use crate::error::MsaError;
use log::debug;
use noodles::bgzf;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::num::NonZeroUsize;
use std::path::Path;

/// The reference every read is anchored to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSequence {
    pub name: String,
    pub bases: Vec<u8>,
}

impl ReferenceSequence {
    /// Width of every row in the alignment
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

const BGZF_HEADER_SIZE: usize = 18;

/// Check whether a file starts with a valid BGZF header.
/// Returns `Ok(false)` for regular gzip, too-small files, or plain text.
fn is_bgzf<R: Read + Seek>(reader: &mut R) -> io::Result<bool> {
    let mut header = [0u8; BGZF_HEADER_SIZE];
    let result = match reader.read_exact(&mut header) {
        Ok(()) => {
            Ok(header[0..2] == [0x1f, 0x8b]      // gzip magic
                && header[2] == 0x08              // DEFLATE
                && header[3] == 0x04              // FEXTRA
                && header[10..12] == [0x06, 0x00] // XLEN=6
                && header[12..14] == [b'B', b'C'] // BC subfield
                && header[14..16] == [0x02, 0x00]) // SLEN=2
        }
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    };
    reader.seek(SeekFrom::Start(0))?;
    result
}

/// Load the reference from `path`, decompressing `.gz`/`.bgz` files as BGZF.
pub fn load_reference(path: &Path, threads: NonZeroUsize) -> Result<ReferenceSequence, MsaError> {
    if !path.exists() {
        return Err(MsaError::MissingReferenceFile(path.to_path_buf()));
    }

    let mut file = File::open(path).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("Failed to open reference '{}': {}", path.display(), e),
        )
    })?;

    let path_str = path.to_string_lossy();
    let reader: Box<dyn Read> = if [".gz", ".bgz"].iter().any(|e| path_str.ends_with(e)) {
        if !is_bgzf(&mut file)? {
            return Err(MsaError::MalformedReference {
                path: path.to_path_buf(),
                message: format!(
                    "regular gzip, not BGZF. Convert with: zcat '{}' | bgzip > reference.fa.gz",
                    path_str
                ),
            });
        }
        if threads.get() > 1 {
            debug!("Reading {} with {} BGZF workers", path_str, threads);
            Box::new(bgzf::io::MultithreadedReader::with_worker_count(threads, file))
        } else {
            Box::new(bgzf::io::Reader::new(file))
        }
    } else {
        Box::new(file)
    };

    let reference = parse_reference(BufReader::new(reader), path)?;
    debug!(
        "Loaded reference {} ({} bp) from {}",
        reference.name,
        reference.len(),
        path_str
    );
    Ok(reference)
}

/// Parse a single-contig FASTA record.
///
/// The first non-empty line must be a `>` header; the contig name is its first token.
/// Every following line is appended to the bases with its line terminator removed.
pub fn parse_reference<R: BufRead>(mut reader: R, path: &Path) -> Result<ReferenceSequence, MsaError> {
    let malformed = |message: &str| MsaError::MalformedReference {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let mut name: Option<String> = None;
    let mut bases = Vec::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        let trimmed = strip_line_terminator(&line);

        match name {
            None => {
                if trimmed.iter().all(|b| b.is_ascii_whitespace()) {
                    continue;
                }
                let header = trimmed
                    .strip_prefix(b">")
                    .ok_or_else(|| malformed("no header line"))?;
                let contig = String::from_utf8_lossy(header)
                    .split_whitespace()
                    .next()
                    .map(str::to_string)
                    .ok_or_else(|| malformed("header line has no sequence name"))?;
                name = Some(contig);
            }
            Some(_) => {
                if trimmed.first() == Some(&b'>') {
                    return Err(malformed("more than one sequence record"));
                }
                bases.extend_from_slice(trimmed);
            }
        }
    }

    let name = name.ok_or_else(|| malformed("no header line"))?;
    Ok(ReferenceSequence { name, bases })
}

fn strip_line_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
