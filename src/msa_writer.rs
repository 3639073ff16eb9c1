use crate::assembler::{AlignmentRow, NameMapping};
use crate::reference::ReferenceSequence;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Streams the alignment and the name mapping to their files.
///
/// The reference is the first record of the alignment. Rows are appended in
/// the order they are written, with no reordering.
pub struct MsaWriter<W: Write> {
    alignment: W,
    mapping: W,
}

impl MsaWriter<BufWriter<File>> {
    /// Create (truncating) both output files and write the reference record
    pub fn create(
        alignment_path: &Path,
        mapping_path: &Path,
        reference: &ReferenceSequence,
    ) -> io::Result<Self> {
        let open = |path: &Path| {
            File::create(path).map(BufWriter::new).map_err(|e| {
                io::Error::new(
                    e.kind(),
                    format!("Failed to create output file '{}': {}", path.display(), e),
                )
            })
        };
        MsaWriter::new(open(alignment_path)?, open(mapping_path)?, reference)
    }
}

impl<W: Write> MsaWriter<W> {
    pub fn new(mut alignment: W, mapping: W, reference: &ReferenceSequence) -> io::Result<Self> {
        writeln!(alignment, ">{}", reference.name)?;
        alignment.write_all(&reference.bases)?;
        alignment.write_all(b"\n")?;
        Ok(MsaWriter { alignment, mapping })
    }

    pub fn write_row(&mut self, row: &AlignmentRow, mapping: &NameMapping) -> io::Result<()> {
        writeln!(
            self.alignment,
            ">{}\t{}\t{}\t{}",
            row.assigned_name, row.query_index_consumed, row.reference_start_1based, row.reference_end
        )?;
        self.alignment.write_all(&row.gapped_sequence)?;
        self.alignment.write_all(b"\n")?;

        writeln!(
            self.mapping,
            "{}\t{}",
            mapping.original_query_name, mapping.assigned_name
        )
    }

    /// Flush both outputs and hand back the underlying writers
    pub fn finish(mut self) -> io::Result<(W, W)> {
        self.alignment.flush()?;
        self.mapping.flush()?;
        Ok((self.alignment, self.mapping))
    }
}
