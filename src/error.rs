use std::io;
use std::path::PathBuf;

/// Fatal errors that abort a conversion run.
///
/// Per-read rejections are not errors; see [`crate::filter::RejectReason`].
#[derive(Debug)]
pub enum MsaError {
    MissingReferenceFile(PathBuf),
    MalformedReference { path: PathBuf, message: String },
    UnhandledCigarOperation { read_name: String, op: char },
    AlignmentInput(String),
    Io(io::Error),
}

impl std::fmt::Display for MsaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MsaError::MissingReferenceFile(path) => {
                write!(f, "Reference file '{}' not found", path.display())
            }
            MsaError::MalformedReference { path, message } => {
                write!(f, "Malformed reference '{}': {}", path.display(), message)
            }
            MsaError::UnhandledCigarOperation { read_name, op } => write!(
                f,
                "Read '{}' contains unhandled CIGAR operation '{}'",
                read_name, op
            ),
            MsaError::AlignmentInput(msg) => write!(f, "Alignment input error: {}", msg),
            MsaError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for MsaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MsaError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MsaError {
    fn from(e: io::Error) -> Self {
        MsaError::Io(e)
    }
}

impl From<MsaError> for io::Error {
    fn from(e: MsaError) -> Self {
        if let MsaError::Io(inner) = e {
            return inner;
        }
        let kind = match &e {
            MsaError::MissingReferenceFile(_) => io::ErrorKind::NotFound,
            MsaError::AlignmentInput(_) => io::ErrorKind::InvalidInput,
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, e.to_string())
    }
}
