
use std::fmt;
use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// ErrUnsupportedCodec indicates the remote peer doesn't support the requested codec
    #[error("unable to start track, codec is not supported by remote")]
    ErrUnsupportedCodec,

    /// ErrNoPayloaderForCodec indicates that the requested codec does not have a payloader
    #[error("the requested codec does not have a payloader")]
    ErrNoPayloaderForCodec,

    /// ErrNoWriteStream indicates the binding context carries no outbound packet sink
    #[error("track binding has no write stream")]
    ErrNoWriteStream,

    #[error("bitrate {0} lower than minimum of 1920")]
    ErrBitrateTooLow(u32),
    #[error("file format not supported: {0}")]
    ErrUnsupportedFileFormat(String),
    #[error("IVF timebase has a zero denominator")]
    ErrInvalidTimebase,

    /// ErrSampleWrite collects every failure of a single sample write
    #[error("{0}")]
    ErrSampleWrite(SampleWriteErrors),

    #[error("{0}")]
    Util(#[from] util::Error),
    #[error("{0}")]
    Rtp(#[from] rtp::Error),
    #[error("{0}")]
    Media(#[from] media::Error),
    #[error("{0}")]
    Io(#[source] IoError),

    #[allow(non_camel_case_types)]
    #[error("{0}")]
    new(String),
}

#[derive(Debug, Error)]
#[error("io error: {0}")]
pub struct IoError(#[from] pub io::Error);

// io::Error does not implement PartialEq
impl PartialEq for IoError {
    fn eq(&self, other: &Self) -> bool {
        self.0.kind() == other.0.kind()
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(IoError(e))
    }
}

/// SampleWriteErrors is the outcome of a sample write where at least one
/// packet could not be decorated or sent. The remaining packets of the
/// batch were still attempted.
#[derive(Debug, PartialEq)]
pub struct SampleWriteErrors {
    pub attempted: usize,
    pub errors: Vec<Error>,
}

impl SampleWriteErrors {
    /// primary returns the first failure of the batch
    pub fn primary(&self) -> Option<&Error> {
        self.errors.first()
    }
}

impl fmt::Display for SampleWriteErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error(s) writing {} packet(s)",
            self.errors.len(),
            self.attempted
        )?;
        if let Some(primary) = self.primary() {
            write!(f, ", first: {primary}")?;
        }
        Ok(())
    }
}

/// flatten_errs folds the per-packet failures of one sample write into a single result
pub(crate) fn flatten_errs(attempted: usize, errs: Vec<impl Into<Error>>) -> Result<()> {
    if errs.is_empty() {
        Ok(())
    } else {
        Err(Error::ErrSampleWrite(SampleWriteErrors {
            attempted,
            errors: errs.into_iter().map(Into::into).collect(),
        }))
    }
}
