// src/cert/error.rs
use openssl::error::ErrorStack;
use std::io;

#[derive(Debug)]
pub enum CertOperationError {
    IoError(io::Error),
    /// Deployment inputs cannot produce the required names.
    Config(String),
    /// Key, serial or random-source failure.
    CertGeneration(String),
    Encoding(String),
    Signing(String),
    Verification(String),
}

impl CertOperationError {
    pub(crate) fn generation(context: &str, error: ErrorStack) -> Self {
        CertOperationError::CertGeneration(format!("{}: {}", context, error))
    }

    pub(crate) fn signing(context: &str, error: ErrorStack) -> Self {
        CertOperationError::Signing(format!("{}: {}", context, error))
    }

    pub(crate) fn encoding(context: &str, error: ErrorStack) -> Self {
        CertOperationError::Encoding(format!("{}: {}", context, error))
    }

    pub(crate) fn verification(context: &str, error: ErrorStack) -> Self {
        CertOperationError::Verification(format!("{}: {}", context, error))
    }
}

impl From<CertOperationError> for io::Error {
    fn from(error: CertOperationError) -> Self {
        match error {
            CertOperationError::IoError(e) => {
                io::Error::new(e.kind(), format!("Certificate operation IO error: {}", e))
            }
            CertOperationError::Config(s) => io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Configuration error: {}", s),
            ),
            CertOperationError::CertGeneration(s) => io::Error::new(
                io::ErrorKind::Other,
                format!("Certificate generation error: {}", s),
            ),
            CertOperationError::Encoding(s) => io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Certificate encoding error: {}", s),
            ),
            CertOperationError::Signing(s) => io::Error::new(
                io::ErrorKind::Other,
                format!("Certificate signing error: {}", s),
            ),
            CertOperationError::Verification(s) => io::Error::new(
                io::ErrorKind::Other,
                format!("Certificate verification error: {}", s),
            ),
        }
    }
}

impl std::fmt::Display for CertOperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO Error: {}", e),
            Self::Config(s) => write!(f, "Configuration Error: {}", s),
            Self::CertGeneration(s) => write!(f, "Certificate Generation Error: {}", s),
            Self::Encoding(s) => write!(f, "Encoding Error: {}", s),
            Self::Signing(s) => write!(f, "Signing Error: {}", s),
            Self::Verification(s) => write!(f, "Verification Error: {}", s),
        }
    }
}

impl std::error::Error for CertOperationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CertOperationError {
    fn from(error: io::Error) -> Self {
        CertOperationError::IoError(error)
    }
}
