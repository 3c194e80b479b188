// src/cert/mod.rs
pub mod alt_names;
pub mod catalog;
pub mod codec;
mod error;
pub mod inspect;
pub mod issuer;
pub mod operations;
pub mod random;
mod service_account;
mod types;
pub mod verification;

pub use catalog::build_catalog;
pub use error::CertOperationError;
pub use inspect::CertificateInfo;
pub use issuer::CertificateIssuer;
pub use operations::{build, CertificateOperations};
pub use random::{OsRandom, RandomSource};
pub use service_account::{ServiceAccountGenerator, ServiceAccountKeys};
pub use types::{
    AltNames, CaGroup, CertificateRequest, EncodedPair, ExtendedKeyUsage, KeyCertPair, PkiBundle,
};
pub use verification::CertificateVerifier;
