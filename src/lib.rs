//! Control-plane PKI bootstrap: the cluster, front-proxy and etcd CAs, the
//! leaves each of them signs, and the service-account signing key, all as
//! PEM blobs keyed by file name.
pub mod cert;
pub mod config;
pub mod constants;
pub mod utils;

pub use cert::{build, CertOperationError, PkiBundle};
pub use config::ClusterConfig;
