mod types;

pub use types::ClusterConfig;
