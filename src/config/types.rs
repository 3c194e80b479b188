// config/types.rs
use crate::constants::{DEFAULT_CLUSTER_DOMAIN, DEFAULT_KEY_SIZE, DEFAULT_VALIDITY_DAYS};
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::{fs, io};

fn default_cluster_domain() -> Option<String> {
    Some(DEFAULT_CLUSTER_DOMAIN.to_string())
}

fn default_validity_days() -> u32 {
    DEFAULT_VALIDITY_DAYS
}

fn default_key_size() -> u32 {
    DEFAULT_KEY_SIZE
}

/// Deployment inputs for one control-plane PKI build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub internal_advertise_address: IpAddr,
    pub external_advertise_address: IpAddr,
    /// etcd member name -> member address
    pub etcd_members: BTreeMap<String, IpAddr>,
    pub service_subnet: IpNet,
    /// `None` leaves the fully qualified service alias out of the API server SANs.
    #[serde(default = "default_cluster_domain")]
    pub cluster_domain: Option<String>,
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,
    #[serde(default = "default_key_size")]
    pub key_size: u32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        let node = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let mut etcd_members = BTreeMap::new();
        etcd_members.insert("node-1".to_string(), node);

        Self {
            internal_advertise_address: node,
            external_advertise_address: IpAddr::V4(Ipv4Addr::new(203, 0, 113, 5)),
            etcd_members,
            service_subnet: IpNet::V4(
                ipnet::Ipv4Net::new(Ipv4Addr::new(10, 96, 0, 0), 12)
                    .unwrap_or_default(),
            ),
            cluster_domain: default_cluster_domain(),
            validity_days: DEFAULT_VALIDITY_DAYS,
            key_size: DEFAULT_KEY_SIZE,
        }
    }
}

impl ClusterConfig {
    pub fn load_from_file(path: &str) -> io::Result<Self> {
        let config_str = fs::read_to_string(path)?;
        serde_json::from_str(&config_str).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn save_to_file(&self, path: &str) -> io::Result<()> {
        let config_str = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, config_str)
    }

    pub fn validate(&self) -> io::Result<()> {
        if self.key_size < DEFAULT_KEY_SIZE {
            return Err(invalid(format!(
                "key_size {} is below the {}-bit minimum",
                self.key_size, DEFAULT_KEY_SIZE
            )));
        }
        if self.validity_days == 0 {
            return Err(invalid("validity_days must be greater than zero".to_string()));
        }
        if self.etcd_members.is_empty() {
            return Err(invalid("at least one etcd member is required".to_string()));
        }
        if matches!(self.cluster_domain.as_deref(), Some(domain) if domain.trim().is_empty()) {
            return Err(invalid("cluster_domain must not be empty".to_string()));
        }
        Ok(())
    }
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}
