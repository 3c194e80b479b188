// src/cert/alt_names.rs
use super::error::CertOperationError;
use super::types::AltNames;
use crate::config::ClusterConfig;
use ipnet::IpNet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

const APISERVER_SERVICE_NAMES: [&str; 3] = [
    "kubernetes",
    "kubernetes.default",
    "kubernetes.default.svc",
];

/// Names the API server answers to inside and outside the cluster.
///
/// Addresses are taken as configured; an unspecified address ends up in the
/// certificate unchanged.
pub fn resolve_apiserver_names(config: &ClusterConfig) -> Result<AltNames, CertOperationError> {
    let mut alt_names = AltNames::default();
    for name in APISERVER_SERVICE_NAMES {
        alt_names.add_dns(name);
    }
    match config.cluster_domain.as_deref() {
        Some(domain) if domain.trim().is_empty() => {
            return Err(CertOperationError::Config(
                "cluster domain must not be empty".to_string(),
            ));
        }
        Some(domain) => alt_names.add_dns(format!(
            "kubernetes.default.svc.{}",
            domain.trim_end_matches('.')
        )),
        None => {}
    }

    alt_names.add_ip(apiserver_service_ip(&config.service_subnet)?);
    alt_names.add_ip(config.internal_advertise_address);
    alt_names.add_ip(config.external_advertise_address);

    Ok(alt_names)
}

/// One IP entry per distinct etcd member address.
pub fn resolve_etcd_peer_names(config: &ClusterConfig) -> AltNames {
    let mut alt_names = AltNames::default();
    for ip in config.etcd_members.values() {
        alt_names.add_ip(*ip);
    }
    alt_names
}

/// The `kubernetes` service's cluster IP: first address after the network address.
pub fn apiserver_service_ip(subnet: &IpNet) -> Result<IpAddr, CertOperationError> {
    let candidate = match subnet.network() {
        IpAddr::V4(network) => u32::from(network)
            .checked_add(1)
            .map(|ip| IpAddr::V4(Ipv4Addr::from(ip))),
        IpAddr::V6(network) => u128::from(network)
            .checked_add(1)
            .map(|ip| IpAddr::V6(Ipv6Addr::from(ip))),
    };

    candidate
        .filter(|ip| subnet.contains(ip))
        .ok_or_else(|| {
            CertOperationError::Config(format!(
                "service subnet {} has no room for the API server service IP",
                subnet
            ))
        })
}
