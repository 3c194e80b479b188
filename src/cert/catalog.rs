// src/cert/catalog.rs
use super::alt_names::{resolve_apiserver_names, resolve_etcd_peer_names};
use super::error::CertOperationError;
use super::types::{CaGroup, CertificateRequest, ExtendedKeyUsage::*};
use crate::config::ClusterConfig;
use crate::constants::*;

/// The control-plane trust hierarchy: cluster CA, front-proxy CA and etcd CA,
/// each followed by the leaves it signs.
///
/// Only the API server and etcd leaves depend on the deployment; everything
/// else is fixed. New certificates are added here and nowhere else.
pub fn build_catalog(config: &ClusterConfig) -> Result<Vec<CaGroup>, CertOperationError> {
    let apiserver_names = resolve_apiserver_names(config)?;
    let etcd_names = resolve_etcd_peer_names(config);

    Ok(vec![
        CaGroup {
            authority: CertificateRequest::new(CA).common_name("kubernetes"),
            issued: vec![
                CertificateRequest::new(APISERVER)
                    .common_name("kube-apiserver")
                    .usages(&[ServerAuth])
                    .alt_names(apiserver_names),
                CertificateRequest::new(APISERVER_KUBELET_CLIENT)
                    .common_name("kube-apiserver-kubelet-client")
                    .organization(SYSTEM_MASTERS)
                    .usages(&[ClientAuth]),
            ],
        },
        CaGroup {
            authority: CertificateRequest::new(FRONT_PROXY_CA).common_name("front-proxy-ca"),
            issued: vec![CertificateRequest::new(FRONT_PROXY_CLIENT)
                .common_name("front-proxy-client")
                .usages(&[ClientAuth])],
        },
        CaGroup {
            authority: CertificateRequest::new(ETCD_CA).common_name("etcd-ca"),
            issued: vec![
                CertificateRequest::new(ETCD_SERVER)
                    .usages(&[ServerAuth, ClientAuth])
                    .alt_names(etcd_names.clone()),
                CertificateRequest::new(ETCD_PEER)
                    .usages(&[ServerAuth, ClientAuth])
                    .alt_names(etcd_names),
                CertificateRequest::new(ETCD_HEALTHCHECK_CLIENT)
                    .common_name("kube-etcd-healthcheck-client")
                    .organization(SYSTEM_MASTERS)
                    .usages(&[ClientAuth]),
                CertificateRequest::new(APISERVER_ETCD_CLIENT)
                    .common_name("kube-apiserver-etcd-client")
                    .organization(SYSTEM_MASTERS)
                    .usages(&[ClientAuth]),
            ],
        },
    ])
}

/// Every request in issuance order, CA first within each group.
pub fn all_requests(groups: &[CaGroup]) -> impl Iterator<Item = &CertificateRequest> {
    groups
        .iter()
        .flat_map(|group| std::iter::once(&group.authority).chain(group.issued.iter()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn find<'a>(groups: &'a [CaGroup], name: &str) -> &'a CertificateRequest {
        all_requests(groups)
            .find(|request| request.name == name)
            .unwrap()
    }

    #[test]
    fn test_catalog_order_and_shape() {
        let groups = build_catalog(&ClusterConfig::default()).unwrap();
        let authorities: Vec<&str> = groups.iter().map(|g| g.authority.name.as_str()).collect();
        assert_eq!(authorities, vec![CA, FRONT_PROXY_CA, ETCD_CA]);

        let etcd_leaves: Vec<&str> = groups[2].issued.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            etcd_leaves,
            vec![ETCD_SERVER, ETCD_PEER, ETCD_HEALTHCHECK_CLIENT, APISERVER_ETCD_CLIENT]
        );
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let groups = build_catalog(&ClusterConfig::default()).unwrap();
        let names: Vec<&str> = all_requests(&groups).map(|r| r.name.as_str()).collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), 10);
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_authorities_carry_no_usages_or_alt_names() {
        let groups = build_catalog(&ClusterConfig::default()).unwrap();
        for group in &groups {
            assert!(group.authority.common_name.is_some());
            assert!(group.authority.extended_key_usages.is_empty());
            assert!(group.authority.alt_names.is_empty());
        }
    }

    #[test]
    fn test_client_certificates_map_to_masters() {
        let groups = build_catalog(&ClusterConfig::default()).unwrap();
        for name in [
            APISERVER_KUBELET_CLIENT,
            ETCD_HEALTHCHECK_CLIENT,
            APISERVER_ETCD_CLIENT,
        ] {
            let request = find(&groups, name);
            assert_eq!(request.organizations, vec![SYSTEM_MASTERS]);
            assert_eq!(request.extended_key_usages, vec![ClientAuth]);
        }
        let front_proxy = find(&groups, FRONT_PROXY_CLIENT);
        assert!(front_proxy.organizations.is_empty());
    }

    #[test]
    fn test_deployment_names_are_injected() {
        let groups = build_catalog(&ClusterConfig::default()).unwrap();

        let apiserver = find(&groups, APISERVER);
        assert_eq!(apiserver.extended_key_usages, vec![ServerAuth]);
        assert!(apiserver.alt_names.ips.contains(&"203.0.113.5".parse().unwrap()));

        let etcd_server = find(&groups, ETCD_SERVER);
        assert!(etcd_server.common_name.is_none());
        assert_eq!(etcd_server.alt_names.ips, vec!["10.0.0.1".parse::<std::net::IpAddr>().unwrap()]);
        assert_eq!(find(&groups, ETCD_PEER).alt_names, etcd_server.alt_names);
    }

    #[test]
    fn test_catalog_fails_when_names_cannot_be_resolved() {
        let mut config = ClusterConfig::default();
        config.service_subnet = "10.96.0.0/32".parse().unwrap();
        assert!(matches!(
            build_catalog(&config),
            Err(CertOperationError::Config(_))
        ));
    }
}
