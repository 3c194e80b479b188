// src/constants.rs

// CA groups
pub const CA: &str = "ca";
pub const FRONT_PROXY_CA: &str = "front-proxy-ca";
pub const ETCD_CA: &str = "etcd-ca";

// leaves
pub const APISERVER: &str = "apiserver";
pub const APISERVER_KUBELET_CLIENT: &str = "apiserver-kubelet-client";
pub const FRONT_PROXY_CLIENT: &str = "front-proxy-client";
pub const ETCD_SERVER: &str = "etcd-server";
pub const ETCD_PEER: &str = "etcd-peer";
pub const ETCD_HEALTHCHECK_CLIENT: &str = "etcd-healthcheck-client";
pub const APISERVER_ETCD_CLIENT: &str = "apiserver-etcd-client";

pub const SERVICE_ACCOUNT_PRIVATE_KEY: &str = "sa.key";
pub const SERVICE_ACCOUNT_PUBLIC_KEY: &str = "sa.pub";

pub const KEY_SUFFIX: &str = "key";
pub const CERT_SUFFIX: &str = "crt";

pub const SYSTEM_MASTERS: &str = "system:masters";

pub const DEFAULT_KEY_SIZE: u32 = 2048;
pub const DEFAULT_VALIDITY_DAYS: u32 = 7300;
pub const DEFAULT_CLUSTER_DOMAIN: &str = "cluster.local";

pub fn key_file(name: &str) -> String {
    format!("{}.{}", name, KEY_SUFFIX)
}

pub fn cert_file(name: &str) -> String {
    format!("{}.{}", name, CERT_SUFFIX)
}
