// cert/types.rs
use super::error::CertOperationError;
use crate::constants::{cert_file, key_file};
use openssl::pkey::{PKey, Private};
use openssl::x509::X509;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ExtendedKeyUsage {
    ServerAuth,
    ClientAuth,
}

/// DNS names and IP addresses for the subjectAltName extension.
///
/// Both lists keep insertion order and never hold duplicates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AltNames {
    pub dns_names: Vec<String>,
    pub ips: Vec<IpAddr>,
}

impl AltNames {
    pub fn add_dns(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.dns_names.contains(&name) {
            self.dns_names.push(name);
        }
    }

    pub fn add_ip(&mut self, ip: IpAddr) {
        if !self.ips.contains(&ip) {
            self.ips.push(ip);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dns_names.is_empty() && self.ips.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CertificateRequest {
    pub name: String,
    pub common_name: Option<String>,
    pub organizations: Vec<String>,
    pub extended_key_usages: Vec<ExtendedKeyUsage>,
    pub alt_names: AltNames,
}

impl CertificateRequest {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            common_name: None,
            organizations: Vec::new(),
            extended_key_usages: Vec::new(),
            alt_names: AltNames::default(),
        }
    }

    pub fn common_name(mut self, common_name: &str) -> Self {
        self.common_name = Some(common_name.to_string());
        self
    }

    pub fn organization(mut self, organization: &str) -> Self {
        self.organizations.push(organization.to_string());
        self
    }

    pub fn usages(mut self, usages: &[ExtendedKeyUsage]) -> Self {
        self.extended_key_usages = usages.to_vec();
        self
    }

    pub fn alt_names(mut self, alt_names: AltNames) -> Self {
        self.alt_names = alt_names;
        self
    }
}

/// A self-signed authority and the leaves it signs, in issuance order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaGroup {
    pub authority: CertificateRequest,
    pub issued: Vec<CertificateRequest>,
}

pub struct KeyCertPair {
    pub private_key: PKey<Private>,
    pub certificate: X509,
}

impl KeyCertPair {
    pub fn serial_hex(&self) -> Result<String, CertOperationError> {
        self.certificate
            .serial_number()
            .to_bn()
            .and_then(|bn| bn.to_hex_str().map(|s| s.to_lowercase()))
            .map_err(|e| CertOperationError::encoding("Failed to read serial number", e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPair {
    pub key_pem: Vec<u8>,
    pub cert_pem: Vec<u8>,
}

/// Generated material keyed by file name (`<name>.key`, `<name>.crt`, `sa.key`, `sa.pub`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PkiBundle {
    entries: BTreeMap<String, Vec<u8>>,
}

impl PkiBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_pair(&mut self, name: &str, pair: EncodedPair) {
        self.entries.insert(key_file(name), pair.key_pem);
        self.entries.insert(cert_file(name), pair.cert_pem);
    }

    pub fn insert(&mut self, file_name: &str, content: Vec<u8>) {
        self.entries.insert(file_name.to_string(), content);
    }

    pub fn key(&self, name: &str) -> Option<&[u8]> {
        self.get(&key_file(name))
    }

    pub fn cert(&self, name: &str) -> Option<&[u8]> {
        self.get(&cert_file(name))
    }

    pub fn get(&self, file_name: &str) -> Option<&[u8]> {
        self.entries.get(file_name).map(Vec::as_slice)
    }

    pub fn contains_pair(&self, name: &str) -> bool {
        self.key(name).is_some() && self.cert(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// PEM is ASCII, so the text view is lossless.
    pub fn to_text_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(name, content)| (name.clone(), String::from_utf8_lossy(content).into_owned()))
            .collect()
    }
}
