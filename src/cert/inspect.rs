// src/cert/inspect.rs
use super::error::CertOperationError;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use x509_parser::extensions::GeneralName;
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::ParsedExtension;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CertificateInfo {
    pub name: String,
    pub subject: String,
    pub issuer: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub serial: String,
    pub fingerprint: String,
    pub is_ca: bool,
    pub dns_names: Vec<String>,
    pub ip_addresses: Vec<IpAddr>,
    pub extended_key_usage: Vec<String>,
}

impl CertificateInfo {
    pub fn from_pem(name: &str, cert_pem: &[u8]) -> Result<Self, CertOperationError> {
        let (_, pem) = parse_x509_pem(cert_pem)
            .map_err(|e| CertOperationError::Encoding(format!("{}: {}", name, e)))?;
        let cert = pem
            .parse_x509()
            .map_err(|e| CertOperationError::Encoding(format!("{}: {}", name, e)))?;

        let not_before = timestamp(cert.validity().not_before.timestamp(), "not_before")?;
        let not_after = timestamp(cert.validity().not_after.timestamp(), "not_after")?;

        let mut is_ca = false;
        let mut dns_names = Vec::new();
        let mut ip_addresses = Vec::new();
        let mut extended_key_usage = Vec::new();

        for ext in cert.extensions() {
            match ext.parsed_extension() {
                ParsedExtension::BasicConstraints(bc) => is_ca = bc.ca,
                ParsedExtension::SubjectAlternativeName(san) => {
                    for general_name in &san.general_names {
                        match general_name {
                            GeneralName::DNSName(dns) => dns_names.push(dns.to_string()),
                            GeneralName::IPAddress(bytes) => {
                                if let Some(ip) = ip_from_bytes(bytes) {
                                    ip_addresses.push(ip);
                                }
                            }
                            _ => {}
                        }
                    }
                }
                ParsedExtension::ExtendedKeyUsage(eku) => {
                    if eku.server_auth {
                        extended_key_usage.push("serverAuth".to_string());
                    }
                    if eku.client_auth {
                        extended_key_usage.push("clientAuth".to_string());
                    }
                }
                _ => {}
            }
        }

        let fingerprint = openssl::hash::hash(openssl::hash::MessageDigest::sha256(), &pem.contents)
            .map_err(|e| CertOperationError::encoding("Failed to fingerprint certificate", e))?;

        Ok(CertificateInfo {
            name: name.to_string(),
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            not_before,
            not_after,
            serial: hex::encode(cert.raw_serial()),
            fingerprint: hex::encode(fingerprint),
            is_ca,
            dns_names,
            ip_addresses,
            extended_key_usage,
        })
    }
}

fn timestamp(seconds: i64, field: &str) -> Result<DateTime<Utc>, CertOperationError> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| CertOperationError::Encoding(format!("Invalid {} timestamp", field)))
}

fn ip_from_bytes(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => <[u8; 4]>::try_from(bytes).ok().map(IpAddr::from),
        16 => <[u8; 16]>::try_from(bytes).ok().map(IpAddr::from),
        _ => None,
    }
}
