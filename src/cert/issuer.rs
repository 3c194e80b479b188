// src/cert/issuer.rs
use super::error::CertOperationError;
use super::random::{OsRandom, RandomSource};
use super::types::{AltNames, CertificateRequest, ExtendedKeyUsage as Usage, KeyCertPair};
use crate::constants::DEFAULT_KEY_SIZE;
use chrono::Utc;
use openssl::asn1::{Asn1Time, Asn1TimeRef};
use openssl::bn::BigNum;
use openssl::error::ErrorStack;
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, PKeyRef, Private};
use openssl::x509::extension::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, KeyUsage,
    SubjectAlternativeName, SubjectKeyIdentifier,
};
use openssl::x509::{X509Builder, X509Name, X509NameBuilder, X509Ref, X509};

const SERIAL_BYTES: usize = 16;
const SECONDS_PER_DAY: i64 = 86_400;

/// Mints keypairs and certificates for the catalog.
///
/// Every certificate shares one validity window. Roots start at the wall-clock
/// time of issuance; leaves start at their CA's `NotBefore`.
pub struct CertificateIssuer<R: RandomSource = OsRandom> {
    random: R,
    key_size: u32,
    validity_days: u32,
}

impl CertificateIssuer<OsRandom> {
    pub fn new(key_size: u32, validity_days: u32) -> Self {
        Self::with_random(OsRandom, key_size, validity_days)
    }
}

impl<R: RandomSource> CertificateIssuer<R> {
    pub fn with_random(random: R, key_size: u32, validity_days: u32) -> Self {
        Self {
            random,
            key_size,
            validity_days,
        }
    }

    pub fn set_policy(&mut self, key_size: u32, validity_days: u32) {
        self.key_size = key_size;
        self.validity_days = validity_days;
    }

    pub fn validity_seconds(&self) -> i64 {
        i64::from(self.validity_days) * SECONDS_PER_DAY
    }

    pub fn issue_root(
        &mut self,
        request: &CertificateRequest,
    ) -> Result<KeyCertPair, CertOperationError> {
        let private_key = self.new_private_key()?;
        let serial = self.new_serial()?;
        let not_before = Utc::now().timestamp();

        let certificate = build_root_certificate(
            request,
            &private_key,
            &serial,
            not_before,
            not_before + self.validity_seconds(),
        )
        .map_err(|e| {
            CertOperationError::signing(&format!("Failed to sign CA {}", request.name), e)
        })?;

        Ok(KeyCertPair {
            private_key,
            certificate,
        })
    }

    pub fn issue_leaf(
        &mut self,
        request: &CertificateRequest,
        ca_key: &PKeyRef<Private>,
        ca_cert: &X509Ref,
    ) -> Result<KeyCertPair, CertOperationError> {
        let private_key = self.new_private_key()?;
        let serial = self.new_serial()?;
        let not_before = asn1_to_unix(ca_cert.not_before()).map_err(|e| {
            CertOperationError::signing("Failed to read CA NotBefore", e)
        })?;

        let certificate = build_leaf_certificate(
            request,
            &private_key,
            &serial,
            ca_key,
            ca_cert,
            not_before + self.validity_seconds(),
        )
        .map_err(|e| {
            CertOperationError::signing(&format!("Failed to sign {}", request.name), e)
        })?;

        Ok(KeyCertPair {
            private_key,
            certificate,
        })
    }

    pub fn new_private_key(&mut self) -> Result<PKey<Private>, CertOperationError> {
        if self.key_size < DEFAULT_KEY_SIZE {
            return Err(CertOperationError::Config(format!(
                "RSA key size {} is below the {}-bit minimum",
                self.key_size, DEFAULT_KEY_SIZE
            )));
        }
        let rsa = self.random.generate_rsa(self.key_size)?;
        PKey::from_rsa(rsa)
            .map_err(|e| CertOperationError::generation("Failed to wrap RSA key", e))
    }

    /// Fixed-width positive serial: high bit cleared, next bit set.
    fn new_serial(&mut self) -> Result<BigNum, CertOperationError> {
        let mut bytes = [0u8; SERIAL_BYTES];
        self.random.fill_bytes(&mut bytes)?;
        bytes[0] = (bytes[0] & 0x7f) | 0x40;
        BigNum::from_slice(&bytes)
            .map_err(|e| CertOperationError::generation("Failed to build serial number", e))
    }
}

fn build_name(request: &CertificateRequest) -> Result<X509Name, ErrorStack> {
    let mut name = X509NameBuilder::new()?;
    if let Some(common_name) = &request.common_name {
        name.append_entry_by_nid(Nid::COMMONNAME, common_name)?;
    }
    for organization in &request.organizations {
        name.append_entry_by_nid(Nid::ORGANIZATIONNAME, organization)?;
    }
    Ok(name.build())
}

fn build_root_certificate(
    request: &CertificateRequest,
    key: &PKeyRef<Private>,
    serial: &BigNum,
    not_before: i64,
    not_after: i64,
) -> Result<X509, ErrorStack> {
    let name = build_name(request)?;

    let mut builder = X509Builder::new()?;
    builder.set_version(2)?;
    builder.set_serial_number(&*serial.to_asn1_integer()?)?;
    builder.set_subject_name(&name)?;
    builder.set_issuer_name(&name)?;
    builder.set_pubkey(key)?;
    builder.set_not_before(&*Asn1Time::from_unix(not_before)?)?;
    builder.set_not_after(&*Asn1Time::from_unix(not_after)?)?;

    builder.append_extension(BasicConstraints::new().critical().ca().build()?)?;
    builder.append_extension(
        KeyUsage::new()
            .critical()
            .digital_signature()
            .key_encipherment()
            .key_cert_sign()
            .build()?,
    )?;
    let subject_key_id = SubjectKeyIdentifier::new().build(&builder.x509v3_context(None, None))?;
    builder.append_extension(subject_key_id)?;

    builder.sign(key, MessageDigest::sha256())?;
    Ok(builder.build())
}

fn build_leaf_certificate(
    request: &CertificateRequest,
    key: &PKeyRef<Private>,
    serial: &BigNum,
    ca_key: &PKeyRef<Private>,
    ca_cert: &X509Ref,
    not_after: i64,
) -> Result<X509, ErrorStack> {
    let mut builder = X509Builder::new()?;
    builder.set_version(2)?;
    builder.set_serial_number(&*serial.to_asn1_integer()?)?;
    let subject = build_name(request)?;
    builder.set_subject_name(&subject)?;
    builder.set_issuer_name(ca_cert.subject_name())?;
    builder.set_pubkey(key)?;
    builder.set_not_before(ca_cert.not_before())?;
    builder.set_not_after(&*Asn1Time::from_unix(not_after)?)?;

    builder.append_extension(BasicConstraints::new().critical().build()?)?;
    builder.append_extension(
        KeyUsage::new()
            .critical()
            .digital_signature()
            .key_encipherment()
            .build()?,
    )?;
    if !request.extended_key_usages.is_empty() {
        builder.append_extension(extended_key_usage(&request.extended_key_usages)?)?;
    }
    if !request.alt_names.is_empty() {
        let alt_names = subject_alt_names(&request.alt_names)
            .build(&builder.x509v3_context(Some(ca_cert), None))?;
        builder.append_extension(alt_names)?;
    }
    let subject_key_id =
        SubjectKeyIdentifier::new().build(&builder.x509v3_context(Some(ca_cert), None))?;
    builder.append_extension(subject_key_id)?;
    let authority_key_id = AuthorityKeyIdentifier::new()
        .keyid(false)
        .build(&builder.x509v3_context(Some(ca_cert), None))?;
    builder.append_extension(authority_key_id)?;

    builder.sign(ca_key, MessageDigest::sha256())?;
    Ok(builder.build())
}

fn extended_key_usage(usages: &[Usage]) -> Result<openssl::x509::X509Extension, ErrorStack> {
    let mut extension = ExtendedKeyUsage::new();
    for usage in usages {
        match usage {
            Usage::ServerAuth => extension.server_auth(),
            Usage::ClientAuth => extension.client_auth(),
        };
    }
    extension.build()
}

fn subject_alt_names(alt_names: &AltNames) -> SubjectAlternativeName {
    let mut extension = SubjectAlternativeName::new();
    for dns_name in &alt_names.dns_names {
        extension.dns(dns_name);
    }
    for ip in &alt_names.ips {
        extension.ip(&ip.to_string());
    }
    extension
}

/// Seconds since the Unix epoch for an ASN.1 time.
pub fn asn1_to_unix(time: &Asn1TimeRef) -> Result<i64, ErrorStack> {
    let epoch = Asn1Time::from_unix(0)?;
    let diff = epoch.diff(time)?;
    Ok(i64::from(diff.days) * SECONDS_PER_DAY + i64::from(diff.secs))
}
