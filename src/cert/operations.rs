// src/cert/operations.rs

use super::catalog::build_catalog;
use super::codec::encode_key_and_cert;
use super::error::CertOperationError;
use super::issuer::CertificateIssuer;
use super::random::{OsRandom, RandomSource};
use super::service_account::ServiceAccountGenerator;
use super::types::{AltNames, CaGroup, PkiBundle};
use crate::config::ClusterConfig;
use crate::constants::{
    DEFAULT_KEY_SIZE, DEFAULT_VALIDITY_DAYS, SERVICE_ACCOUNT_PRIVATE_KEY, SERVICE_ACCOUNT_PUBLIC_KEY,
};
use crate::utils::logging::Logger;

pub struct CertificateOperations<R: RandomSource = OsRandom> {
    logger: Box<dyn Logger>,
    issuer: CertificateIssuer<R>,
}

impl CertificateOperations<OsRandom> {
    pub fn new(logger: Box<dyn Logger>) -> Self {
        Self::with_random(logger, OsRandom)
    }
}

impl<R: RandomSource> CertificateOperations<R> {
    pub fn with_random(logger: Box<dyn Logger>, random: R) -> Self {
        Self {
            logger,
            issuer: CertificateIssuer::with_random(random, DEFAULT_KEY_SIZE, DEFAULT_VALIDITY_DAYS),
        }
    }

    pub fn log(&mut self, message: &str) {
        self.logger.log(message);
    }

    pub fn debug_log(&mut self, message: &str) {
        self.logger.debug_log(message);
    }

    /// Hands the logger on, e.g. to a `CertificateVerifier` for the same run.
    pub fn into_logger(self) -> Box<dyn Logger> {
        self.logger
    }

    /// Issues the whole hierarchy plus the service-account keypair.
    ///
    /// Any failure discards everything issued so far; there is no partial
    /// bundle.
    pub fn generate_all(
        &mut self,
        config: &ClusterConfig,
    ) -> Result<PkiBundle, CertOperationError> {
        self.generate(config).map(|(_, bundle)| bundle)
    }

    /// Like `generate_all`, also returning the CA groups the bundle was built from.
    pub fn generate(
        &mut self,
        config: &ClusterConfig,
    ) -> Result<(Vec<CaGroup>, PkiBundle), CertOperationError> {
        config
            .validate()
            .map_err(|e| CertOperationError::Config(e.to_string()))?;
        let groups = build_catalog(config)?;
        self.issuer.set_policy(config.key_size, config.validity_days);

        match self.generate_bundle(&groups) {
            Ok(bundle) => {
                self.log(&format!(
                    "Generated {} PKI files across {} CA groups",
                    bundle.len(),
                    groups.len()
                ));
                Ok((groups, bundle))
            }
            Err(e) => {
                self.log(&format!("PKI generation aborted: {}", e));
                Err(e)
            }
        }
    }

    fn generate_bundle(&mut self, groups: &[CaGroup]) -> Result<PkiBundle, CertOperationError> {
        let mut bundle = PkiBundle::new();
        for group in groups {
            self.generate_group(group, &mut bundle)?;
        }

        self.log("Generating service account key pair");
        let keys = ServiceAccountGenerator::new(&mut self.issuer).generate_service_account_keys()?;
        bundle.insert(SERVICE_ACCOUNT_PRIVATE_KEY, keys.private_pem);
        bundle.insert(SERVICE_ACCOUNT_PUBLIC_KEY, keys.public_pem);

        Ok(bundle)
    }

    fn generate_group(
        &mut self,
        group: &CaGroup,
        bundle: &mut PkiBundle,
    ) -> Result<(), CertOperationError> {
        let authority = &group.authority;
        self.log(&format!("Generating CA certificate {}", authority.name));
        let ca = self.issuer.issue_root(authority)?;
        bundle.insert_pair(
            &authority.name,
            encode_key_and_cert(&ca.private_key, &ca.certificate)?,
        );
        self.debug_log(&format!("{} serial {}", authority.name, ca.serial_hex()?));

        for request in &group.issued {
            self.log(&format!(
                "Generating certificate {} signed by {}",
                request.name, authority.name
            ));
            self.debug_alt_names(&request.name, &request.alt_names);
            let leaf = self
                .issuer
                .issue_leaf(request, &ca.private_key, &ca.certificate)?;
            bundle.insert_pair(
                &request.name,
                encode_key_and_cert(&leaf.private_key, &leaf.certificate)?,
            );
            self.debug_log(&format!("{} serial {}", request.name, leaf.serial_hex()?));
        }

        Ok(())
    }

    fn debug_alt_names(&mut self, name: &str, alt_names: &AltNames) {
        if alt_names.is_empty() {
            return;
        }
        let ips: Vec<String> = alt_names.ips.iter().map(|ip| ip.to_string()).collect();
        self.debug_log(&format!(
            "{} alt names: DNS [{}] IP [{}]",
            name,
            alt_names.dns_names.join(", "),
            ips.join(", ")
        ));
    }
}

/// Builds the control-plane PKI with OpenSSL's random source, logging nowhere.
pub fn build(config: &ClusterConfig) -> Result<PkiBundle, CertOperationError> {
    CertificateOperations::new(Box::new(crate::utils::logging::NullLogger)).generate_all(config)
}
