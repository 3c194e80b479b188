// src/cert/verification.rs
use super::codec::{decode_certificate, decode_private_key};
use super::error::CertOperationError;
use super::types::{CaGroup, PkiBundle};
use crate::constants::{SERVICE_ACCOUNT_PRIVATE_KEY, SERVICE_ACCOUNT_PUBLIC_KEY};
use crate::utils::logging::Logger;
use openssl::pkey::PKey;
use openssl::stack::Stack;
use openssl::x509::store::X509StoreBuilder;
use openssl::x509::{X509Ref, X509StoreContext, X509};

/// Standard chain verification of `cert` against `ca` as the only trust anchor.
pub fn verify_issued_by(cert: &X509Ref, ca: &X509Ref) -> Result<bool, CertOperationError> {
    let context = "Failed to set up chain verification";

    let mut store = X509StoreBuilder::new()
        .map_err(|e| CertOperationError::verification(context, e))?;
    store
        .add_cert(ca.to_owned())
        .map_err(|e| CertOperationError::verification(context, e))?;
    let store = store.build();

    let chain: Stack<X509> =
        Stack::new().map_err(|e| CertOperationError::verification(context, e))?;
    let mut store_context =
        X509StoreContext::new().map_err(|e| CertOperationError::verification(context, e))?;
    store_context
        .init(&store, cert, &chain, |c| c.verify_cert())
        .map_err(|e| CertOperationError::verification(context, e))
}

pub struct CertificateVerifier {
    logger: Box<dyn Logger>,
}

impl CertificateVerifier {
    pub fn new(logger: Box<dyn Logger>) -> Self {
        Self { logger }
    }

    /// Checks every CA, every leaf against its own CA, and the service-account keypair.
    pub fn verify_bundle(
        &mut self,
        bundle: &PkiBundle,
        groups: &[CaGroup],
    ) -> Result<(), CertOperationError> {
        self.logger.log("Verifying generated certificates...");

        for group in groups {
            let ca = self.verify_certificate(bundle, &group.authority.name, None)?;
            for request in &group.issued {
                self.verify_certificate(bundle, &request.name, Some(&ca))?;
            }
        }
        self.verify_service_account_keypair(bundle)?;

        self.logger.log("Certificate verification successful");
        Ok(())
    }

    /// Decodes `name` from the bundle, checks its key matches and that it
    /// chains to `ca` (or to itself when `ca` is `None`).
    pub fn verify_certificate(
        &mut self,
        bundle: &PkiBundle,
        name: &str,
        ca: Option<&X509>,
    ) -> Result<X509, CertOperationError> {
        self.logger
            .debug_log(&format!("Verifying certificate: {}", name));

        let cert_pem = bundle
            .cert(name)
            .ok_or_else(|| missing(&format!("{} certificate", name)))?;
        let key_pem = bundle
            .key(name)
            .ok_or_else(|| missing(&format!("{} private key", name)))?;
        let cert = decode_certificate(cert_pem)?;
        let key = decode_private_key(key_pem)?;

        let public_key = cert
            .public_key()
            .map_err(|e| CertOperationError::verification(name, e))?;
        if !public_key.public_eq(&key) {
            return Err(CertOperationError::Verification(format!(
                "{} private key does not match its certificate",
                name
            )));
        }

        let anchor: &X509Ref = match ca {
            Some(ca) => ca,
            None => &cert,
        };
        if !verify_issued_by(&cert, anchor)? {
            return Err(CertOperationError::Verification(format!(
                "Certificate chain verification failed for {}",
                name
            )));
        }

        Ok(cert)
    }

    pub fn verify_service_account_keypair(
        &mut self,
        bundle: &PkiBundle,
    ) -> Result<(), CertOperationError> {
        self.logger.debug_log("Verifying service account key pair...");

        let private_pem = bundle
            .get(SERVICE_ACCOUNT_PRIVATE_KEY)
            .ok_or_else(|| missing(SERVICE_ACCOUNT_PRIVATE_KEY))?;
        let public_pem = bundle
            .get(SERVICE_ACCOUNT_PUBLIC_KEY)
            .ok_or_else(|| missing(SERVICE_ACCOUNT_PUBLIC_KEY))?;

        let private = decode_private_key(private_pem)?;
        let public = PKey::public_key_from_pem(public_pem)
            .map_err(|e| CertOperationError::encoding("Failed to decode sa.pub", e))?;
        if !public.public_eq(&private) {
            return Err(CertOperationError::Verification(
                "Service account key pair verification failed".to_string(),
            ));
        }
        Ok(())
    }
}

fn missing(what: &str) -> CertOperationError {
    CertOperationError::Verification(format!("{} not found in bundle", what))
}
