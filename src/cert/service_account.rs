// src/cert/service_account.rs
use super::codec::{encode_private_key, encode_public_key};
use super::error::CertOperationError;
use super::issuer::CertificateIssuer;
use super::random::RandomSource;

/// Token signing keypair for the controller manager (`sa.key`) and the
/// API server (`sa.pub`). Not a certificate, so it has no CA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAccountKeys {
    pub private_pem: Vec<u8>,
    pub public_pem: Vec<u8>,
}

pub struct ServiceAccountGenerator<'a, R: RandomSource> {
    issuer: &'a mut CertificateIssuer<R>,
}

impl<'a, R: RandomSource> ServiceAccountGenerator<'a, R> {
    pub fn new(issuer: &'a mut CertificateIssuer<R>) -> Self {
        Self { issuer }
    }

    pub fn generate_service_account_keys(
        &mut self,
    ) -> Result<ServiceAccountKeys, CertOperationError> {
        let key = self.issuer.new_private_key()?;
        Ok(ServiceAccountKeys {
            private_pem: encode_private_key(&key)?,
            public_pem: encode_public_key(&key)?,
        })
    }
}
