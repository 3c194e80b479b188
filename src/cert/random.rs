// src/cert/random.rs
use super::error::CertOperationError;
use openssl::pkey::Private;
use openssl::rsa::Rsa;

/// Entropy for serial numbers and key generation.
///
/// The issuer owns its source, so a parallel build needs one source per
/// thread or a source that synchronizes internally.
pub trait RandomSource {
    fn fill_bytes(&mut self, buf: &mut [u8]) -> Result<(), CertOperationError>;
    fn generate_rsa(&mut self, bits: u32) -> Result<Rsa<Private>, CertOperationError>;
}

/// OpenSSL's process-wide CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&mut self, buf: &mut [u8]) -> Result<(), CertOperationError> {
        openssl::rand::rand_bytes(buf)
            .map_err(|e| CertOperationError::generation("Failed to read random bytes", e))
    }

    fn generate_rsa(&mut self, bits: u32) -> Result<Rsa<Private>, CertOperationError> {
        Rsa::generate(bits)
            .map_err(|e| CertOperationError::generation("Failed to generate RSA key", e))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Counts up from one instead of drawing random serial bytes; keys stay real.
    #[derive(Default)]
    pub(crate) struct SequentialRandom {
        next: u64,
    }

    impl RandomSource for SequentialRandom {
        fn fill_bytes(&mut self, buf: &mut [u8]) -> Result<(), CertOperationError> {
            self.next += 1;
            buf.iter_mut().for_each(|b| *b = 0);
            // serials are 16 bytes wide, so the counter always fits
            let counter = self.next.to_be_bytes();
            let offset = buf.len() - counter.len();
            buf[offset..].copy_from_slice(&counter);
            Ok(())
        }

        fn generate_rsa(&mut self, bits: u32) -> Result<Rsa<Private>, CertOperationError> {
            OsRandom.generate_rsa(bits)
        }
    }

    /// Serves a fixed number of requests, then reports exhaustion.
    pub(crate) struct ExhaustedRandom {
        remaining: usize,
    }

    impl ExhaustedRandom {
        pub fn after(requests: usize) -> Self {
            Self {
                remaining: requests,
            }
        }

        fn take(&mut self) -> Result<(), CertOperationError> {
            if self.remaining == 0 {
                return Err(CertOperationError::CertGeneration(
                    "random source exhausted".to_string(),
                ));
            }
            self.remaining -= 1;
            Ok(())
        }
    }

    impl RandomSource for ExhaustedRandom {
        fn fill_bytes(&mut self, buf: &mut [u8]) -> Result<(), CertOperationError> {
            self.take()?;
            OsRandom.fill_bytes(buf)
        }

        fn generate_rsa(&mut self, bits: u32) -> Result<Rsa<Private>, CertOperationError> {
            self.take()?;
            OsRandom.generate_rsa(bits)
        }
    }

    #[test]
    fn test_os_random_fills_buffer() {
        let mut first = [0u8; 16];
        let mut second = [0u8; 16];
        OsRandom.fill_bytes(&mut first).unwrap();
        OsRandom.fill_bytes(&mut second).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_os_random_generates_requested_size() {
        let rsa = OsRandom.generate_rsa(2048).unwrap();
        assert_eq!(rsa.size() * 8, 2048);
        assert!(rsa.check_key().unwrap());
    }

    #[test]
    fn test_exhausted_random_fails_after_budget() {
        let mut random = ExhaustedRandom::after(1);
        let mut buf = [0u8; 8];
        assert!(random.fill_bytes(&mut buf).is_ok());
        assert!(matches!(
            random.fill_bytes(&mut buf),
            Err(CertOperationError::CertGeneration(_))
        ));
    }
}
