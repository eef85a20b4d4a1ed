/**
 * Download Link Signing
 *
 * Links handed out by the local backend carry an expiry timestamp and an
 * HMAC-SHA256 signature over `"{key}\n{expires}"`. The file handler
 * recomputes the signature before serving anything.
 */

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Why a signed link was rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("Download link has expired")]
    Expired,
    #[error("Invalid download link signature")]
    InvalidSignature,
}

/// Signs and verifies download links
#[derive(Clone)]
pub struct LinkSigner {
    key: Vec<u8>,
}

impl std::fmt::Debug for LinkSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkSigner").finish_non_exhaustive()
    }
}

impl LinkSigner {
    pub fn new(key: impl AsRef<[u8]>) -> Self {
        Self {
            key: key.as_ref().to_vec(),
        }
    }

    fn mac(&self, key: &str, expires: i64) -> HmacSha256 {
        // HMAC accepts keys of any length, so this cannot fail
        let mut mac = match HmacSha256::new_from_slice(&self.key) {
            Ok(mac) => mac,
            Err(_) => unreachable!("HMAC-SHA-256 accepts keys of any size"),
        };
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        mac
    }

    /// Hex signature for `key` valid until the Unix time `expires`
    pub fn sign(&self, key: &str, expires: i64) -> String {
        hex::encode(self.mac(key, expires).finalize().into_bytes())
    }

    /// Check a link at Unix time `now`
    pub fn verify(&self, key: &str, expires: i64, signature: &str, now: i64) -> Result<(), LinkError> {
        let provided = hex::decode(signature).map_err(|_| LinkError::InvalidSignature)?;
        self.mac(key, expires)
            .verify_slice(&provided)
            .map_err(|_| LinkError::InvalidSignature)?;
        if now > expires {
            return Err(LinkError::Expired);
        }
        Ok(())
    }
}
