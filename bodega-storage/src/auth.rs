//! Draft-cavage HTTP signature signing for OCI REST calls.
//!
//! Every request is signed over `(request-target) host date` with RSA-SHA256;
//! the key id is `<tenancy>/<user>/<fingerprint>`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::sha2::Sha256;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;

use crate::error::StorageError;
use crate::profile::OciProfile;

/// Signs outgoing requests with the profile's API key.
pub struct RequestSigner {
    key_id: String,
    key: SigningKey<Sha256>,
}

impl RequestSigner {
    /// Load the profile's PEM key (PKCS#8 or PKCS#1) and build a signer.
    pub fn from_profile(profile: &OciProfile) -> Result<Self, StorageError> {
        let pem =
            std::fs::read_to_string(&profile.key_file).map_err(|source| StorageError::KeyRead {
                path: profile.key_file.clone(),
                source,
            })?;
        let key = RsaPrivateKey::from_pkcs8_pem(&pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(&pem))
            .map_err(|e| StorageError::KeyParse {
                path: profile.key_file.clone(),
                message: e.to_string(),
            })?;
        Ok(Self {
            key_id: format!(
                "{}/{}/{}",
                profile.tenancy, profile.user, profile.fingerprint
            ),
            key: SigningKey::new(key),
        })
    }

    /// `Authorization` header value for a request.
    ///
    /// `target` is the path plus query string exactly as sent on the wire;
    /// `date` is the RFC 7231 date header value being sent alongside.
    pub fn authorization(
        &self,
        method: &str,
        host: &str,
        target: &str,
        date: &str,
    ) -> Result<String, StorageError> {
        let signing_string = format!(
            "(request-target): {} {target}\nhost: {host}\ndate: {date}",
            method.to_ascii_lowercase()
        );
        let signature = self
            .key
            .try_sign(signing_string.as_bytes())
            .map_err(|e| StorageError::Sign(e.to_string()))?;
        Ok(format!(
            "Signature version=\"1\",keyId=\"{}\",algorithm=\"rsa-sha256\",\
             headers=\"(request-target) host date\",signature=\"{}\"",
            self.key_id,
            STANDARD.encode(signature.to_bytes())
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rsa::pkcs1::EncodeRsaPrivateKey;
    use rsa::pkcs8::{EncodePrivateKey, LineEnding};
    use tempfile::TempDir;

    use super::*;

    fn test_key() -> RsaPrivateKey {
        RsaPrivateKey::new(&mut rand::thread_rng(), 1024).expect("generate key")
    }

    fn profile_with_key(dir: &TempDir, pem: &str) -> OciProfile {
        let key_file = dir.path().join("api.pem");
        std::fs::write(&key_file, pem).expect("write key");
        OciProfile {
            user: "ocid1.user.oc1..u".into(),
            tenancy: "ocid1.tenancy.oc1..t".into(),
            fingerprint: "aa:bb:cc".into(),
            region: "us-ashburn-1".into(),
            key_file,
        }
    }

    #[test]
    fn signs_with_pkcs8_pem() {
        let dir = TempDir::new().unwrap();
        let pem = test_key().to_pkcs8_pem(LineEnding::LF).expect("pem");
        let signer = RequestSigner::from_profile(&profile_with_key(&dir, &pem)).expect("signer");

        let header = signer
            .authorization("get", "objectstorage.us-ashburn-1.oraclecloud.com", "/n/", "Tue, 05 Aug 2025 12:00:00 GMT")
            .expect("authorization");
        assert!(header.starts_with("Signature version=\"1\""));
        assert!(header.contains("keyId=\"ocid1.tenancy.oc1..t/ocid1.user.oc1..u/aa:bb:cc\""));
        assert!(header.contains("headers=\"(request-target) host date\""));
    }

    #[test]
    fn signs_with_pkcs1_pem() {
        let dir = TempDir::new().unwrap();
        let pem = test_key().to_pkcs1_pem(LineEnding::LF).expect("pem");
        let signer = RequestSigner::from_profile(&profile_with_key(&dir, &pem));
        assert!(signer.is_ok());
    }

    #[test]
    fn different_targets_produce_different_signatures() {
        let dir = TempDir::new().unwrap();
        let pem = test_key().to_pkcs8_pem(LineEnding::LF).expect("pem");
        let signer = RequestSigner::from_profile(&profile_with_key(&dir, &pem)).expect("signer");

        let date = "Tue, 05 Aug 2025 12:00:00 GMT";
        let host = "objectstorage.us-ashburn-1.oraclecloud.com";
        let a = signer.authorization("get", host, "/n/", date).unwrap();
        let b = signer.authorization("get", host, "/n/x/b/y/o", date).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn unreadable_key_is_key_read_error() {
        let profile = OciProfile {
            user: "u".into(),
            tenancy: "t".into(),
            fingerprint: "f".into(),
            region: "r".into(),
            key_file: PathBuf::from("/definitely/not/here.pem"),
        };
        let err = RequestSigner::from_profile(&profile).unwrap_err();
        assert!(matches!(err, StorageError::KeyRead { .. }));
    }

    #[test]
    fn garbage_pem_is_key_parse_error() {
        let dir = TempDir::new().unwrap();
        let err = RequestSigner::from_profile(&profile_with_key(&dir, "not a pem")).unwrap_err();
        assert!(matches!(err, StorageError::KeyParse { .. }));
    }
}
