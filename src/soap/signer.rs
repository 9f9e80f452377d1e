//! Request signer for the S3 SOAP interface
//!
//! Every operation carries three authentication parameters:
//! `AWSAccessKeyId`, `Timestamp` and `Signature`, where
//!
//! ```text
//! Signature = Base64(HMAC-SHA1(SecretKey, "AmazonS3" + Operation + Timestamp))
//! ```
//!
//! The timestamp is UTC with the millisecond field fixed at `.000`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::soap::Params;

type HmacSha1 = Hmac<Sha1>;

/// Prefix of every string to sign
const SIGNING_SERVICE: &str = "AmazonS3";

/// Timestamp format, milliseconds always `.000`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000Z";

/// Signs SOAP operations with the account's shared secret
#[derive(Clone)]
pub struct SoapSigner {
    access_key: String,
    secret_key: String,
}

impl std::fmt::Debug for SoapSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoapSigner")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl SoapSigner {
    pub fn new(access_key: String, secret_key: String) -> Self {
        Self {
            access_key,
            secret_key,
        }
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Format a UTC instant the way the service expects it
    pub fn format_timestamp(at: &DateTime<Utc>) -> String {
        at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Signature for `operation` at an explicit `timestamp`
    pub fn sign_at(&self, operation: &str, timestamp: &str) -> String {
        let mut string_to_sign =
            String::with_capacity(SIGNING_SERVICE.len() + operation.len() + timestamp.len());
        string_to_sign.push_str(SIGNING_SERVICE);
        string_to_sign.push_str(operation);
        string_to_sign.push_str(timestamp);

        BASE64.encode(Self::hmac_sha1(
            self.secret_key.as_bytes(),
            string_to_sign.as_bytes(),
        ))
    }

    /// Append the authentication parameters for `operation` signed at `at`
    pub fn append_auth_at(&self, params: &mut Params, operation: &str, at: &DateTime<Utc>) {
        let timestamp = Self::format_timestamp(at);
        let signature = self.sign_at(operation, &timestamp);
        params.push("AWSAccessKeyId", self.access_key.as_str());
        params.push("Timestamp", timestamp);
        params.push("Signature", signature);
    }

    /// Append the authentication parameters for `operation`, signed now
    pub fn append_auth(&self, params: &mut Params, operation: &str) {
        self.append_auth_at(params, operation, &Utc::now());
    }

    fn hmac_sha1(key: &[u8], msg: &[u8]) -> [u8; 20] {
        let mut mac = HmacSha1::new_from_slice(key).expect("HMAC can take key of any size");
        mac.update(msg);
        let result = mac.finalize().into_bytes();
        let mut output = [0u8; 20];
        output.copy_from_slice(&result);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soap::Value;
    use chrono::TimeZone;

    const TS: &str = "2006-03-01T12:00:00.000Z";

    fn signer() -> SoapSigner {
        SoapSigner::new("AKIDEXAMPLE".to_string(), "secret".to_string())
    }

    #[test]
    fn test_known_signature() {
        assert_eq!(
            signer().sign_at("ListAllMyBuckets", TS),
            "iMxWAW3SUWFZPQK5tgt68wBkPJU="
        );
        assert_eq!(
            signer().sign_at("CreateBucket", TS),
            "7/qYb/W0aijtvlzGvvK6j1L6zWI="
        );
    }

    #[test]
    fn test_signature_is_deterministic() {
        let s = signer();
        assert_eq!(s.sign_at("PutObjectInline", TS), s.sign_at("PutObjectInline", TS));
    }

    #[test]
    fn test_signature_changes_with_each_input() {
        let base = signer().sign_at("GetObject", TS);

        let other_secret = SoapSigner::new("AKIDEXAMPLE".to_string(), "secret2".to_string());
        assert_ne!(base, other_secret.sign_at("GetObject", TS));
        assert_ne!(base, signer().sign_at("DeleteObject", TS));
        assert_ne!(base, signer().sign_at("GetObject", "2006-03-01T12:00:01.000Z"));
    }

    #[test]
    fn test_timestamp_forces_zero_millis() {
        let at = Utc
            .with_ymd_and_hms(2024, 2, 29, 23, 59, 58)
            .unwrap()
            + chrono::Duration::milliseconds(731);
        assert_eq!(SoapSigner::format_timestamp(&at), "2024-02-29T23:59:58.000Z");
    }

    #[test]
    fn test_auth_params_are_appended_in_order() {
        let at = Utc.with_ymd_and_hms(2006, 3, 1, 12, 0, 0).unwrap();
        let mut params = Params::new().with("Bucket", "test-bucket");
        signer().append_auth_at(&mut params, "CreateBucket", &at);

        assert_eq!(
            params.names(),
            vec!["Bucket", "AWSAccessKeyId", "Timestamp", "Signature"]
        );
        assert_eq!(params.get("AWSAccessKeyId"), Some(&Value::from("AKIDEXAMPLE")));
        assert_eq!(params.get("Timestamp"), Some(&Value::from(TS)));
        assert_eq!(
            params.get("Signature"),
            Some(&Value::from("7/qYb/W0aijtvlzGvvK6j1L6zWI="))
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let out = format!("{:?}", signer());
        assert!(out.contains("AKIDEXAMPLE"));
        assert!(!out.contains("\"secret\""));
    }
}
