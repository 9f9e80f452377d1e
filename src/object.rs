//! Object handle

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::bucket::Bucket;
use crate::client::Client;
use crate::error::Result;
use crate::soap::Params;
use crate::types::{Acl, ALL_USERS_URI};

/// An object, identified by bucket name and key
///
/// Holds no remote state; every accessor is a round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object<'c> {
    bucket: Bucket<'c>,
    key: String,
}

impl<'c> Object<'c> {
    pub(crate) fn new(bucket: Bucket<'c>, key: impl Into<String>) -> Self {
        Self {
            bucket,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn bucket(&self) -> &Bucket<'c> {
        &self.bucket
    }

    pub fn bucket_name(&self) -> &str {
        self.bucket.name()
    }

    pub fn client(&self) -> &'c Client {
        self.bucket.client()
    }

    fn params(&self) -> Params {
        Params::new()
            .with("Bucket", self.bucket.name())
            .with("Key", self.key.as_str())
    }

    pub fn delete(&self) -> Result<()> {
        self.client().invoke("DeleteObject", self.params())?;
        Ok(())
    }

    /// Current access policy
    ///
    /// `Public` when any grant names the all-users group, `Private`
    /// otherwise (including an empty grant list or a faulted call).
    pub fn acl(&self) -> Result<Acl> {
        let response = self
            .client()
            .invoke("GetObjectAccessControlPolicy", self.params())?;
        let public = response
            .result_all("AccessControlList/Grant")
            .into_iter()
            .filter_map(|grant| grant.find("Grantee/URI"))
            .any(|uri| uri.text == ALL_USERS_URI);

        Ok(if public { Acl::Public } else { Acl::Private })
    }

    /// Replace the access policy. Accepts `public` or `private` in any case.
    ///
    /// Any other value fails before a request is made.
    pub fn set_acl(&self, acl: &str) -> Result<()> {
        let acl: Acl = acl.parse()?;
        self.apply_acl(acl)
    }

    /// Typed form of [`Object::set_acl`]
    pub fn apply_acl(&self, acl: Acl) -> Result<()> {
        let grants = match acl {
            Acl::Public => Params::new().with(
                "Grant",
                Params::new()
                    .with("Grantee", Params::new().with("URI", ALL_USERS_URI))
                    .with("Permission", "READ"),
            ),
            Acl::Private => Params::new(),
        };
        let params = self.params().with("AccessControlList", grants);

        self.client()
            .invoke("SetObjectAccessControlPolicy", params)?;
        Ok(())
    }

    /// Object content; `None` on fault or when the reply has no `Data`
    pub fn get_data(&self) -> Result<Option<Vec<u8>>> {
        let params = self
            .params()
            .with("GetMetadata", false)
            .with("GetData", true)
            .with("InlineData", true);
        let response = self.client().invoke("GetObject", params)?;
        if response.is_fault() {
            return Ok(None);
        }

        match response.result().and_then(|r| r.child("Data")) {
            Some(data) => {
                // base64Binary may be wrapped across lines
                let text: String = data
                    .text
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                Ok(Some(BASE64.decode(text)?))
            }
            None => Ok(None),
        }
    }

    /// User and system metadata as name/value pairs; `None` on fault
    pub fn metadata(&self) -> Result<Option<Vec<(String, String)>>> {
        let params = self
            .params()
            .with("GetMetadata", true)
            .with("GetData", false)
            .with("InlineData", false);
        let response = self.client().invoke("GetObject", params)?;
        if response.is_fault() {
            return Ok(None);
        }

        Ok(Some(
            response
                .result_all("Metadata")
                .into_iter()
                .map(|m| {
                    (
                        m.child_text("Name").unwrap_or_default().to_string(),
                        m.child_text("Value").unwrap_or_default().to_string(),
                    )
                })
                .collect(),
        ))
    }
}
