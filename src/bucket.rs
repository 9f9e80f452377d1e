//! Bucket handle

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::client::Client;
use crate::error::Result;
use crate::object::Object;
use crate::soap::{Element, Params};
use crate::types::{ObjectSummary, PutOptions};

/// A bucket, identified by name
///
/// Holds no remote state; constructing one never touches the network.
#[derive(Debug, Clone)]
pub struct Bucket<'c> {
    client: &'c Client,
    name: String,
}

impl<'c> Bucket<'c> {
    pub(crate) fn new(client: &'c Client, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn client(&self) -> &'c Client {
        self.client
    }

    /// Delete the bucket. The service faults if it still holds objects.
    pub fn delete(&self) -> Result<()> {
        self.client
            .invoke("DeleteBucket", Params::new().with("Bucket", self.name.as_str()))?;
        Ok(())
    }

    /// One handle per object in the bucket, in reply order
    pub fn list(&self) -> Result<Vec<Object<'c>>> {
        self.list_contents(|contents| {
            Object::new(self.clone(), contents.child_text("Key").unwrap_or_default())
        })
    }

    /// Key, size, etag and owner of every object in the bucket
    pub fn list_summaries(&self) -> Result<Vec<ObjectSummary>> {
        self.list_contents(ObjectSummary::from_element)
    }

    fn list_contents<T>(&self, map: impl Fn(&Element) -> T) -> Result<Vec<T>> {
        let response = self
            .client
            .invoke("ListBucket", Params::new().with("Bucket", self.name.as_str()))?;
        Ok(response
            .result_all("Contents")
            .into_iter()
            .map(map)
            .collect())
    }

    /// Store `data` under `key`; `None` if the service answered with a fault
    ///
    /// The payload travels base64-encoded while `ContentLength` carries the
    /// length of the raw bytes.
    pub fn put_object(
        &self,
        key: &str,
        data: impl AsRef<[u8]>,
        options: &PutOptions,
    ) -> Result<Option<Object<'c>>> {
        let data = data.as_ref();

        let mut params = Params::new()
            .with("Bucket", self.name.as_str())
            .with("Key", key)
            .with(
                "Metadata",
                Params::new()
                    .with("Name", "Content-Type")
                    .with("Value", options.content_type()),
            );
        for (name, value) in &options.metadata {
            params.push(
                "Metadata",
                Params::new()
                    .with("Name", name.as_str())
                    .with("Value", value.as_str()),
            );
        }
        params.push("Data", BASE64.encode(data));
        params.push("ContentLength", data.len());

        let response = self.client.invoke("PutObjectInline", params)?;
        if response.is_fault() {
            return Ok(None);
        }
        Ok(Some(self.object(key)))
    }

    /// Handle for an object in this bucket. No network call.
    pub fn object(&self, key: &str) -> Object<'c> {
        Object::new(self.clone(), key)
    }
}

impl PartialEq for Bucket<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.client, other.client) && self.name == other.name
    }
}

impl Eq for Bucket<'_> {}
