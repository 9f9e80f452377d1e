//! Value types returned by bucket and object operations

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::soap::Element;

/// Grantee URI of the group containing every anonymous user
pub const ALL_USERS_URI: &str = "http://acs.amazonaws.com/groups/global/AllUsers";

/// Content type used by `put_object` when none is given
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Object access policy, collapsed to public-read or owner-only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Acl {
    Public,
    Private,
}

impl Acl {
    /// Accepted spellings for [`FromStr`]
    pub const VALID: &'static [&'static str] = &["public", "private"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Acl::Public => "public",
            Acl::Private => "private",
        }
    }
}

impl FromStr for Acl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(Acl::Public),
            "private" => Ok(Acl::Private),
            _ => Err(Error::InvalidArgument {
                value: s.to_string(),
                valid: Self::VALID,
            }),
        }
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for `put_object`
#[derive(Debug, Clone, Default)]
pub struct PutOptions {
    /// Defaults to `text/plain`
    pub content_type: Option<String>,
    /// Extra `Metadata` name/value pairs, sent after the content type
    pub metadata: Vec<(String, String)>,
}

impl PutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((name.into(), value.into()));
        self
    }

    pub fn content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

/// Bucket entry of a `ListAllMyBuckets` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSummary {
    pub name: String,
    pub creation_date: Option<String>,
}

impl BucketSummary {
    pub fn from_element(bucket: &Element) -> Self {
        Self {
            name: bucket.child_text("Name").unwrap_or_default().to_string(),
            creation_date: bucket.child_text("CreationDate").map(str::to_string),
        }
    }
}

/// `Contents` entry of a `ListBucket` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<String>,
    pub etag: Option<String>,
    /// STANDARD, REDUCED_REDUNDANCY, ...
    pub storage_class: Option<String>,
    pub owner_id: Option<String>,
    pub owner_display_name: Option<String>,
}

impl ObjectSummary {
    pub fn from_element(contents: &Element) -> Self {
        let owner = contents.child("Owner");
        Self {
            key: contents.child_text("Key").unwrap_or_default().to_string(),
            size: contents
                .child_text("Size")
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            last_modified: contents.child_text("LastModified").map(str::to_string),
            etag: contents.child_text("ETag").map(str::to_string),
            storage_class: contents.child_text("StorageClass").map(str::to_string),
            owner_id: owner.and_then(|o| o.child_text("ID")).map(str::to_string),
            owner_display_name: owner
                .and_then(|o| o.child_text("DisplayName"))
                .map(str::to_string),
        }
    }
}
