//! s3soap - bucket and object client for the S3 SOAP interface
//!
//! ```no_run
//! use s3soap::{Client, ClientOptions, PutOptions};
//!
//! # fn main() -> s3soap::Result<()> {
//! let client = Client::new("AKID".into(), "secret".into(), ClientOptions::default())?;
//! if let Some(bucket) = client.create_bucket("test-bucket")? {
//!     bucket.put_object("k1", "hello", &PutOptions::default())?;
//!     let data = bucket.object("k1").get_data()?;
//!     assert_eq!(data.as_deref(), Some(&b"hello"[..]));
//! }
//! # Ok(())
//! # }
//! ```

pub mod bucket;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod object;
pub mod soap;
pub mod transport;
pub mod types;

pub use bucket::Bucket;
pub use client::{Client, ClientOptions};
pub use config::Config;
pub use error::{Error, Result};
pub use object::Object;
pub use soap::{Fault, Params, Response, Value};
pub use transport::{HttpsTransport, Transport, TransportConfig};
pub use types::{Acl, BucketSummary, ObjectSummary, PutOptions};
