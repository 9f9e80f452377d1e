//! Basic usage example for s3soap
//!
//! Creates a bucket, stores an object, reads it back and cleans up.
//!
//! Run with:
//! ```
//! AWS_ACCESS_KEY_ID=... AWS_SECRET_ACCESS_KEY=... cargo run --example basic_usage
//! ```

use s3soap::{Client, ClientOptions, PutOptions, Result};

fn main() -> Result<()> {
    let access_key = std::env::var("AWS_ACCESS_KEY_ID").unwrap_or_else(|_| "YOUR_ACCESS_KEY".to_string());
    let secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_else(|_| "YOUR_SECRET_KEY".to_string());

    let client = Client::new(
        access_key,
        secret_key,
        ClientOptions {
            raise_error: true,
            ..Default::default()
        },
    )?;

    println!("s3soap - Basic Usage Example");
    println!("============================\n");

    // Example 1: List buckets
    println!("1. Listing buckets...");
    for bucket in client.list_bucket_summaries()? {
        println!(
            "   - {} (created {})",
            bucket.name,
            bucket.creation_date.as_deref().unwrap_or("-")
        );
    }
    println!();

    // Example 2: Create bucket
    println!("2. Creating bucket...");
    let bucket = match client.create_bucket("s3soap-example")? {
        Some(bucket) => bucket,
        None => client.bucket("s3soap-example"),
    };
    println!("   Bucket: {}\n", bucket.name());

    // Example 3: Put object
    println!("3. Uploading object...");
    let options = PutOptions::new().with_metadata("origin", "basic_usage");
    let object = match bucket.put_object("hello.txt", "Hello, SOAP!", &options)? {
        Some(object) => object,
        None => bucket.object("hello.txt"),
    };
    println!("   Uploaded {}/{}\n", object.bucket_name(), object.key());

    // Example 4: Read it back and publish it
    println!("4. Downloading object...");
    if let Some(data) = object.get_data()? {
        println!("   Content: {}", String::from_utf8_lossy(&data));
    }
    object.set_acl("public")?;
    println!("   ACL is now {}\n", object.acl()?);

    // Example 5: Clean up
    println!("5. Deleting object and bucket...");
    object.delete()?;
    bucket.delete()?;
    println!("   Deleted successfully");

    Ok(())
}
