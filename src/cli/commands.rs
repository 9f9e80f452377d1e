use anyhow::{Context, Result};
use std::io::Write;

use crate::cli::args::parse_pair;
use crate::client::Client;
use crate::soap::Params;
use crate::types::PutOptions;

/// Fail with the recorded fault, if the last call produced one
fn check_fault(client: &Client, what: &str) -> Result<()> {
    if let Some(fault) = client.last_fault() {
        anyhow::bail!("{} failed: {}", what, fault);
    }
    Ok(())
}

/// List buckets, or objects of `bucket`
pub fn cmd_ls(client: &Client, bucket: Option<&str>, json: bool) -> Result<()> {
    match bucket {
        None => {
            let buckets = client.list_bucket_summaries()?;
            check_fault(client, "ListAllMyBuckets")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&buckets)?);
                return Ok(());
            }
            for bucket in &buckets {
                println!(
                    "{:<24} {}",
                    bucket.creation_date.as_deref().unwrap_or("-"),
                    bucket.name
                );
            }
        }
        Some(name) => {
            let objects = client.bucket(name).list_summaries()?;
            check_fault(client, "ListBucket")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&objects)?);
                return Ok(());
            }
            for object in &objects {
                println!(
                    "{:<24} {:>12} {}",
                    object.last_modified.as_deref().unwrap_or("-"),
                    object.size,
                    object.key
                );
            }
        }
    }
    Ok(())
}

/// Make bucket command
pub fn cmd_mb(client: &Client, bucket: &str) -> Result<()> {
    match client.create_bucket(bucket)? {
        Some(bucket) => println!("Bucket created: {}", bucket.name()),
        None => check_fault(client, "CreateBucket")?,
    }
    Ok(())
}

/// Remove bucket command
pub fn cmd_rb(client: &Client, bucket: &str) -> Result<()> {
    client.bucket(bucket).delete()?;
    check_fault(client, "DeleteBucket")?;
    println!("Bucket removed: {}", bucket);
    Ok(())
}

/// Upload command
pub fn cmd_put(
    client: &Client,
    bucket: &str,
    key: &str,
    file: &str,
    content_type: Option<&str>,
    metadata: &[String],
) -> Result<()> {
    let data = std::fs::read(file).context(format!("Failed to read {}", file))?;

    let mut options = PutOptions::new();
    if let Some(content_type) = content_type {
        options = options.with_content_type(content_type);
    }
    for pair in metadata {
        let (name, value) = parse_pair(pair)?;
        options = options.with_metadata(name, value);
    }

    match client.bucket(bucket).put_object(key, &data, &options)? {
        Some(object) => println!(
            "Uploaded {} bytes to {}/{}",
            data.len(),
            object.bucket_name(),
            object.key()
        ),
        None => check_fault(client, "PutObjectInline")?,
    }
    Ok(())
}

/// Download command
pub fn cmd_get(client: &Client, bucket: &str, key: &str, file: Option<&str>) -> Result<()> {
    let data = client.bucket(bucket).object(key).get_data()?;
    check_fault(client, "GetObject")?;
    let data = data.ok_or_else(|| anyhow::anyhow!("Reply for {}/{} carried no data", bucket, key))?;

    match file {
        Some(path) => {
            std::fs::write(path, &data).context(format!("Failed to write {}", path))?;
            println!("Downloaded {} bytes to {}", data.len(), path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Remove object command
pub fn cmd_rm(client: &Client, bucket: &str, key: &str) -> Result<()> {
    client.bucket(bucket).object(key).delete()?;
    check_fault(client, "DeleteObject")?;
    println!("Removed {}/{}", bucket, key);
    Ok(())
}

/// Show or set ACL command
pub fn cmd_acl(client: &Client, bucket: &str, key: &str, acl: Option<&str>) -> Result<()> {
    let object = client.bucket(bucket).object(key);
    match acl {
        Some(acl) => {
            object.set_acl(acl)?;
            check_fault(client, "SetObjectAccessControlPolicy")?;
            println!("{}/{}: {}", bucket, key, acl.to_ascii_lowercase());
        }
        None => {
            let acl = object.acl()?;
            check_fault(client, "GetObjectAccessControlPolicy")?;
            println!("{}/{}: {}", bucket, key, acl);
        }
    }
    Ok(())
}

/// Show metadata command
pub fn cmd_meta(client: &Client, bucket: &str, key: &str) -> Result<()> {
    let metadata = client.bucket(bucket).object(key).metadata()?;
    check_fault(client, "GetObject")?;
    for (name, value) in metadata.unwrap_or_default() {
        println!("{}: {}", name, value);
    }
    Ok(())
}

/// Raw operation command
pub fn cmd_invoke(client: &Client, operation: &str, params: &[String]) -> Result<()> {
    let mut request = Params::new();
    for pair in params {
        let (name, value) = parse_pair(pair)?;
        request.push(name, value);
    }

    let response = client.invoke(operation, request)?;
    println!("{}", response.tidy());
    check_fault(client, operation)
}
