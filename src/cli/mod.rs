//! Command-line front end
//!
//! # Usage
//!
//! ```bash
//! # List buckets / objects
//! s3soap ls
//! s3soap ls photos --json
//!
//! # Upload and download
//! s3soap put photos cat.jpg ./cat.jpg --content-type image/jpeg
//! s3soap get photos cat.jpg ./copy.jpg
//!
//! # Make an object world-readable
//! s3soap acl photos cat.jpg public
//!
//! # Any other operation
//! s3soap invoke GetBucketLoggingStatus Bucket=photos
//! ```
//!
//! Faults are reported as errors here, so every command exits non-zero when
//! the service rejects it.

pub mod args;
pub mod commands;

use anyhow::{Context, Result};
use tracing::debug;

use args::{Cli, Commands};
use crate::client::Client;
use crate::config;

/// Run one CLI invocation
pub fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref(), cli.profile.as_deref())?;

    let profile = config
        .get_profile(None)
        .ok_or_else(|| anyhow::anyhow!("No profile found in configuration"))?;

    let mut options = config.client_options();
    options.debug |= cli.debug;
    options.raise_error |= cli.raise_error;

    let mut transport = config.transport_config(profile);
    transport.insecure |= cli.insecure;

    debug!(endpoint = %transport.endpoint, ?options, "creating client");
    let client = Client::with_config(
        profile.access_key.clone(),
        profile.secret_key.clone(),
        options,
        transport,
    )
    .context("Failed to create client")?;

    match cli.command {
        Commands::Ls { bucket } => commands::cmd_ls(&client, bucket.as_deref(), cli.json),
        Commands::Mb { bucket } => commands::cmd_mb(&client, &bucket),
        Commands::Rb { bucket } => commands::cmd_rb(&client, &bucket),
        Commands::Put {
            bucket,
            key,
            file,
            content_type,
            metadata,
        } => commands::cmd_put(&client, &bucket, &key, &file, content_type.as_deref(), &metadata),
        Commands::Get { bucket, key, file } => {
            commands::cmd_get(&client, &bucket, &key, file.as_deref())
        }
        Commands::Rm { bucket, key } => commands::cmd_rm(&client, &bucket, &key),
        Commands::Acl { bucket, key, acl } => {
            commands::cmd_acl(&client, &bucket, &key, acl.as_deref())
        }
        Commands::Meta { bucket, key } => commands::cmd_meta(&client, &bucket, &key),
        Commands::Invoke { operation, params } => {
            commands::cmd_invoke(&client, &operation, &params)
        }
    }
}
