use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "s3soap")]
#[command(version, about = "Manage buckets and objects over the S3 SOAP interface", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (environment variables are used when omitted)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Profile to use from config
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Print every SOAP request and reply
    #[arg(long, global = true)]
    pub debug: bool,

    /// Stop on the first SOAP fault
    #[arg(long, global = true)]
    pub raise_error: bool,

    /// Disable SSL certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Print listings as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List buckets, or the objects of one bucket
    Ls {
        /// Bucket name
        bucket: Option<String>,
    },

    /// Make bucket
    Mb {
        bucket: String,
    },

    /// Remove bucket (must be empty)
    Rb {
        bucket: String,
    },

    /// Upload a local file
    Put {
        bucket: String,
        key: String,
        /// Local file to upload
        file: String,

        /// Content type (default: text/plain)
        #[arg(long)]
        content_type: Option<String>,

        /// Extra metadata as NAME=VALUE, repeatable
        #[arg(long = "meta", value_name = "NAME=VALUE")]
        metadata: Vec<String>,
    },

    /// Download an object (to stdout when no file is given)
    Get {
        bucket: String,
        key: String,
        file: Option<String>,
    },

    /// Remove an object
    Rm {
        bucket: String,
        key: String,
    },

    /// Show or set an object's ACL
    Acl {
        bucket: String,
        key: String,
        /// public or private
        acl: Option<String>,
    },

    /// Show an object's metadata
    Meta {
        bucket: String,
        key: String,
    },

    /// Invoke any operation by name and print the reply
    Invoke {
        /// Operation name, e.g. GetBucketLoggingStatus
        operation: String,
        /// Parameters as NAME=VALUE
        #[arg(value_name = "NAME=VALUE")]
        params: Vec<String>,
    },
}

/// Split a `NAME=VALUE` argument
pub fn parse_pair(arg: &str) -> anyhow::Result<(String, String)> {
    match arg.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => anyhow::bail!("Expected NAME=VALUE, got '{}'", arg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("Bucket=photos").unwrap(),
            ("Bucket".to_string(), "photos".to_string())
        );
        assert_eq!(
            parse_pair("Prefix=").unwrap(),
            ("Prefix".to_string(), String::new())
        );
        assert!(parse_pair("novalue").is_err());
        assert!(parse_pair("=x").is_err());
    }

    #[test]
    fn test_cli_parses_put() {
        let cli = Cli::parse_from([
            "s3soap", "--raise-error", "put", "photos", "cat.jpg", "./cat.jpg",
            "--content-type", "image/jpeg", "--meta", "owner=alice",
        ]);
        assert!(cli.raise_error);
        match cli.command {
            Commands::Put { bucket, key, content_type, metadata, .. } => {
                assert_eq!(bucket, "photos");
                assert_eq!(key, "cat.jpg");
                assert_eq!(content_type.as_deref(), Some("image/jpeg"));
                assert_eq!(metadata, vec!["owner=alice".to_string()]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
