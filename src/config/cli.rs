use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_required_field, validate_url, Validate};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "s3cli")]
#[command(about = "Command-line client for the S3 gateway API")]
pub struct CliConfig {
    /// Base URL of the deployed gateway API
    #[arg(long, env = "API_URL", global = true)]
    pub api_url: Option<String>,

    /// API key sent in the x-api-key header
    #[arg(long, env = "S3_PROXY_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[arg(long, help = "Enable verbose output", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// List buckets
    List,
    /// Download an object to a file
    Get(ObjectArgs),
    /// Upload a file as an object
    Put(ObjectArgs),
    /// Delete an object
    Delete(DeleteArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ObjectArgs {
    #[arg(long, help = "Bucket name")]
    pub bucket: String,

    #[arg(long, help = "Object key")]
    pub key: String,

    /// File to upload or download; downloads default to the object key
    #[arg(long)]
    pub file: Option<String>,

    #[arg(long, help = "Transfer through a presigned URL instead of the gateway")]
    pub presigned: bool,
}

impl ObjectArgs {
    pub fn file_path(&self) -> &str {
        self.file.as_deref().unwrap_or(&self.key)
    }
}

#[derive(Debug, Clone, Args)]
pub struct DeleteArgs {
    #[arg(long, help = "Bucket name")]
    pub bucket: String,

    #[arg(long, help = "Object key")]
    pub key: String,
}

impl CliConfig {
    pub fn api_url(&self) -> Result<&str> {
        validate_required_field("API_URL", &self.api_url).map(String::as_str)
    }

    pub fn api_key(&self) -> Result<&str> {
        validate_required_field("S3_PROXY_API_KEY", &self.api_key).map(String::as_str)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_url", self.api_url()?)?;
        validate_non_empty_string("api_key", self.api_key()?)?;

        match &self.command {
            CliCommand::List => {}
            CliCommand::Get(args) | CliCommand::Put(args) => {
                validate_non_empty_string("bucket", &args.bucket)?;
                validate_non_empty_string("key", &args.key)?;
                validate_path("file", args.file_path())?;
            }
            CliCommand::Delete(args) => {
                validate_non_empty_string("bucket", &args.bucket)?;
                validate_non_empty_string("key", &args.key)?;
            }
        }

        tracing::debug!("CLI configuration validation passed");
        Ok(())
    }
}
