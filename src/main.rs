use clap::Parser;
use s3_gateway::utils::{logger, validation::Validate};
use s3_gateway::{CliCommand, CliConfig, GatewayClient, GatewayError};

async fn run(config: &CliConfig) -> Result<(), GatewayError> {
    let client = GatewayClient::new(config.api_url()?, config.api_key()?)?;

    match &config.command {
        CliCommand::List => {
            let buckets = client.list_buckets().await?;
            println!("{}", buckets);
        }
        CliCommand::Get(args) => {
            let bytes = client
                .download_to(&args.bucket, &args.key, args.file_path(), args.presigned)
                .await?;
            tracing::info!("Wrote {} bytes to {}", bytes, args.file_path());
            println!("File downloaded successfully");
        }
        CliCommand::Put(args) => {
            let bytes = client
                .upload_from(&args.bucket, &args.key, args.file_path(), args.presigned)
                .await?;
            tracing::info!("Uploaded {} bytes from {}", bytes, args.file_path());
            println!("File uploaded successfully");
        }
        CliCommand::Delete(args) => {
            client.delete_object(&args.bucket, &args.key).await?;
            println!("Object deleted successfully");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config.command);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(2);
    }

    if let Err(e) = run(&config).await {
        tracing::error!("Request failed: {} (Category: {:?})", e, e.category());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
}
