#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_s3::config::Region;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use s3_gateway::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use s3_gateway::{Dispatcher, LambdaConfig, Request, Response, S3StorageClient};

#[cfg(feature = "lambda")]
async fn build_s3_client(lambda_config: &LambdaConfig) -> S3Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &lambda_config.s3_region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint) = &lambda_config.s3_endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }
    let config = loader.load().await;

    let config = aws_sdk_s3::config::Builder::from(&config)
        .force_path_style(lambda_config.force_path_style)
        .build();
    S3Client::from_conf(config)
}

#[cfg(feature = "lambda")]
async fn function_handler(
    dispatcher: &Dispatcher<S3StorageClient>,
    event: LambdaEvent<Request>,
) -> Result<Response, Error> {
    let request_id = event.context.request_id.clone();
    match dispatcher.dispatch(event.payload).await {
        Ok(response) => {
            tracing::info!(request_id = %request_id, status = response.status_code, "Request completed");
            Ok(response)
        }
        Err(e) => {
            // Storage faults are reported to the runtime as function errors.
            tracing::error!(request_id = %request_id, category = ?e.category(), "Request failed: {}", e);
            Err(Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
        }
    }
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let lambda_config = LambdaConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    lambda_config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    // Built once per execution environment and shared by every invocation.
    let s3_client = build_s3_client(&lambda_config).await;
    let dispatcher = Dispatcher::new(S3StorageClient::new(s3_client));
    tracing::info!(?lambda_config, "S3 gateway initialised");

    run(service_fn(move |event: LambdaEvent<Request>| {
        let dispatcher = dispatcher.clone();
        async move { function_handler(&dispatcher, event).await }
    }))
    .await
}
