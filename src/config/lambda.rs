use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::{validate_aws_region, validate_url, Validate};
use std::env;

/// Settings for building the S3 client at cold start. Credentials always come
/// from the default AWS provider chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LambdaConfig {
    pub s3_region: Option<String>,
    pub s3_endpoint_url: Option<String>,
    pub force_path_style: bool,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let force_path_style = match non_empty("S3_FORCE_PATH_STYLE") {
            None => false,
            Some(value) => value.parse::<bool>().map_err(|_| GatewayError::InvalidConfigValueError {
                field: "S3_FORCE_PATH_STYLE".to_string(),
                value: value.clone(),
                reason: "expected true or false".to_string(),
            })?,
        };

        Ok(Self {
            s3_region: non_empty("S3_REGION"),
            s3_endpoint_url: non_empty("S3_ENDPOINT_URL"),
            force_path_style,
        })
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        if let Some(region) = &self.s3_region {
            validate_aws_region("s3_region", region)?;
        }
        if let Some(endpoint) = &self.s3_endpoint_url {
            validate_url("s3_endpoint_url", endpoint)?;
        }

        tracing::debug!("Lambda configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = LambdaConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, LambdaConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reads_endpoint_and_path_style() {
        let config = LambdaConfig::from_lookup(lookup(&[
            ("S3_REGION", "ap-southeast-2"),
            ("S3_ENDPOINT_URL", "http://minio:9000"),
            ("S3_FORCE_PATH_STYLE", "true"),
        ]))
        .unwrap();

        assert_eq!(config.s3_region.as_deref(), Some("ap-southeast-2"));
        assert_eq!(config.s3_endpoint_url.as_deref(), Some("http://minio:9000"));
        assert!(config.force_path_style);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(LambdaConfig::from_lookup(lookup(&[("S3_FORCE_PATH_STYLE", "yes")])).is_err());

        let config = LambdaConfig::from_lookup(lookup(&[("S3_ENDPOINT_URL", "minio:9000")])).unwrap();
        assert!(config.validate().is_err());
    }
}
