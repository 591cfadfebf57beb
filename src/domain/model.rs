use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;

/// Lifetime of every delegated URL the gateway issues.
pub const DELEGATED_URL_EXPIRY: Duration = Duration::from_secs(3600);

/// Invocation payload as it arrives from the host.
///
/// Fields are read leniently so that any JSON event decodes: `operation` is
/// kept as a raw value and answered with a 400 when it is not one of the four
/// operation names, scalar `bucket`/`key`/`body` values are taken as text, and
/// `presigned` follows JSON truthiness (`"true"`, `1` and `true` all count).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub operation: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub bucket: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub presigned: bool,
}

fn deserialize_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

fn deserialize_truthy<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.is_some_and(|value| is_truthy(&value)))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Put,
    Delete,
}

impl FromStr for Operation {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "list" => Ok(Self::List),
            "get" => Ok(Self::Get),
            "put" => Ok(Self::Put),
            "delete" => Ok(Self::Delete),
            _ => Err(()),
        }
    }
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Put => "put",
            Self::Delete => "delete",
        }
    }
}

/// Whether bytes move through the gateway or the caller gets a signed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Direct,
    Delegated,
}

impl From<bool> for AccessMode {
    fn from(presigned: bool) -> Self {
        if presigned {
            Self::Delegated
        } else {
            Self::Direct
        }
    }
}

/// The storage action a delegated URL authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMethod {
    Get,
    Put,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    pub bucket: String,
    pub key: String,
}

impl ObjectHandle {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketDescriptor {
    pub name: String,
    pub creation_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignedUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Buckets(Vec<BucketDescriptor>),
    /// Decoded object content, returned verbatim rather than JSON-encoded.
    Text(String),
    Url(PresignedUrl),
    Message(String),
}

impl ResponseBody {
    /// Body as written into the host response: object text as-is, everything
    /// else JSON-encoded.
    pub fn encode(&self) -> serde_json::Result<String> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            other => serde_json::to_string(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(serialize_with = "serialize_encoded_body")]
    pub body: ResponseBody,
}

fn serialize_encoded_body<S: Serializer>(body: &ResponseBody, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    let encoded = body.encode().map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&encoded)
}

impl Response {
    pub fn ok(body: ResponseBody) -> Self {
        Self {
            status_code: 200,
            body,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status_code: 400,
            body: ResponseBody::Message(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_parsing_is_exact() {
        assert_eq!("list".parse::<Operation>(), Ok(Operation::List));
        assert_eq!("delete".parse::<Operation>(), Ok(Operation::Delete));
        assert!("LIST".parse::<Operation>().is_err());
        assert!("copy".parse::<Operation>().is_err());
        assert!("".parse::<Operation>().is_err());
    }

    #[test]
    fn test_request_defaults() {
        let request: Request = serde_json::from_str(r#"{"operation": "get", "bucket": "b", "key": "k"}"#).unwrap();
        assert!(!request.presigned);
        assert!(request.body.is_none());

        let empty: Request = serde_json::from_str("{}").unwrap();
        assert!(empty.operation.is_none());
    }

    #[test]
    fn test_request_accepts_loosely_typed_fields() {
        let request: Request = serde_json::from_str(
            r#"{"operation": 42, "bucket": null, "key": 7, "body": {"a": 1}, "presigned": null}"#,
        )
        .unwrap();
        assert_eq!(request.operation, Some(Value::from(42)));
        assert!(request.bucket.is_none());
        assert_eq!(request.key.as_deref(), Some("7"));
        assert_eq!(request.body.as_deref(), Some(r#"{"a":1}"#));
        assert!(!request.presigned);
    }

    #[test]
    fn test_presigned_truthiness() {
        let presigned = |raw: &str| -> bool {
            let event = format!(r#"{{"operation": "get", "presigned": {}}}"#, raw);
            serde_json::from_str::<Request>(&event).unwrap().presigned
        };
        assert!(presigned("true"));
        assert!(presigned(r#""true""#));
        assert!(presigned("1"));
        assert!(!presigned("false"));
        assert!(!presigned("null"));
        assert!(!presigned("0"));
        assert!(!presigned(r#""""#));
    }

    #[test]
    fn test_response_wire_format() {
        let created = serde_json::to_value(Response::ok(ResponseBody::Message("Object created".into()))).unwrap();
        assert_eq!(created, serde_json::json!({"statusCode": 200, "body": "\"Object created\""}));

        let url = Response::ok(ResponseBody::Url(PresignedUrl {
            url: "https://bucket.s3.amazonaws.com/key?X-Amz-Expires=3600".into(),
        }));
        let wire = serde_json::to_value(url).unwrap();
        let inner: PresignedUrl = serde_json::from_str(wire["body"].as_str().unwrap()).unwrap();
        assert!(inner.url.contains("X-Amz-Expires=3600"));
    }

    #[test]
    fn test_object_text_is_not_json_encoded() {
        let body = ResponseBody::Text("hello \"world\"".into());
        assert_eq!(body.encode().unwrap(), "hello \"world\"");
    }

    #[test]
    fn test_bucket_descriptor_uses_storage_field_names() {
        let bucket = BucketDescriptor {
            name: "photos".into(),
            creation_date: Some("2024-01-01T00:00:00Z".into()),
        };
        let value = serde_json::to_value(&bucket).unwrap();
        assert_eq!(value["Name"], "photos");
        assert_eq!(value["CreationDate"], "2024-01-01T00:00:00Z");
    }
}
