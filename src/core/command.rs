use crate::domain::model::{AccessMode, ObjectHandle, Operation, Request};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Get {
        handle: ObjectHandle,
        mode: AccessMode,
    },
    Put {
        handle: ObjectHandle,
        payload: Vec<u8>,
        mode: AccessMode,
    },
    Delete {
        handle: ObjectHandle,
    },
}

impl Command {
    /// Returns `None` when the operation is absent, not a string, or unrecognized.
    ///
    /// Missing `bucket`/`key` are not rejected here; they become empty strings
    /// and the storage layer reports whatever it reports for them.
    pub fn parse(request: &Request) -> Option<Self> {
        let operation: Operation = request.operation.as_ref()?.as_str()?.parse().ok()?;
        let mode = AccessMode::from(request.presigned);
        let handle = || {
            ObjectHandle::new(
                request.bucket.clone().unwrap_or_default(),
                request.key.clone().unwrap_or_default(),
            )
        };

        let command = match operation {
            Operation::List => Self::List,
            Operation::Get => Self::Get {
                handle: handle(),
                mode,
            },
            Operation::Put => Self::Put {
                handle: handle(),
                payload: request.body.clone().map(String::into_bytes).unwrap_or_default(),
                mode,
            },
            Operation::Delete => Self::Delete { handle: handle() },
        };
        Some(command)
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::List => Operation::List,
            Self::Get { .. } => Operation::Get,
            Self::Put { .. } => Operation::Put,
            Self::Delete { .. } => Operation::Delete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(operation: &str) -> Request {
        Request {
            operation: Some(operation.into()),
            bucket: Some("bucket".to_string()),
            key: Some("key.txt".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_list_ignores_other_fields() {
        let mut req = request("list");
        req.presigned = true;
        req.body = Some("ignored".to_string());
        assert_eq!(Command::parse(&req), Some(Command::List));
    }

    #[test]
    fn test_presigned_selects_delegated_mode() {
        let mut req = request("get");
        req.presigned = true;
        assert_eq!(
            Command::parse(&req),
            Some(Command::Get {
                handle: ObjectHandle::new("bucket", "key.txt"),
                mode: AccessMode::Delegated,
            })
        );
    }

    #[test]
    fn test_put_without_body_writes_empty_payload() {
        match Command::parse(&request("put")) {
            Some(Command::Put { payload, mode, .. }) => {
                assert!(payload.is_empty());
                assert_eq!(mode, AccessMode::Direct);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_missing_bucket_and_key_are_passed_through_empty() {
        let req = Request {
            operation: Some("delete".into()),
            ..Default::default()
        };
        assert_eq!(
            Command::parse(&req),
            Some(Command::Delete {
                handle: ObjectHandle::new("", ""),
            })
        );
    }

    #[test]
    fn test_unknown_or_absent_operation() {
        assert_eq!(Command::parse(&request("copy")), None);
        assert_eq!(Command::parse(&Request::default()), None);

        let numeric = Request {
            operation: Some(serde_json::json!(42)),
            ..request("list")
        };
        assert_eq!(Command::parse(&numeric), None);
    }
}
