//! HTTP response types.

use serde::de::DeserializeOwned;

/// A decoded JSON body together with its raw text.
#[derive(Debug, Clone)]
pub struct JsonBody<T> {
    /// Decoded value.
    pub value: T,
    /// Raw body, lossily decoded as UTF-8.
    pub raw: String,
}

/// Read the whole body and parse it as JSON.
pub async fn parse_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<JsonBody<T>, ResponseError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(ResponseError::Read)?;
    decode_json(status.as_u16(), &bytes)
}

/// Parse an already-read body as JSON.
pub fn decode_json<T: DeserializeOwned>(
    status: u16,
    bytes: &bytes::Bytes,
) -> Result<JsonBody<T>, ResponseError> {
    let raw = String::from_utf8_lossy(bytes).to_string();
    match serde_json::from_slice(bytes) {
        Ok(value) => Ok(JsonBody { value, raw }),
        Err(source) => Err(ResponseError::Parse {
            status,
            body: raw,
            source,
        }),
    }
}

/// Response parsing errors.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("failed to read response body: {0}")]
    Read(#[source] reqwest::Error),

    #[error("failed to parse JSON (status {status}): {source}")]
    Parse {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        allowed: bool,
    }

    #[test]
    fn test_decode_json_keeps_raw_body() {
        let body = Bytes::from_static(br#"{"allowed":true}"#);
        let decoded: JsonBody<Payload> = decode_json(200, &body).unwrap();
        assert_eq!(decoded.value, Payload { allowed: true });
        assert_eq!(decoded.raw, r#"{"allowed":true}"#);
    }

    #[test]
    fn test_decode_json_error_display() {
        let body = Bytes::from_static(b"<html>oops</html>");
        let error = decode_json::<Payload>(200, &body).unwrap_err();

        let message = error.to_string();
        assert!(message.contains("failed to parse JSON"));
        assert!(message.contains("status 200"));
        match error {
            ResponseError::Parse { body, .. } => assert_eq!(body, "<html>oops</html>"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
