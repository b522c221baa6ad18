//! The normalized result of a successful invocation.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::http::{Headers, HttpResponse};

/// Successful response: status, lower-cased headers, parsed body and the
/// response the transport returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub status: u16,
    pub status_text: String,
    pub headers: Headers,
    /// Parsed JSON for `application/json` responses, otherwise the body text
    /// as `Value::String`.
    pub data: Value,
    pub response: HttpResponse,
}

impl Envelope {
    /// Deserialize `data` into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }

    pub fn into_data(self) -> Value {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Greeting {
        hello: String,
    }

    fn envelope(data: Value) -> Envelope {
        Envelope {
            status: 200,
            status_text: "OK".to_string(),
            headers: Headers::new(),
            data,
            response: HttpResponse {
                status: 200,
                status_text: "OK".to_string(),
                headers: Headers::new(),
                body: String::new(),
            },
        }
    }

    #[test]
    fn json_deserializes_data() {
        let greeting: Greeting = envelope(json!({ "hello": "world" })).json().unwrap();
        assert_eq!(greeting, Greeting { hello: "world".to_string() });
    }

    #[test]
    fn json_reports_shape_mismatch() {
        assert!(envelope(json!("plain text")).json::<Greeting>().is_err());
    }
}
