//! Response classification.
//!
//! Turns a raw [`HttpResponse`] into a [`ResponseBody`]: a closed set of body
//! shapes selected only by the response's `Content-Type` header. Decoding is
//! lenient. A malformed JSON or XML body becomes `None` inside its variant
//! instead of an error, and classification as a whole never fails.
//!
//! | media type                      | shape                       |
//! |---------------------------------|-----------------------------|
//! | *(header missing or empty)*     | [`ResponseBody::Status`]    |
//! | `application/json`              | [`ResponseBody::Json`]      |
//! | `application/xml`, `text/xml`   | [`ResponseBody::Xml`]       |
//! | `text/html`, `text/plain`       | [`ResponseBody::Text`]      |
//! | `application/octet-stream`      | [`ResponseBody::Bytes`]     |
//! | anything else                   | [`ResponseBody::Status`]    |

pub mod xml;

pub use xml::XmlDocument;

use crate::models::HttpResponse;
use base64::Engine as _;
use serde_json::Value;
use std::fmt;

/// Decoded form of a response body.
#[derive(Debug, PartialEq)]
pub enum ResponseBody {
    /// JSON document; `None` when the body did not parse.
    Json(Option<Value>),

    /// XML tree; `None` when the body did not parse.
    Xml(Option<XmlDocument>),

    /// Decoded text of an HTML or plain-text body.
    Text(String),

    /// Raw payload of an `application/octet-stream` body.
    Bytes(Vec<u8>),

    /// No usable body; the numeric status code stands in for it.
    Status(u16),
}

/// Which variant a [`ResponseBody`] is, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    Json,
    /// Valid JSON whose top level is an array or a scalar.
    JsonValue,
    /// JSON declared but not parseable.
    MalformedJson,
    Xml,
    /// XML declared but not parseable.
    MalformedXml,
    Text,
    Bytes,
    Status,
}

impl fmt::Display for BodyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BodyShape::Json => "JSON",
            BodyShape::JsonValue => "non-object JSON",
            BodyShape::MalformedJson => "JSON (no extractable structure)",
            BodyShape::Xml => "XML",
            BodyShape::MalformedXml => "XML (no extractable structure)",
            BodyShape::Text => "text",
            BodyShape::Bytes => "binary",
            BodyShape::Status => "status-code-only",
        };
        f.write_str(name)
    }
}

impl ResponseBody {
    /// Returns the shape of this body.
    pub fn shape(&self) -> BodyShape {
        match self {
            ResponseBody::Json(Some(Value::Object(_))) => BodyShape::Json,
            ResponseBody::Json(Some(_)) => BodyShape::JsonValue,
            ResponseBody::Json(None) => BodyShape::MalformedJson,
            ResponseBody::Xml(Some(_)) => BodyShape::Xml,
            ResponseBody::Xml(None) => BodyShape::MalformedXml,
            ResponseBody::Text(_) => BodyShape::Text,
            ResponseBody::Bytes(_) => BodyShape::Bytes,
            ResponseBody::Status(_) => BodyShape::Status,
        }
    }

    /// Converts the body into a value that can be kept in the variable store.
    ///
    /// JSON stays as-is, text and XML become strings, bytes become a base64
    /// string, and a status-only body becomes its number. Unparseable bodies
    /// become `null`.
    pub fn to_value(&self) -> Value {
        match self {
            ResponseBody::Json(json) => json.clone().unwrap_or(Value::Null),
            ResponseBody::Xml(Some(doc)) => Value::String(doc.source().to_string()),
            ResponseBody::Xml(None) => Value::Null,
            ResponseBody::Text(text) => Value::String(text.clone()),
            ResponseBody::Bytes(bytes) => {
                Value::String(base64::engine::general_purpose::STANDARD.encode(bytes))
            }
            ResponseBody::Status(code) => Value::from(*code),
        }
    }
}

/// Classifies a response by its `Content-Type` header.
///
/// # Examples
///
/// ```
/// use api_harness::models::HttpResponse;
/// use api_harness::response::{classify, ResponseBody};
/// use serde_json::json;
///
/// let mut response = HttpResponse::new(200, "OK".to_string());
/// response.add_header("Content-Type".to_string(), "application/json; charset=utf-8".to_string());
/// response.set_body(br#"{"id":1}"#.to_vec());
///
/// assert_eq!(classify(&response), ResponseBody::Json(Some(json!({"id": 1}))));
/// ```
pub fn classify(response: &HttpResponse) -> ResponseBody {
    classify_parts(response.content_type(), response.status_code, &response.body)
}

/// Classifies a response given its content-type header, status and body.
pub fn classify_parts(content_type: Option<&str>, status_code: u16, body: &[u8]) -> ResponseBody {
    let Some(header) = content_type.filter(|value| !value.trim().is_empty()) else {
        return ResponseBody::Status(status_code);
    };

    match media_type(header).as_str() {
        "application/json" => ResponseBody::Json(serde_json::from_slice(body).ok()),
        "application/xml" | "text/xml" => {
            ResponseBody::Xml(XmlDocument::parse(&String::from_utf8_lossy(body)))
        }
        "text/html" | "text/plain" => {
            ResponseBody::Text(String::from_utf8_lossy(body).into_owned())
        }
        "application/octet-stream" => ResponseBody::Bytes(body.to_vec()),
        _ => ResponseBody::Status(status_code),
    }
}

/// Normalizes a content-type header to its lowercase media type.
///
/// Parameters after the first `;` are dropped.
pub fn media_type(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response_with(content_type: Option<&str>, status: u16, body: &[u8]) -> HttpResponse {
        let mut response = HttpResponse::new(status, "Test".to_string());
        if let Some(ct) = content_type {
            response.add_header("Content-Type".to_string(), ct.to_string());
        }
        response.set_body(body.to_vec());
        response
    }

    #[test]
    fn test_media_type() {
        assert_eq!(media_type("application/json"), "application/json");
        assert_eq!(media_type("Application/JSON; charset=utf-8"), "application/json");
        assert_eq!(media_type("  text/plain ;q=1"), "text/plain");
        assert_eq!(media_type(""), "");
    }

    #[test]
    fn test_classify_json_with_parameters() {
        let response = response_with(Some("application/json; charset=utf-8"), 200, br#"{"id":1}"#);
        assert_eq!(classify(&response), ResponseBody::Json(Some(json!({"id": 1}))));
    }

    #[test]
    fn test_classify_malformed_json_is_null() {
        let response = response_with(Some("application/json"), 200, b"{bad");
        let body = classify(&response);
        assert_eq!(body, ResponseBody::Json(None));
        assert_eq!(body.shape(), BodyShape::MalformedJson);
    }

    #[test]
    fn test_classify_empty_json_body_is_null() {
        let response = response_with(Some("application/json"), 204, b"");
        assert_eq!(classify(&response), ResponseBody::Json(None));
    }

    #[test]
    fn test_classify_missing_header_uses_status() {
        let response = response_with(None, 404, b"not found");
        assert_eq!(classify(&response), ResponseBody::Status(404));
    }

    #[test]
    fn test_classify_empty_header_uses_status() {
        let response = response_with(Some(""), 500, b"{}");
        assert_eq!(classify(&response), ResponseBody::Status(500));
    }

    #[test]
    fn test_classify_xml() {
        for ct in ["application/xml", "text/xml; charset=utf-8", "TEXT/XML"] {
            let response = response_with(Some(ct), 200, b"<user><id>7</id></user>");
            match classify(&response) {
                ResponseBody::Xml(Some(doc)) => assert_eq!(doc.root_name().as_deref(), Some("user")),
                other => panic!("expected XML tree for {}, got {:?}", ct, other),
            }
        }
    }

    #[test]
    fn test_classify_malformed_xml_is_null() {
        let response = response_with(Some("text/xml"), 200, b"<user><id>7</user>");
        assert_eq!(classify(&response), ResponseBody::Xml(None));
    }

    #[test]
    fn test_classify_text() {
        let response = response_with(Some("text/plain"), 200, b"order-42-confirmed");
        assert_eq!(classify(&response), ResponseBody::Text("order-42-confirmed".to_string()));

        let response = response_with(Some("text/html; charset=UTF-8"), 200, b"<p>hi</p>");
        assert_eq!(classify(&response), ResponseBody::Text("<p>hi</p>".to_string()));
    }

    #[test]
    fn test_classify_text_is_not_parsed() {
        let response = response_with(Some("text/plain"), 200, br#"{"id": 1}"#);
        assert_eq!(classify(&response), ResponseBody::Text(r#"{"id": 1}"#.to_string()));
    }

    #[test]
    fn test_classify_octet_stream() {
        let payload = vec![0x00, 0xFF, 0x10];
        let response = response_with(Some("application/octet-stream"), 200, &payload);
        assert_eq!(classify(&response), ResponseBody::Bytes(payload));
    }

    #[test]
    fn test_classify_unknown_media_type_uses_status() {
        for ct in ["image/png", "application/vnd.api+json", "text/csv"] {
            let response = response_with(Some(ct), 201, b"data");
            assert_eq!(classify(&response), ResponseBody::Status(201), "{}", ct);
        }
    }

    #[test]
    fn test_to_value() {
        assert_eq!(ResponseBody::Json(Some(json!({"a": 1}))).to_value(), json!({"a": 1}));
        assert_eq!(ResponseBody::Json(None).to_value(), Value::Null);
        assert_eq!(ResponseBody::Text("hi".to_string()).to_value(), json!("hi"));
        assert_eq!(ResponseBody::Bytes(b"hi".to_vec()).to_value(), json!("aGk="));
        assert_eq!(ResponseBody::Status(404).to_value(), json!(404));
    }

    #[test]
    fn test_shape_display() {
        assert_eq!(BodyShape::Status.to_string(), "status-code-only");
        assert_eq!(
            BodyShape::MalformedJson.to_string(),
            "JSON (no extractable structure)"
        );
    }
}
