use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::document::date;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Description {
    #[serde(alias = "participantInn", deserialize_with = "lenient_string")]
    pub participant_inn: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocType {
    #[serde(rename = "LP_INTRODUCE_GOODS")]
    LpIntroduceGoods,
}

impl DocType {
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "LP_INTRODUCE_GOODS" => Some(DocType::LpIntroduceGoods),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    #[serde(deserialize_with = "lenient_string")]
    pub certificate_document: Option<String>,
    #[serde(with = "date::optional")]
    pub certificate_document_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_string")]
    pub certificate_document_number: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub owner_inn: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub producer_inn: Option<String>,
    #[serde(with = "date::optional")]
    pub production_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_string")]
    pub tnved_code: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub uit_code: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub uitu_code: Option<String>,
}

/// Goods-introduction declaration as received from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub description: Option<Description>,
    #[serde(deserialize_with = "lenient_string")]
    pub doc_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub doc_status: Option<String>,
    #[serde(deserialize_with = "lenient_doc_type")]
    pub doc_type: Option<DocType>,
    #[serde(alias = "importRequest", deserialize_with = "lenient_bool")]
    pub import_request: Option<bool>,
    #[serde(deserialize_with = "lenient_string")]
    pub owner_inn: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub participant_inn: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub producer_inn: Option<String>,
    #[serde(with = "date::optional")]
    pub production_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_string")]
    pub production_type: Option<String>,
    pub products: Vec<Product>,
    #[serde(with = "date::optional")]
    pub reg_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_string")]
    pub reg_number: Option<String>,
}

/// A [`Document`] with its signature attached. Document fields are flattened
/// on the wire, followed by `signature` and `signature_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedDocument {
    #[serde(flatten)]
    pub document: Document,
    pub signature: String,
    #[serde(with = "date::required")]
    pub signature_date: NaiveDate,
}

// Unrecognised document types are dropped to `None` instead of failing the whole document.
fn lenient_doc_type<'de, D>(deserializer: D) -> Result<Option<DocType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let parsed = DocType::from_wire(&value);
        if parsed.is_none() {
            warn!("Unknown doc_type `{}`, treating as absent", value);
        }
        parsed
    }))
}

// Scalars are accepted as text: `123` and `true` read as "123" and "true".
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "invalid type: expected a scalar, got {}",
            other
        ))),
    }
}

// A string reads as `true` only when it spells "true", ignoring case.
fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::String(s)) => Ok(Some(s.trim().eq_ignore_ascii_case("true"))),
        Some(other) => Err(D::Error::custom(format!(
            "invalid type: expected a boolean, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let doc = Document::default();
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["doc_id"], json!(null));
        assert_eq!(value["reg_date"], json!(null));
        assert_eq!(value["products"], json!([]));
    }

    #[test]
    fn test_signed_document_is_flat() {
        let signed = SignedDocument {
            document: Document {
                doc_id: Some("123".into()),
                doc_type: Some(DocType::LpIntroduceGoods),
                ..Document::default()
            },
            signature: "sig".into(),
            signature_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        };

        let value = serde_json::to_value(&signed).unwrap();
        assert_eq!(value["doc_id"], "123");
        assert_eq!(value["doc_type"], "LP_INTRODUCE_GOODS");
        assert_eq!(value["signature"], "sig");
        assert_eq!(value["signature_date"], "2024-01-31");
        assert!(value.get("document").is_none());
    }

    #[test]
    fn test_camel_case_import_request_accepted() {
        let doc: Document = serde_json::from_value(json!({ "importRequest": true })).unwrap();
        assert_eq!(doc.import_request, Some(true));
    }

    #[test]
    fn test_scalars_read_as_text() {
        let doc: Document = serde_json::from_value(json!({
            "doc_id": 123,
            "reg_number": true,
            "description": { "participant_inn": 7700000000u64 },
            "products": [{ "tnved_code": 6401100000u64, "uit_code": 1.5 }]
        }))
        .unwrap();

        assert_eq!(doc.doc_id.as_deref(), Some("123"));
        assert_eq!(doc.reg_number.as_deref(), Some("true"));
        assert_eq!(
            doc.description.and_then(|d| d.participant_inn).as_deref(),
            Some("7700000000")
        );
        assert_eq!(doc.products[0].tnved_code.as_deref(), Some("6401100000"));
        assert_eq!(doc.products[0].uit_code.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_import_request_accepts_strings() {
        let doc: Document = serde_json::from_value(json!({ "importRequest": "true" })).unwrap();
        assert_eq!(doc.import_request, Some(true));

        let doc: Document = serde_json::from_value(json!({ "import_request": "FALSE" })).unwrap();
        assert_eq!(doc.import_request, Some(false));

        assert!(serde_json::from_value::<Document>(json!({ "import_request": 1 })).is_err());
    }

    #[test]
    fn test_structured_values_in_scalar_fields_rejected() {
        assert!(serde_json::from_value::<Document>(json!({ "doc_id": {"a": 1} })).is_err());
        assert!(serde_json::from_value::<Document>(json!({ "owner_inn": ["1"] })).is_err());
        assert!(serde_json::from_value::<Product>(json!({ "uit_code": {} })).is_err());
    }

    #[test]
    fn test_unknown_doc_type_is_absent() {
        let doc: Document = serde_json::from_value(json!({ "doc_type": "LP_SOMETHING_ELSE" })).unwrap();
        assert_eq!(doc.doc_type, None);
    }
}
