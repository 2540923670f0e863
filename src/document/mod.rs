pub mod date;
pub mod model;
pub mod parser;
pub mod signing;

pub use model::{Description, DocType, Document, Product, SignedDocument};
pub use parser::parse;
pub use signing::{sign, sign_at, Signer, StaticSigner};

use crate::error::Result;

/// Full transformation for one request: parse the raw body, obtain a
/// signature for it, and attach that signature.
pub fn process(raw: &str, signer: &dyn Signer) -> Result<SignedDocument> {
    let document = parse(raw)?;
    let signature = signer.sign(&document)?;
    sign(Some(document), Some(signature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::utils::time::today;

    struct RefusingSigner;

    impl Signer for RefusingSigner {
        fn sign(&self, _document: &Document) -> Result<String> {
            Err(AppError::Validation("signing key unavailable".into()))
        }
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let doc = Document {
            description: Some(Description { participant_inn: Some("7700000000".into()) }),
            doc_id: Some("doc-7".into()),
            doc_status: Some("NEW".into()),
            doc_type: Some(DocType::LpIntroduceGoods),
            import_request: Some(false),
            owner_inn: Some("1".into()),
            participant_inn: Some("2".into()),
            producer_inn: Some("3".into()),
            production_date: chrono::NaiveDate::from_ymd_opt(2023, 12, 31),
            production_type: Some("OWN".into()),
            products: vec![Product {
                certificate_document: Some("CERT".into()),
                certificate_document_date: chrono::NaiveDate::from_ymd_opt(2023, 2, 28),
                uit_code: Some("UIT".into()),
                ..Product::default()
            }],
            reg_date: None,
            reg_number: Some("R-9".into()),
        };

        let raw = serde_json::to_string(&doc).unwrap();
        let signer = StaticSigner::new("sig").unwrap();
        let signed = process(&raw, &signer).unwrap();

        assert_eq!(signed.document, doc);
        assert_eq!(signed.signature, "sig");
        assert!(signed.signature_date >= today() - chrono::Duration::days(1));
    }

    #[test]
    fn test_signer_failure_propagates() {
        let err = process(r#"{"products":[]}"#, &RefusingSigner).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
