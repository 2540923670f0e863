use chrono::NaiveDate;
use tracing::debug;

use crate::document::model::{Document, SignedDocument};
use crate::error::{AppError, Result};
use crate::utils::time::today;

/// Produces the signature for a document. The algorithm behind it is opaque to
/// the rest of the service.
pub trait Signer: Send + Sync {
    fn sign(&self, document: &Document) -> Result<String>;
}

/// Hands out one preconfigured signature for every document.
#[derive(Debug, Clone)]
pub struct StaticSigner {
    signature: String,
}

impl StaticSigner {
    pub fn new(signature: impl Into<String>) -> Result<Self> {
        let signature = signature.into();
        if signature.trim().is_empty() {
            return Err(AppError::Init("Signature must not be empty".into()));
        }
        Ok(Self { signature })
    }
}

impl Signer for StaticSigner {
    fn sign(&self, _document: &Document) -> Result<String> {
        Ok(self.signature.clone())
    }
}

/// Attaches `signature` to `document`, stamped with today's date.
pub fn sign(document: Option<Document>, signature: Option<String>) -> Result<SignedDocument> {
    sign_at(document, signature, today())
}

pub fn sign_at(
    document: Option<Document>,
    signature: Option<String>,
    signature_date: NaiveDate,
) -> Result<SignedDocument> {
    let document = document
        .ok_or_else(|| AppError::Validation("document is required".into()))?;
    let signature = signature
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::Validation("signature is required".into()))?;

    debug!("Signing document {:?} on {}", document.doc_id, signature_date);
    Ok(SignedDocument {
        document,
        signature,
        signature_date,
    })
}
