//! Account documents.

use std::path::Path;

use crate::domain::users::records::DocumentRecord;

/// Documents an account must hold before it becomes active.
pub const REQUIRED_DOCUMENTS: [&str; 3] = ["identification", "proof_of_address", "account_statement"];

/// Name a document after its uploaded file, dropping the final extension.
#[must_use]
pub fn document_name(filename: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(filename);

    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => base.to_string(),
    }
}

#[must_use]
pub fn has_required_documents(documents: &[DocumentRecord]) -> bool {
    REQUIRED_DOCUMENTS
        .iter()
        .all(|required| documents.iter().any(|document| document.name == *required))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(name: &str) -> DocumentRecord {
        DocumentRecord {
            name: name.to_string(),
            reference: format!("/uploads/{name}.pdf"),
        }
    }

    #[test]
    fn document_name_strips_only_the_last_extension() {
        assert_eq!(document_name("identification.pdf"), "identification");
        assert_eq!(document_name("proof_of_address.scan.png"), "proof_of_address.scan");
        assert_eq!(document_name("account_statement"), "account_statement");
        assert_eq!(document_name("uploads/identification.jpg"), "identification");
        assert_eq!(document_name(".profile"), ".profile");
    }

    #[test]
    fn all_three_documents_are_required() {
        let mut documents = vec![document("identification"), document("proof_of_address")];

        assert!(!has_required_documents(&documents));

        documents.push(document("account_statement"));

        assert!(has_required_documents(&documents));
        assert!(!has_required_documents(&[]));
    }
}
