//! Canonical text rendering of records for embedding
//!
//! `compose` is pure: the same record and field list always yield the same
//! string, so a record re-embedded later gets a comparable vector.

use crate::modules::records::domain::entities::{FieldValue, Record};

const FRAGMENT_SEPARATOR: &str = ". ";
const LIST_SEPARATOR: &str = ", ";

/// Render `record` as `"<Label>: <value>"` fragments joined by `". "`.
///
/// Fields the record does not have render as empty values.
pub fn compose<S: AsRef<str>>(record: &Record, fields: &[S]) -> String {
    fields
        .iter()
        .map(|field| {
            let field = field.as_ref();
            let value = match record.field(field).unwrap_or_else(FieldValue::empty) {
                FieldValue::Text(text) => text,
                FieldValue::List(items) => items.join(LIST_SEPARATOR),
            };
            format!("{}: {}", label(field), value)
        })
        .collect::<Vec<_>>()
        .join(FRAGMENT_SEPARATOR)
}

/// First character upper-cased, the rest lower-cased
fn label(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::records::domain::entities::{JobListing, RecordBody, Resume};
    use uuid::Uuid;

    fn listing() -> Record {
        Record {
            store_id: Uuid::new_v4(),
            id: 2,
            body: RecordBody::Listing(JobListing {
                title: Some("Data Engineer".into()),
                description: Some("Build pipelines".into()),
                company: Some("Acme".into()),
                contract_type: Some("CLT".into()),
                skills: vec!["Python".into(), "Spark".into()],
                ..Default::default()
            }),
            embedding: None,
            created_at: None,
        }
    }

    #[test]
    fn test_compose_listing() {
        let text = compose(
            &listing(),
            &["title", "description", "skills", "company", "contract_type"],
        );
        assert_eq!(
            text,
            "Title: Data Engineer. Description: Build pipelines. Skills: Python, Spark. \
             Company: Acme. Contract_type: CLT"
        );
    }

    #[test]
    fn test_compose_is_deterministic() {
        let record = listing();
        let fields = ["title", "skills"];
        assert_eq!(compose(&record, &fields), compose(&record, &fields));
    }

    #[test]
    fn test_missing_list_field_renders_empty() {
        let resume = Record {
            store_id: Uuid::new_v4(),
            id: 9,
            body: RecordBody::Resume(Resume {
                summary: Some("Backend developer".into()),
                ..Default::default()
            }),
            embedding: Some(vec![]),
            created_at: None,
        };
        assert_eq!(
            compose(&resume, &["summary", "skills"]),
            "Summary: Backend developer. Skills: "
        );
    }

    #[test]
    fn test_unknown_field_renders_empty() {
        assert_eq!(compose(&listing(), &["languages"]), "Languages: ");
    }

    #[test]
    fn test_label_lowercases_tail() {
        assert_eq!(label("TITLE"), "Title");
        assert_eq!(label("contract_type"), "Contract_type");
        assert_eq!(label(""), "");
    }

    #[test]
    fn test_no_fields_is_empty_string() {
        let fields: [&str; 0] = [];
        assert_eq!(compose(&listing(), &fields), "");
    }
}
