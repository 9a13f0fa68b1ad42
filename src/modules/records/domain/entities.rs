/// Domain entities for job board records
///
/// A record is one job listing or one résumé. Only the fields the embedding
/// backfill reads are modelled; everything is optional because records are
/// created by forms that did not always validate their input.
use super::collection::Collection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A job listing posted by an employer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub title: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
    pub contract_type: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub salary: Option<f64>,
    pub skills: Vec<String>,
}

/// A candidate's résumé
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub education: Option<String>,
    pub experience: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub certifications: Vec<String>,
    pub previous_companies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordBody {
    Listing(JobListing),
    Resume(Resume),
}

/// Value of a named record field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    fn text(value: &Option<String>) -> Self {
        FieldValue::Text(value.clone().unwrap_or_default())
    }

    fn list(values: &[String]) -> Self {
        FieldValue::List(values.to_vec())
    }

    pub fn empty() -> Self {
        FieldValue::Text(String::new())
    }
}

/// A stored listing or résumé
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned primary key, used for write-back
    pub store_id: Uuid,
    /// Public sequential identifier shown to users
    pub id: i32,
    pub body: RecordBody,
    pub embedding: Option<Vec<f32>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record {
    pub fn collection(&self) -> Collection {
        match self.body {
            RecordBody::Listing(_) => Collection::Listings,
            RecordBody::Resume(_) => Collection::Resumes,
        }
    }

    /// Whether the record still needs an embedding
    pub fn is_pending(&self) -> bool {
        self.embedding.as_ref().map_or(true, |v| v.is_empty())
    }

    /// Title for listings, name for résumés
    pub fn label(&self) -> &str {
        let label = match &self.body {
            RecordBody::Listing(listing) => listing.title.as_deref(),
            RecordBody::Resume(resume) => resume.name.as_deref(),
        };
        label.filter(|s| !s.is_empty()).unwrap_or("Untitled")
    }

    /// Look up a field by name. Unknown names resolve to `None`.
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        match &self.body {
            RecordBody::Listing(l) => match name {
                "title" => Some(FieldValue::text(&l.title)),
                "description" => Some(FieldValue::text(&l.description)),
                "company" => Some(FieldValue::text(&l.company)),
                "contract_type" => Some(FieldValue::text(&l.contract_type)),
                "city" => Some(FieldValue::text(&l.city)),
                "state" => Some(FieldValue::text(&l.state)),
                "salary" => Some(FieldValue::Text(
                    l.salary.map(|s| format!("{:.2}", s)).unwrap_or_default(),
                )),
                "skills" => Some(FieldValue::list(&l.skills)),
                _ => None,
            },
            RecordBody::Resume(r) => match name {
                "name" => Some(FieldValue::text(&r.name)),
                "email" => Some(FieldValue::text(&r.email)),
                "phone" => Some(FieldValue::text(&r.phone)),
                "education" => Some(FieldValue::text(&r.education)),
                "experience" => Some(FieldValue::text(&r.experience)),
                "summary" => Some(FieldValue::text(&r.summary)),
                "skills" => Some(FieldValue::list(&r.skills)),
                "languages" => Some(FieldValue::list(&r.languages)),
                "certifications" => Some(FieldValue::list(&r.certifications)),
                "previous_companies" => Some(FieldValue::list(&r.previous_companies)),
                _ => None,
            },
        }
    }
}
