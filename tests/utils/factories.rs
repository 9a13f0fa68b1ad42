/// Test data factories using builder pattern
///
/// Provides convenient methods to create records with sensible defaults
use jobboard::modules::records::{JobListing, Record, RecordBody, Resume};
use uuid::Uuid;

pub const DIMENSIONS: usize = 768;

/// A vector of the production dimensionality
pub fn vector(value: f32) -> Vec<f32> {
    vec![value; DIMENSIONS]
}

pub struct ListingFactory {
    id: i32,
    listing: JobListing,
    embedding: Option<Vec<f32>>,
}

impl ListingFactory {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            listing: JobListing {
                title: Some(format!("Backend developer {}", id)),
                description: Some("Build and run APIs".to_string()),
                company: Some("Acme".to_string()),
                contract_type: Some("Full-time".to_string()),
                skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
                ..Default::default()
            },
            embedding: None,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.listing.title = Some(title.to_string());
        self
    }

    pub fn no_skills(mut self) -> Self {
        self.listing.skills.clear();
        self
    }

    pub fn embedded(mut self) -> Self {
        self.embedding = Some(vector(0.1));
        self
    }

    pub fn empty_embedding(mut self) -> Self {
        self.embedding = Some(Vec::new());
        self
    }

    pub fn build(self) -> Record {
        Record {
            store_id: Uuid::new_v4(),
            id: self.id,
            body: RecordBody::Listing(self.listing),
            embedding: self.embedding,
            created_at: None,
        }
    }
}

pub struct ResumeFactory {
    id: i32,
    resume: Resume,
    embedding: Option<Vec<f32>>,
}

impl ResumeFactory {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            resume: Resume {
                name: Some(format!("Candidate {}", id)),
                education: Some("BSc Computer Science".to_string()),
                experience: Some("5 years".to_string()),
                summary: Some("Backend engineer".to_string()),
                skills: vec!["Rust".to_string()],
                languages: vec!["English".to_string(), "Portuguese".to_string()],
                ..Default::default()
            },
            embedding: None,
        }
    }

    pub fn no_skills(mut self) -> Self {
        self.resume.skills.clear();
        self
    }

    pub fn embedded(mut self) -> Self {
        self.embedding = Some(vector(0.2));
        self
    }

    pub fn build(self) -> Record {
        Record {
            store_id: Uuid::new_v4(),
            id: self.id,
            body: RecordBody::Resume(self.resume),
            embedding: self.embedding,
            created_at: None,
        }
    }
}
