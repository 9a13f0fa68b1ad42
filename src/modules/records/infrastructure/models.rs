/// Diesel models for the job_listings and resumes tables
use crate::modules::records::domain::entities::{JobListing, Record, RecordBody, Resume};
use crate::schema::{job_listings, resumes};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Diesel model for querying job listings
#[derive(Queryable, Selectable, QueryableByName, Debug, Clone)]
#[diesel(table_name = job_listings)]
pub struct JobListingModel {
    pub store_id: Uuid,
    pub id: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
    pub contract_type: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub salary: Option<f64>,
    pub skills: Vec<Option<String>>,
    pub embedding: Option<Vec<Option<f32>>>,
    pub created_at: DateTime<Utc>,
}

/// Diesel model for querying résumés
#[derive(Queryable, Selectable, QueryableByName, Debug, Clone)]
#[diesel(table_name = resumes)]
pub struct ResumeModel {
    pub store_id: Uuid,
    pub id: i32,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub education: Option<String>,
    pub experience: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<Option<String>>,
    pub languages: Vec<Option<String>>,
    pub certifications: Vec<Option<String>>,
    pub previous_companies: Vec<Option<String>>,
    pub embedding: Option<Vec<Option<f32>>>,
    pub created_at: DateTime<Utc>,
}

// Postgres arrays may hold NULL elements; they carry no text and are dropped
fn flatten_text(values: Vec<Option<String>>) -> Vec<String> {
    values.into_iter().flatten().collect()
}

fn flatten_vector(values: Option<Vec<Option<f32>>>) -> Option<Vec<f32>> {
    values.map(|v| v.into_iter().flatten().collect())
}

impl JobListingModel {
    /// Convert to domain Record
    pub fn to_record(self) -> Record {
        Record {
            store_id: self.store_id,
            id: self.id,
            body: RecordBody::Listing(JobListing {
                title: self.title,
                description: self.description,
                company: self.company,
                contract_type: self.contract_type,
                city: self.city,
                state: self.state,
                salary: self.salary,
                skills: flatten_text(self.skills),
            }),
            embedding: flatten_vector(self.embedding),
            created_at: Some(self.created_at),
        }
    }
}

impl ResumeModel {
    /// Convert to domain Record
    pub fn to_record(self) -> Record {
        Record {
            store_id: self.store_id,
            id: self.id,
            body: RecordBody::Resume(Resume {
                name: self.name,
                email: self.email,
                phone: self.phone,
                education: self.education,
                experience: self.experience,
                summary: self.summary,
                skills: flatten_text(self.skills),
                languages: flatten_text(self.languages),
                certifications: flatten_text(self.certifications),
                previous_companies: flatten_text(self.previous_companies),
            }),
            embedding: flatten_vector(self.embedding),
            created_at: Some(self.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_model_drops_null_array_elements() {
        let model = ResumeModel {
            store_id: Uuid::new_v4(),
            id: 4,
            name: Some("Ana".into()),
            email: None,
            phone: None,
            education: Some("BSc Computer Science".into()),
            experience: None,
            summary: None,
            skills: vec![Some("Python".into()), None, Some("MongoDB".into())],
            languages: vec![],
            certifications: vec![],
            previous_companies: vec![None],
            embedding: Some(vec![]),
            created_at: Utc::now(),
        };

        let record = model.to_record();
        assert_eq!(record.id, 4);
        assert!(record.is_pending());
        match record.body {
            RecordBody::Resume(resume) => {
                assert_eq!(resume.skills, vec!["Python".to_string(), "MongoDB".to_string()]);
                assert!(resume.previous_companies.is_empty());
            }
            other => panic!("expected a resume, got {:?}", other),
        }
    }
}
