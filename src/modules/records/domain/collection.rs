use serde::{Deserialize, Serialize};

/// The two record collections the job board stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Listings,
    Resumes,
}

impl Collection {
    /// Processing order for a backfill run
    pub const ALL: [Collection; 2] = [Collection::Listings, Collection::Resumes];

    /// Backing table name
    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Listings => "job_listings",
            Collection::Resumes => "resumes",
        }
    }

    /// Operator-facing name used in progress lines
    pub fn display_name(&self) -> &'static str {
        match self {
            Collection::Listings => "LISTINGS",
            Collection::Resumes => "RESUMES",
        }
    }

    /// Fields composed into embedding text unless configured otherwise
    pub fn default_embedding_fields(&self) -> &'static [&'static str] {
        match self {
            Collection::Listings => &["title", "description", "skills", "company", "contract_type"],
            Collection::Resumes => &["education", "experience", "summary", "skills", "languages"],
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Collection::Listings => write!(f, "listings"),
            Collection::Resumes => write!(f, "resumes"),
        }
    }
}

impl std::str::FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "listings" | "job_listings" => Ok(Collection::Listings),
            "resumes" => Ok(Collection::Resumes),
            _ => Err(format!("Invalid collection: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listings_run_before_resumes() {
        assert_eq!(Collection::ALL, [Collection::Listings, Collection::Resumes]);
    }

    #[test]
    fn test_collection_from_str() {
        assert_eq!("LISTINGS".parse::<Collection>().unwrap(), Collection::Listings);
        assert_eq!("job_listings".parse::<Collection>().unwrap(), Collection::Listings);
        assert_eq!("resumes".parse::<Collection>().unwrap(), Collection::Resumes);
        assert!("users".parse::<Collection>().is_err());
    }

    #[test]
    fn test_collection_display() {
        assert_eq!(Collection::Listings.to_string(), "listings");
        assert_eq!(Collection::Resumes.table_name(), "resumes");
    }
}
