use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::InternalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    Vendor,
    Partner,
    Prospect,
    Customer,
    Affiliate,
    Other,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 6] = [
        Self::Vendor,
        Self::Partner,
        Self::Prospect,
        Self::Customer,
        Self::Affiliate,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vendor => "vendor",
            Self::Partner => "partner",
            Self::Prospect => "prospect",
            Self::Customer => "customer",
            Self::Affiliate => "affiliate",
            Self::Other => "other",
        }
    }
}

/// Cross-system identity edges are affiliate edges unless stated otherwise
impl Default for RelationshipType {
    fn default() -> Self {
        Self::Affiliate
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = InternalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| InternalError::parse("RelationshipType", format!("unknown relationship type '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipStatus {
    Active,
    Inactive,
    Pending,
    Terminated,
}

impl RelationshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Pending => "pending",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipStatus {
    type Err = InternalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "pending" => Ok(Self::Pending),
            "terminated" => Ok(Self::Terminated),
            _ => Err(InternalError::parse("RelationshipStatus", format!("unknown status '{}'", s))),
        }
    }
}

/// Explicit provisioning request for an edge
#[derive(Debug, Clone)]
pub struct NewRelationship {
    pub company_from: i64,
    pub company_to: i64,
    pub relationship_type: RelationshipType,
    pub status: RelationshipStatus,
    pub is_primary: bool,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub metadata: Option<serde_json::Value>,
    pub created_by: Option<String>,
}

impl NewRelationship {
    /// Non-primary, active, open edge starting today
    pub fn new(company_from: i64, company_to: i64, relationship_type: RelationshipType) -> Self {
        Self {
            company_from,
            company_to,
            relationship_type,
            status: RelationshipStatus::Active,
            is_primary: false,
            start_date: chrono::Utc::now().date_naive(),
            end_date: None,
            metadata: None,
            created_by: None,
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    pub fn starting(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    pub fn ending(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_status(mut self, status: RelationshipStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn created_by(mut self, actor: impl Into<String>) -> Self {
        self.created_by = Some(actor.into());
        self
    }
}
