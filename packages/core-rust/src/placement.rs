//! Placement statistics document schema.
//!
//! One [`PlacementStats`] document aggregates the placement outcome of a
//! department/program for an academic year. Clients submit a
//! [`PlacementStatsInput`]; the placement percentage and timestamps are
//! derived server-side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::traits::Document;

/// Collection holding placement statistics documents.
pub const COLLECTION: &str = "placement_stats";

/// Fields matched by the free-text `search` parameter.
pub const SEARCH_FIELDS: [&str; 4] = ["department", "program", "academicYear", "topRecruiters"];

/// Client-supplied placement statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementStatsInput {
    pub academic_year: String,
    pub department: String,
    #[serde(default)]
    pub program: String,
    pub total_students: u32,
    /// Students eligible for placement. Defaults to `total_students`.
    #[serde(default)]
    pub eligible_students: Option<u32>,
    pub placed_students: u32,
    /// Package figures are in lakhs per annum.
    #[serde(default)]
    pub highest_package: f64,
    #[serde(default)]
    pub average_package: f64,
    #[serde(default)]
    pub median_package: f64,
    #[serde(default)]
    pub companies_visited: u32,
    #[serde(default)]
    pub top_recruiters: Vec<String>,
    #[serde(default)]
    pub is_published: bool,
    /// Optional reference to an institution document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
}

impl PlacementStatsInput {
    #[must_use]
    pub fn eligible(&self) -> u32 {
        self.eligible_students.unwrap_or(self.total_students)
    }

    /// Checks the schema invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.academic_year.trim().is_empty() {
            return Err(ValidationError::new("academicYear", "must not be empty"));
        }
        if self.department.trim().is_empty() {
            return Err(ValidationError::new("department", "must not be empty"));
        }
        let eligible = self.eligible();
        if eligible > self.total_students {
            return Err(ValidationError::new(
                "eligibleStudents",
                format!("{eligible} exceeds totalStudents {}", self.total_students),
            ));
        }
        if self.placed_students > eligible {
            return Err(ValidationError::new(
                "placedStudents",
                format!("{} exceeds eligible students {eligible}", self.placed_students),
            ));
        }
        for (field, value) in [
            ("highestPackage", self.highest_package),
            ("averagePackage", self.average_package),
            ("medianPackage", self.median_package),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::new(field, "must be a non-negative number"));
            }
        }
        if self.average_package > self.highest_package {
            return Err(ValidationError::new(
                "averagePackage",
                "must not exceed highestPackage",
            ));
        }
        if self.median_package > self.highest_package {
            return Err(ValidationError::new(
                "medianPackage",
                "must not exceed highestPackage",
            ));
        }
        Ok(())
    }

    /// Validates the input and builds a new document stamped at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the input violates the schema.
    pub fn into_stats(self, now: DateTime<Utc>) -> Result<PlacementStats, ValidationError> {
        self.validate()?;
        let eligible = self.eligible();
        Ok(PlacementStats {
            id: None,
            placement_percentage: placement_percentage(self.placed_students, eligible, self.total_students),
            academic_year: self.academic_year,
            department: self.department,
            program: self.program,
            total_students: self.total_students,
            eligible_students: eligible,
            placed_students: self.placed_students,
            highest_package: self.highest_package,
            average_package: self.average_package,
            median_package: self.median_package,
            companies_visited: self.companies_visited,
            top_recruiters: self.top_recruiters,
            is_published: self.is_published,
            institution: self.institution,
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }
}

/// Stored placement statistics document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementStats {
    /// Assigned by the store on insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub academic_year: String,
    pub department: String,
    pub program: String,
    pub total_students: u32,
    pub eligible_students: u32,
    pub placed_students: u32,
    pub placement_percentage: f64,
    pub highest_package: f64,
    pub average_package: f64,
    pub median_package: f64,
    pub companies_visited: u32,
    pub top_recruiters: Vec<String>,
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "__version", default)]
    pub version: u32,
}

impl PlacementStats {
    /// Applies a full update, keeping identity and creation time.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the input violates the schema.
    pub fn replace_with(
        &self,
        input: PlacementStatsInput,
        now: DateTime<Utc>,
    ) -> Result<PlacementStats, ValidationError> {
        let mut next = input.into_stats(now)?;
        next.id.clone_from(&self.id);
        next.created_at = self.created_at;
        next.version = self.version;
        Ok(next)
    }

    /// Serializes into a store document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization does not produce a JSON object.
    pub fn to_document(&self) -> Result<Document, serde_json::Error> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(serde::ser::Error::custom("placement stats must serialize to an object")),
        }
    }

    /// Deserializes from a store document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not match the schema.
    pub fn from_document(document: Document) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::Value::Object(document))
    }
}

/// Share of placed students, as a percentage rounded to two decimals.
///
/// The denominator is `eligible` when non-zero, otherwise `total`; with both
/// zero the percentage is 0.
#[must_use]
pub fn placement_percentage(placed: u32, eligible: u32, total: u32) -> f64 {
    let denominator = if eligible > 0 { eligible } else { total };
    if denominator == 0 {
        return 0.0;
    }
    let pct = f64::from(placed) / f64::from(denominator) * 100.0;
    (pct * 100.0).round() / 100.0
}
