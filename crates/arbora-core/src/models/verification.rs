//! Planting verification record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::location::GeoPoint;

/// Moderation status of a verification.
///
/// Records are created `Pending`; the moderation workflow moves them to
/// `Verified` or `Rejected` later. The upload pipeline never mutates a record
/// after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "verification_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

/// Persisted proof-of-planting record.
///
/// The record references a photo that is already durable in the object store;
/// its insertion is the commit point of an upload attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Verification {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub match_id: Option<Uuid>,
    pub tree_name: String,
    pub photo_key: String,
    pub photo_url: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub planted_on: NaiveDate,
    pub notes: Option<String>,
    pub status: VerificationStatus,
    pub created_at: DateTime<Utc>,
}

impl Verification {
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => GeoPoint::new(latitude, longitude),
            _ => None,
        }
    }
}

/// Insert payload for a verification record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVerification {
    pub owner_id: Uuid,
    pub match_id: Option<Uuid>,
    pub tree_name: String,
    pub photo_key: String,
    pub photo_url: String,
    pub location: Option<GeoPoint>,
    pub planted_on: NaiveDate,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Verification {
        Verification {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            match_id: None,
            tree_name: "Acacia".to_string(),
            photo_key: "owner/1700000000000-acacia.jpg".to_string(),
            photo_url: "https://media.example.com/owner/1700000000000-acacia.jpg".to_string(),
            latitude: Some(-1.2921),
            longitude: Some(36.8219),
            planted_on: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            notes: None,
            status: VerificationStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_location_requires_both_coordinates() {
        let mut verification = sample();
        assert!(verification.location().is_some());

        verification.longitude = None;
        assert!(verification.location().is_none());

        verification.latitude = None;
        verification.longitude = Some(36.8219);
        assert!(verification.location().is_none());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&VerificationStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
        let status: VerificationStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(status, VerificationStatus::Rejected);
    }

    #[test]
    fn test_record_roundtrip() {
        let verification = sample();
        let json = serde_json::to_string(&verification).unwrap();
        let back: Verification = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tree_name, verification.tree_name);
        assert_eq!(back.status, verification.status);
        assert_eq!(back.planted_on, verification.planted_on);
    }
}
