use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::{DraftIncomplete, ParseValueError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Jurisdiction {
    #[serde(rename = "CA")]
    California,
    #[serde(rename = "CO")]
    Colorado,
    #[serde(rename = "NC")]
    NorthCarolina,
}

/// State-specific SR-22 filing rules shown alongside a jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingRequirements {
    pub filing_period_years: u8,
    pub minimum_liability: &'static str,
    pub filing_fee_usd: u16,
    pub processing_time: &'static str,
    pub notes: &'static [&'static str],
}

impl Jurisdiction {
    pub const ALL: [Jurisdiction; 3] = [
        Jurisdiction::California,
        Jurisdiction::Colorado,
        Jurisdiction::NorthCarolina,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Jurisdiction::California => "CA",
            Jurisdiction::Colorado => "CO",
            Jurisdiction::NorthCarolina => "NC",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Jurisdiction::California => "California",
            Jurisdiction::Colorado => "Colorado",
            Jurisdiction::NorthCarolina => "North Carolina",
        }
    }

    pub fn requirements(self) -> FilingRequirements {
        match self {
            Jurisdiction::California => FilingRequirements {
                filing_period_years: 3,
                minimum_liability: "15/30/5",
                filing_fee_usd: 25,
                processing_time: "Same day",
                notes: &["Electronic filing available", "DMV notification within 30 days"],
            },
            Jurisdiction::Colorado => FilingRequirements {
                filing_period_years: 3,
                minimum_liability: "25/50/15",
                filing_fee_usd: 20,
                processing_time: "Same day",
                notes: &["Electronic filing available", "Insurance verification required"],
            },
            Jurisdiction::NorthCarolina => FilingRequirements {
                filing_period_years: 3,
                minimum_liability: "30/60/25",
                filing_fee_usd: 15,
                processing_time: "1-2 business days",
                notes: &["Physical or electronic filing", "DMV Form DL-123 required"],
            },
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Jurisdiction {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Jurisdiction::ALL
            .into_iter()
            .find(|j| j.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseValueError::new("jurisdiction", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationType {
    Dui,
    Reckless,
    Uninsured,
    Suspended,
    Accident,
    Other,
}

impl ViolationType {
    pub const ALL: [ViolationType; 6] = [
        ViolationType::Dui,
        ViolationType::Reckless,
        ViolationType::Uninsured,
        ViolationType::Suspended,
        ViolationType::Accident,
        ViolationType::Other,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ViolationType::Dui => "dui",
            ViolationType::Reckless => "reckless",
            ViolationType::Uninsured => "uninsured",
            ViolationType::Suspended => "suspended",
            ViolationType::Accident => "accident",
            ViolationType::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViolationType::Dui => "DUI/DWI",
            ViolationType::Reckless => "Reckless Driving",
            ViolationType::Uninsured => "Driving Uninsured",
            ViolationType::Suspended => "Driving on Suspended License",
            ViolationType::Accident => "At-Fault Accident",
            ViolationType::Other => "Other Violation",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ViolationType::Dui => "Driving under the influence conviction",
            ViolationType::Reckless => "Reckless or dangerous driving citation",
            ViolationType::Uninsured => "Caught driving without valid insurance",
            ViolationType::Suspended => "Operating vehicle with suspended license",
            ViolationType::Accident => "Accident where you were found at fault",
            ViolationType::Other => "Court-ordered SR-22 for other reasons",
        }
    }
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ViolationType {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViolationType::ALL
            .into_iter()
            .find(|v| v.id() == s)
            .ok_or_else(|| ParseValueError::new("violation type", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoverageType {
    Owner,
    NonOwner,
}

impl CoverageType {
    pub fn for_ownership(owns_vehicle: bool) -> Self {
        if owns_vehicle {
            CoverageType::Owner
        } else {
            CoverageType::NonOwner
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CoverageType::Owner => "owner",
            CoverageType::NonOwner => "non-owner",
        }
    }
}

impl fmt::Display for CoverageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Quoted,
    Contacted,
    Converted,
    Expired,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 5] = [
        SubmissionStatus::Pending,
        SubmissionStatus::Quoted,
        SubmissionStatus::Contacted,
        SubmissionStatus::Converted,
        SubmissionStatus::Expired,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Quoted => "quoted",
            SubmissionStatus::Contacted => "contacted",
            SubmissionStatus::Converted => "converted",
            SubmissionStatus::Expired => "expired",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "Pending",
            SubmissionStatus::Quoted => "Quoted",
            SubmissionStatus::Contacted => "Contacted",
            SubmissionStatus::Converted => "Converted",
            SubmissionStatus::Expired => "Expired",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubmissionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseValueError::new("status", s))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftSubmission {
    pub jurisdiction: Option<Jurisdiction>,
    pub violation_type: Option<ViolationType>,
    owns_vehicle: Option<bool>,
    pub contact: ContactDetails,
    pub consent: bool,
}

impl DraftSubmission {
    pub fn owns_vehicle(&self) -> Option<bool> {
        self.owns_vehicle
    }

    /// Sets vehicle ownership; the coverage type follows from it.
    pub fn set_vehicle_ownership(&mut self, owns_vehicle: bool) {
        self.owns_vehicle = Some(owns_vehicle);
    }

    pub fn coverage_type(&self) -> Option<CoverageType> {
        self.owns_vehicle.map(CoverageType::for_ownership)
    }

    pub fn contact_complete(&self) -> bool {
        !self.contact.first_name.is_empty()
            && !self.contact.last_name.is_empty()
            && !self.contact.email.is_empty()
    }

    pub fn finalize(&self, owner_id: Option<String>) -> Result<NewSubmission, DraftIncomplete> {
        let jurisdiction = self.jurisdiction.ok_or(DraftIncomplete::Jurisdiction)?;
        let violation_type = self.violation_type.ok_or(DraftIncomplete::ViolationType)?;
        let has_vehicle = self.owns_vehicle.ok_or(DraftIncomplete::VehicleOwnership)?;
        if self.contact.first_name.is_empty() {
            return Err(DraftIncomplete::FirstName);
        }
        if self.contact.last_name.is_empty() {
            return Err(DraftIncomplete::LastName);
        }
        if self.contact.email.is_empty() {
            return Err(DraftIncomplete::Email);
        }
        if !self.consent {
            return Err(DraftIncomplete::Consent);
        }

        Ok(NewSubmission {
            jurisdiction,
            violation_type,
            coverage_type: CoverageType::for_ownership(has_vehicle),
            has_vehicle,
            first_name: self.contact.first_name.clone(),
            last_name: self.contact.last_name.clone(),
            email: self.contact.email.clone(),
            phone: non_empty(&self.contact.phone),
            zip_code: non_empty(&self.contact.zip_code),
            consent: true,
            owner_id,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubmission {
    #[serde(rename = "state")]
    pub jurisdiction: Jurisdiction,
    pub violation_type: ViolationType,
    pub coverage_type: CoverageType,
    pub has_vehicle: bool,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub zip_code: Option<String>,
    pub consent: bool,
    #[serde(rename = "user_id")]
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSubmission {
    pub id: String,
    #[serde(rename = "state")]
    pub jurisdiction: Jurisdiction,
    pub violation_type: ViolationType,
    pub coverage_type: CoverageType,
    pub has_vehicle: bool,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub zip_code: Option<String>,
    pub consent: bool,
    #[serde(rename = "user_id")]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
}

impl StoredSubmission {
    /// Materializes an insert payload the way a store does: pending status, given id and time.
    pub fn from_new(id: String, new: NewSubmission, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            jurisdiction: new.jurisdiction,
            violation_type: new.violation_type,
            coverage_type: new.coverage_type,
            has_vehicle: new.has_vehicle,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            zip_code: new.zip_code,
            consent: new.consent,
            owner_id: new.owner_id,
            status: SubmissionStatus::default(),
            created_at,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub is_admin: bool,
}

impl Identity {
    pub fn user(id: impl Into<String>) -> Self {
        Self { id: id.into(), is_admin: false }
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self { id: id.into(), is_admin: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn complete_draft() -> DraftSubmission {
        let mut draft = DraftSubmission {
            jurisdiction: Some(Jurisdiction::California),
            violation_type: Some(ViolationType::Dui),
            consent: true,
            ..DraftSubmission::default()
        };
        draft.set_vehicle_ownership(true);
        draft.contact.first_name = "John".to_string();
        draft.contact.last_name = "Doe".to_string();
        draft.contact.email = "john@example.com".to_string();
        draft
    }

    #[test]
    fn test_coverage_type_unknown_until_ownership_chosen() {
        let mut draft = DraftSubmission::default();
        assert_eq!(draft.coverage_type(), None);

        draft.set_vehicle_ownership(false);
        assert_eq!(draft.coverage_type(), Some(CoverageType::NonOwner));

        draft.set_vehicle_ownership(true);
        assert_eq!(draft.coverage_type(), Some(CoverageType::Owner));
    }

    #[test]
    fn test_finalize_complete_draft() {
        let new = complete_draft().finalize(None).unwrap();

        assert_eq!(new.jurisdiction, Jurisdiction::California);
        assert_eq!(new.coverage_type, CoverageType::Owner);
        assert!(new.has_vehicle);
        assert_eq!(new.phone, None);
        assert_eq!(new.zip_code, None);
        assert_eq!(new.owner_id, None);
    }

    #[test]
    fn test_finalize_reports_first_missing_field() {
        let mut draft = complete_draft();
        draft.consent = false;
        assert_eq!(draft.finalize(None), Err(DraftIncomplete::Consent));

        draft.contact.email.clear();
        assert_eq!(draft.finalize(None), Err(DraftIncomplete::Email));

        assert_eq!(DraftSubmission::default().finalize(None), Err(DraftIncomplete::Jurisdiction));
    }

    #[test]
    fn test_finalize_keeps_optional_contact_fields() {
        let mut draft = complete_draft();
        draft.contact.phone = "(555) 123-4567".to_string();
        draft.contact.zip_code = "90210".to_string();

        let new = draft.finalize(Some("user-1".to_string())).unwrap();
        assert_eq!(new.phone.as_deref(), Some("(555) 123-4567"));
        assert_eq!(new.zip_code.as_deref(), Some("90210"));
        assert_eq!(new.owner_id.as_deref(), Some("user-1"));
    }

    #[test]
    fn test_status_parsing_rejects_unknown_values() {
        for status in SubmissionStatus::ALL {
            assert_eq!(status.as_str().parse::<SubmissionStatus>(), Ok(status));
        }
        assert!("archived".parse::<SubmissionStatus>().is_err());
        assert!("Pending".parse::<SubmissionStatus>().is_err());
    }

    #[test]
    fn test_storage_field_names() {
        let new = complete_draft().finalize(None).unwrap();
        let stored = StoredSubmission::from_new("abc".to_string(), new, Utc::now());
        let json = serde_json::to_value(&stored).unwrap();

        assert_eq!(json["state"], "CA");
        assert_eq!(json["violation_type"], "dui");
        assert_eq!(json["coverage_type"], "owner");
        assert_eq!(json["status"], "pending");
        assert!(json["user_id"].is_null());
    }

    #[test]
    fn test_missing_status_defaults_to_pending() {
        let json = r#"{
            "id": "1", "state": "NC", "violation_type": "other", "coverage_type": "non-owner",
            "has_vehicle": false, "first_name": "Ann", "last_name": "Lee", "email": "ann@example.com",
            "phone": null, "zip_code": null, "consent": true, "user_id": null,
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let stored: StoredSubmission = serde_json::from_str(json).unwrap();
        assert_eq!(stored.status, SubmissionStatus::Pending);
        assert_eq!(stored.coverage_type, CoverageType::NonOwner);
    }

    #[test]
    fn test_jurisdiction_requirements() {
        let nc = Jurisdiction::NorthCarolina.requirements();
        assert_eq!(nc.minimum_liability, "30/60/25");
        assert_eq!(nc.processing_time, "1-2 business days");
        assert!(Jurisdiction::ALL.iter().all(|j| j.requirements().filing_period_years == 3));
        assert_eq!("co".parse::<Jurisdiction>(), Ok(Jurisdiction::Colorado));
    }

    proptest! {
        #[test]
        fn test_coverage_tracks_last_ownership_choice(choices in proptest::collection::vec(any::<bool>(), 1..20)) {
            let mut draft = DraftSubmission::default();
            for choice in &choices {
                draft.set_vehicle_ownership(*choice);
            }
            let last = *choices.last().unwrap();
            prop_assert_eq!(draft.owns_vehicle(), Some(last));
            prop_assert_eq!(draft.coverage_type() == Some(CoverageType::Owner), last);
            prop_assert_eq!(draft.coverage_type() == Some(CoverageType::NonOwner), !last);
        }
    }
}
