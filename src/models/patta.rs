//! Patta (forest-land title) records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

use super::{text_enum, GeoJsonDraft, GeoJsonPoint, Validator};

/// Placeholder author recorded until requests carry an authenticated user
pub const SYSTEM_USER_ID: &str = "000000000000000000000000";

text_enum! {
    /// Holder category under the Forest Rights Act
    pub enum HolderCategory {
        ScheduledTribe => "Scheduled Tribe",
        OtherTraditionalForestDweller => "Other Traditional Forest Dweller",
    }
}

text_enum! {
    pub enum AreaUnit {
        Hectares => "hectares",
        Acres => "acres",
    }
}

text_enum! {
    pub enum PattaStatus {
        Active => "active",
        Revoked => "revoked",
        UnderDispute => "under_dispute",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holder {
    pub name: String,
    pub father_name: String,
    pub tribe: String,
    pub category: HolderCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub value: f64,
    pub unit: AreaUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundaries {
    pub north: String,
    pub south: String,
    pub east: String,
    pub west: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PattaLocation {
    pub village: String,
    pub district: String,
    pub state: String,
    pub coordinates: GeoJsonPoint,
    pub survey_number: String,
    pub area: Area,
    pub boundaries: Boundaries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuedBy {
    pub authority: String,
    pub designation: String,
    pub date: NaiveDate,
}

/// Supporting document attached to a patta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PattaDocument {
    pub name: Option<String>,
    pub url: Option<String>,
    pub uploaded_at: String,
}

/// Validated patta content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PattaFields {
    pub patta_number: String,
    pub holder: Holder,
    pub location: PattaLocation,
    pub rights: Vec<String>,
    pub is_heritable: bool,
    pub is_transferable: bool,
    pub issued_by: IssuedBy,
    pub status: PattaStatus,
    pub documents: Vec<PattaDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Stored patta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patta {
    pub id: String,
    #[serde(flatten)]
    pub fields: PattaFields,
    pub created_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Projection returned by the per-state map listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PattaSummary {
    pub id: String,
    pub patta_number: String,
    pub holder: HolderSummary,
    pub location: LocationSummary,
    pub status: PattaStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HolderSummary {
    pub name: String,
    pub father_name: String,
    pub tribe: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationSummary {
    pub village: String,
    pub district: String,
    pub coordinates: GeoJsonPoint,
    pub area: Area,
}

impl From<&Patta> for PattaSummary {
    fn from(patta: &Patta) -> Self {
        let f = &patta.fields;
        Self {
            id: patta.id.clone(),
            patta_number: f.patta_number.clone(),
            holder: HolderSummary {
                name: f.holder.name.clone(),
                father_name: f.holder.father_name.clone(),
                tribe: f.holder.tribe.clone(),
            },
            location: LocationSummary {
                village: f.location.village.clone(),
                district: f.location.district.clone(),
                coordinates: f.location.coordinates.clone(),
                area: f.location.area.clone(),
            },
            status: f.status,
        }
    }
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolderDraft {
    pub name: Option<String>,
    pub father_name: Option<String>,
    pub tribe: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AreaDraft {
    pub value: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoundariesDraft {
    pub north: Option<String>,
    pub south: Option<String>,
    pub east: Option<String>,
    pub west: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDraft {
    pub village: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub coordinates: Option<GeoJsonDraft>,
    pub survey_number: Option<String>,
    pub area: Option<AreaDraft>,
    pub boundaries: Option<BoundariesDraft>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssuedByDraft {
    pub authority: Option<String>,
    pub designation: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDraft {
    pub name: Option<String>,
    pub url: Option<String>,
    pub uploaded_at: Option<String>,
}

/// Patta as submitted by a client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PattaDraft {
    pub patta_number: Option<String>,
    pub holder: Option<HolderDraft>,
    pub location: Option<LocationDraft>,
    pub rights: Option<Vec<String>>,
    pub is_heritable: Option<bool>,
    pub is_transferable: Option<bool>,
    pub issued_by: Option<IssuedByDraft>,
    pub status: Option<String>,
    pub documents: Option<Vec<DocumentDraft>>,
    pub notes: Option<String>,
}

impl PattaDraft {
    /// Deserialize a request body, reporting shape errors as a bad request
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| AppError::BadRequest(format!("Invalid patta payload: {}", e)))
    }

    pub fn validate(&self) -> Result<PattaFields> {
        let mut v = Validator::new();

        let patta_number = v
            .required_text(
                "pattaNumber",
                self.patta_number.as_deref(),
                Some("Patta number is required"),
            )
            .to_uppercase();

        let holder = self.holder.clone().unwrap_or_default();
        let holder = Holder {
            name: v.required_text("holder.name", holder.name.as_deref(), Some("Holder name is required")),
            father_name: v.required_text(
                "holder.fatherName",
                holder.father_name.as_deref(),
                Some("Father's name is required"),
            ),
            tribe: v.required_text(
                "holder.tribe",
                holder.tribe.as_deref(),
                Some("Tribe information is required"),
            ),
            category: v
                .enum_value(
                    "holder.category",
                    holder.category.as_deref(),
                    HolderCategory::parse,
                    None,
                    Some("Category is required"),
                )
                .unwrap_or(HolderCategory::ScheduledTribe),
        };

        let location = self.location.clone().unwrap_or_default();
        let area = location.area.clone().unwrap_or_default();
        let boundaries = location.boundaries.clone().unwrap_or_default();
        let location = PattaLocation {
            village: v.required_text(
                "location.village",
                location.village.as_deref(),
                Some("Village name is required"),
            ),
            district: v.required_text(
                "location.district",
                location.district.as_deref(),
                Some("District name is required"),
            ),
            state: v.required_text(
                "location.state",
                location.state.as_deref(),
                Some("State name is required"),
            ),
            coordinates: v.point(
                "location.coordinates",
                location.coordinates.as_ref(),
                false,
                "Coordinates must be an array of [longitude, latitude]",
            ),
            survey_number: v.required_text(
                "location.surveyNumber",
                location.survey_number.as_deref(),
                Some("Survey number is required"),
            ),
            area: Area {
                value: v.required_number(
                    "location.area.value",
                    area.value,
                    Some(0.0),
                    None,
                    Some("Area value is required"),
                ),
                unit: v
                    .enum_value(
                        "location.area.unit",
                        area.unit.as_deref(),
                        AreaUnit::parse,
                        Some(AreaUnit::Hectares),
                        None,
                    )
                    .unwrap_or(AreaUnit::Hectares),
            },
            boundaries: Boundaries {
                north: v.required_text(
                    "location.boundaries.north",
                    boundaries.north.as_deref(),
                    Some("Northern boundary description is required"),
                ),
                south: v.required_text(
                    "location.boundaries.south",
                    boundaries.south.as_deref(),
                    Some("Southern boundary description is required"),
                ),
                east: v.required_text(
                    "location.boundaries.east",
                    boundaries.east.as_deref(),
                    Some("Eastern boundary description is required"),
                ),
                west: v.required_text(
                    "location.boundaries.west",
                    boundaries.west.as_deref(),
                    Some("Western boundary description is required"),
                ),
            },
        };

        let mut rights = Vec::new();
        for (i, right) in self.rights.iter().flatten().enumerate() {
            let right = right.trim();
            if right.is_empty() {
                v.push(&format!("rights.{}", i), "At least one right must be specified");
            } else {
                rights.push(right.to_string());
            }
        }

        let issued_by = self.issued_by.clone().unwrap_or_default();
        let issued_date = match issued_by.date.as_deref().map(str::trim) {
            None | Some("") => {
                v.push("issuedBy.date", "Issue date is required");
                NaiveDate::default()
            }
            Some(text) => parse_issue_date(text).unwrap_or_else(|| {
                v.push(
                    "issuedBy.date",
                    format!("Cast to date failed for value \"{}\" at path \"issuedBy.date\"", text),
                );
                NaiveDate::default()
            }),
        };
        let issued_by = IssuedBy {
            authority: v.required_text(
                "issuedBy.authority",
                issued_by.authority.as_deref(),
                Some("Issuing authority is required"),
            ),
            designation: v.required_text(
                "issuedBy.designation",
                issued_by.designation.as_deref(),
                Some("Designation is required"),
            ),
            date: issued_date,
        };

        let status = v
            .enum_value(
                "status",
                self.status.as_deref(),
                PattaStatus::parse,
                Some(PattaStatus::Active),
                None,
            )
            .unwrap_or(PattaStatus::Active);

        let now = Utc::now().to_rfc3339();
        let documents = self
            .documents
            .iter()
            .flatten()
            .map(|doc| PattaDocument {
                name: doc.name.clone(),
                url: doc.url.clone(),
                uploaded_at: doc.uploaded_at.clone().unwrap_or_else(|| now.clone()),
            })
            .collect();

        let notes = v.optional_text(self.notes.as_deref());

        v.finish(PattaFields {
            patta_number,
            holder,
            location,
            rights,
            is_heritable: self.is_heritable.unwrap_or(false),
            is_transferable: self.is_transferable.unwrap_or(false),
            issued_by,
            status,
            documents,
            notes,
        })
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
pub fn parse_issue_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}
