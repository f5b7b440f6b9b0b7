//! Village-level resource records

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

use super::{text_enum, GeoJsonDraft, GeoJsonPoint, Validator};

text_enum! {
    /// Water / food availability level
    pub enum Availability {
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
}

text_enum! {
    pub enum RoadConnectivity {
        None => "None",
        Kaccha => "Kaccha",
        Pacca => "Pacca",
        Highway => "Highway",
    }
}

text_enum! {
    pub enum Electrification {
        NotElectrified => "Not Electrified",
        Partial => "Partial",
        FullyElectrified => "Fully Electrified",
    }
}

text_enum! {
    pub enum BambooCoverage {
        None => "None",
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
}

/// Household counts by construction type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HousingType {
    pub kutcha: f64,
    pub semi_pacca: f64,
    pub pacca: f64,
}

/// Validated resource content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceFields {
    pub village: String,
    pub district: String,
    pub state: String,
    pub population: f64,
    pub location: GeoJsonPoint,

    pub st_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children0to6: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub women_population: Option<f64>,

    pub infrastructure_status: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_connectivity: Option<RoadConnectivity>,
    #[serde(rename = "distanceToPHC", skip_serializing_if = "Option::is_none")]
    pub distance_to_phc: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_to_school: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub electrification_status: Option<Electrification>,

    pub water_availability: Availability,
    pub food_availability: Availability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forest_cover_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bamboo_coverage: Option<BambooCoverage>,

    pub poverty_ratio: f64,
    pub literacy_rate: f64,
    pub employment_ratio: f64,
    pub housing_type: HousingType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_dropout_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub malnutrition_rate: Option<f64>,
}

/// Stored resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    #[serde(flatten)]
    pub fields: ResourceFields,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HousingTypeDraft {
    pub kutcha: Option<f64>,
    pub semi_pacca: Option<f64>,
    pub pacca: Option<f64>,
}

/// Resource as submitted by a client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDraft {
    pub village: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub population: Option<f64>,
    pub location: Option<GeoJsonDraft>,
    pub st_percentage: Option<f64>,
    pub children0to6: Option<f64>,
    pub women_population: Option<f64>,
    pub infrastructure_status: Option<f64>,
    pub road_connectivity: Option<String>,
    #[serde(rename = "distanceToPHC")]
    pub distance_to_phc: Option<f64>,
    pub distance_to_school: Option<f64>,
    pub electrification_status: Option<String>,
    pub water_availability: Option<String>,
    pub food_availability: Option<String>,
    pub forest_cover_percentage: Option<f64>,
    pub bamboo_coverage: Option<String>,
    pub poverty_ratio: Option<f64>,
    pub literacy_rate: Option<f64>,
    pub employment_ratio: Option<f64>,
    pub housing_type: Option<HousingTypeDraft>,
    pub school_dropout_rate: Option<f64>,
    pub malnutrition_rate: Option<f64>,
}

/// Fields a PATCH may touch
pub const UPDATABLE_RESOURCE_FIELDS: &[&str] = &[
    "population",
    "stPercentage",
    "infrastructureStatus",
    "waterAvailability",
    "foodAvailability",
    "povertyRatio",
    "literacyRate",
    "employmentRatio",
];

const PERCENT: (Option<f64>, Option<f64>) = (Some(0.0), Some(100.0));

impl ResourceDraft {
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| AppError::BadRequest(format!("Invalid resource payload: {}", e)))
    }

    pub fn validate(&self) -> Result<ResourceFields> {
        let mut v = Validator::new();
        let (pmin, pmax) = PERCENT;

        let availability = |v: &mut Validator, field: &str, value: &Option<String>| {
            v.enum_value(
                field,
                value.as_deref(),
                Availability::parse,
                None,
                Some(&format!("Path `{}` is required.", field)),
            )
            .unwrap_or(Availability::Low)
        };

        let housing = self.housing_type.clone().unwrap_or_default();
        let housing_type = HousingType {
            kutcha: v
                .optional_number("housingType.kutcha", housing.kutcha, Some(0.0), None)
                .unwrap_or(0.0),
            semi_pacca: v
                .optional_number("housingType.semiPacca", housing.semi_pacca, Some(0.0), None)
                .unwrap_or(0.0),
            pacca: v
                .optional_number("housingType.pacca", housing.pacca, Some(0.0), None)
                .unwrap_or(0.0),
        };

        let fields = ResourceFields {
            village: v.required_text("village", self.village.as_deref(), None),
            district: v.required_text("district", self.district.as_deref(), None),
            state: v.required_text("state", self.state.as_deref(), None),
            population: v.required_number("population", self.population, Some(0.0), None, None),
            location: v.point(
                "location",
                self.location.as_ref(),
                true,
                "Coordinates must be in [longitude, latitude] format with valid ranges.",
            ),
            st_percentage: v.required_number("stPercentage", self.st_percentage, pmin, pmax, None),
            children0to6: v.optional_number("children0to6", self.children0to6, Some(0.0), None),
            women_population: v.optional_number(
                "womenPopulation",
                self.women_population,
                Some(0.0),
                None,
            ),
            infrastructure_status: v.required_number(
                "infrastructureStatus",
                self.infrastructure_status,
                Some(0.0),
                Some(10.0),
                None,
            ),
            road_connectivity: v.enum_value(
                "roadConnectivity",
                self.road_connectivity.as_deref(),
                RoadConnectivity::parse,
                None,
                None,
            ),
            distance_to_phc: v.optional_number("distanceToPHC", self.distance_to_phc, Some(0.0), None),
            distance_to_school: v.optional_number(
                "distanceToSchool",
                self.distance_to_school,
                Some(0.0),
                None,
            ),
            electrification_status: v.enum_value(
                "electrificationStatus",
                self.electrification_status.as_deref(),
                Electrification::parse,
                None,
                None,
            ),
            water_availability: availability(&mut v, "waterAvailability", &self.water_availability),
            food_availability: availability(&mut v, "foodAvailability", &self.food_availability),
            forest_cover_percentage: v.optional_number(
                "forestCoverPercentage",
                self.forest_cover_percentage,
                pmin,
                pmax,
            ),
            bamboo_coverage: v.enum_value(
                "bambooCoverage",
                self.bamboo_coverage.as_deref(),
                BambooCoverage::parse,
                None,
                None,
            ),
            poverty_ratio: v.required_number("povertyRatio", self.poverty_ratio, pmin, pmax, None),
            literacy_rate: v.required_number("literacyRate", self.literacy_rate, pmin, pmax, None),
            employment_ratio: v.required_number(
                "employmentRatio",
                self.employment_ratio,
                pmin,
                pmax,
                None,
            ),
            housing_type,
            school_dropout_rate: v.optional_number(
                "schoolDropoutRate",
                self.school_dropout_rate,
                pmin,
                pmax,
            ),
            malnutrition_rate: v.optional_number(
                "malnutritionRate",
                self.malnutrition_rate,
                pmin,
                pmax,
            ),
        };

        v.finish(fields)
    }
}

/// Reject PATCH bodies touching anything outside [`UPDATABLE_RESOURCE_FIELDS`]
pub fn check_resource_update(body: &Value) -> Result<()> {
    let Some(map) = body.as_object() else {
        return Err(AppError::BadRequest("Invalid updates!".to_string()));
    };
    if map
        .keys()
        .all(|key| UPDATABLE_RESOURCE_FIELDS.contains(&key.as_str()))
    {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid updates!".to_string()))
    }
}
