//! Domain records stored by the server
//!
//! Each record type has three shapes:
//! - a `*Draft` deserialized from request JSON, every field optional;
//! - validated `*Fields`, produced by `Draft::validate`;
//! - the stored record (`Patta`, `Resource`) carrying id and timestamps.

use serde::{Deserialize, Serialize};

/// Declares a closed set of string values with serde names matching the wire format.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use text_enum;

mod patta;
mod resource;
mod validation;

pub use patta::*;
pub use resource::*;
pub use validation::{merge_json, Validator};

/// GeoJSON point, `coordinates` is `[longitude, latitude]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonPoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

impl GeoJsonPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: vec![lon, lat],
        }
    }

    pub fn lon(&self) -> f64 {
        self.coordinates.first().copied().unwrap_or_default()
    }

    pub fn lat(&self) -> f64 {
        self.coordinates.get(1).copied().unwrap_or_default()
    }
}

/// GeoJSON point as submitted, before the shape is checked
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoJsonDraft {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<f64>>,
}

/// Request bodies shared by tests across the crate
#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub(crate) fn sample_patta_json(number: &str) -> Value {
        json!({
            "pattaNumber": number,
            "holder": {
                "name": "Rajesh Kumar",
                "fatherName": "Suresh Kumar",
                "tribe": "Gond",
                "category": "Scheduled Tribe"
            },
            "location": {
                "village": "Bichhiya",
                "district": "Mandla",
                "state": "Madhya Pradesh",
                "coordinates": { "type": "Point", "coordinates": [80.3719, 22.6] },
                "surveyNumber": "45/2",
                "area": { "value": 2.5, "unit": "acres" },
                "boundaries": {
                    "north": "Nala",
                    "south": "Main Road",
                    "east": "Forest Boundary",
                    "west": "Neighbor Patta"
                }
            },
            "rights": ["Right to cultivate"],
            "isHeritable": true,
            "issuedBy": {
                "authority": "District Tribal Welfare Office",
                "designation": "District Tribal Welfare Officer",
                "date": "2023-01-15T00:00:00.000Z"
            }
        })
    }

    pub(crate) fn sample_resource_json(village: &str, district: &str, state: &str) -> Value {
        json!({
            "village": village,
            "district": district,
            "state": state,
            "population": 1200,
            "location": { "type": "Point", "coordinates": [91.28, 23.83] },
            "stPercentage": 45,
            "children0to6": 150,
            "womenPopulation": 600,
            "infrastructureStatus": 4,
            "roadConnectivity": "Kaccha",
            "distanceToPHC": 12,
            "electrificationStatus": "Partial",
            "waterAvailability": "Low",
            "foodAvailability": "Medium",
            "forestCoverPercentage": 55,
            "bambooCoverage": "High",
            "povertyRatio": 40,
            "literacyRate": 62,
            "employmentRatio": 55,
            "housingType": { "kutcha": 120, "semiPacca": 80, "pacca": 40 }
        })
    }
}
