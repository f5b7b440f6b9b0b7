//! Rule-based mapping from OCR detections to a patta form draft
//!
//! Each detection is tested against the label patterns in order and the first
//! match decides which form field the value goes to. Depending on the label,
//! the value is the text after the first `:` or the next detection.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::text::{clean_text, fuzzy_match, parse_date, parse_number};
use super::types::OcrResponse;
use crate::models::{AreaUnit, GeoJsonPoint, HolderCategory};

pub const KNOWN_DISTRICTS: &[&str] = &["West Tripura", "South Tripura", "North Tripura", "Dhalai"];
pub const KNOWN_VILLAGES: &[&str] = &["Badharghat", "Agartala", "Dukli"];

/// Patta form as filled from a scanned title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PattaFormData {
    pub patta_number: String,
    pub holder: FormHolder,
    pub location: FormLocation,
    pub rights: Vec<String>,
    pub is_heritable: bool,
    pub status: String,
    pub issued_by: FormIssuedBy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormHolder {
    pub name: String,
    pub father_name: String,
    pub tribe: String,
    pub category: HolderCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormLocation {
    pub state: String,
    pub district: String,
    pub sub_division: String,
    pub revenue_circle: String,
    pub village: String,
    pub survey_number: String,
    pub khatiyan_number: String,
    pub coordinates: GeoJsonPoint,
    pub area: FormArea,
    pub boundaries: FormBoundaries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormArea {
    pub value: f64,
    pub unit: AreaUnit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormBoundaries {
    pub north: String,
    pub south: String,
    pub east: String,
    pub west: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormIssuedBy {
    pub authority: String,
    pub designation: String,
    pub date: String,
}

impl Default for PattaFormData {
    fn default() -> Self {
        Self {
            patta_number: String::new(),
            holder: FormHolder {
                name: String::new(),
                father_name: String::new(),
                tribe: String::new(),
                category: HolderCategory::ScheduledTribe,
            },
            location: FormLocation {
                state: String::new(),
                district: String::new(),
                sub_division: String::new(),
                revenue_circle: String::new(),
                village: String::new(),
                survey_number: String::new(),
                khatiyan_number: String::new(),
                coordinates: GeoJsonPoint::new(0.0, 0.0),
                area: FormArea {
                    value: 0.0,
                    unit: AreaUnit::Acres,
                },
                boundaries: FormBoundaries::default(),
            },
            rights: Vec::new(),
            is_heritable: true,
            status: "active".to_string(),
            issued_by: FormIssuedBy {
                authority: String::new(),
                designation: String::new(),
                date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Label {
    PattaNumber,
    District,
    SubDivision,
    RevenueCircle,
    Survey,
    Khatiyan,
    OwnerName,
    Father,
    Tribe,
    TypeOfLand,
    ExtentOfLand,
    North,
    South,
    East,
    West,
    Authority,
    Designation,
    Date,
}

static LABELS: Lazy<Vec<(Regex, Label)>> = Lazy::new(|| {
    [
        (r"patta", Label::PattaNumber),
        (r"district", Label::District),
        (r"sub-?division", Label::SubDivision),
        (r"revenue circle", Label::RevenueCircle),
        (r"survey", Label::Survey),
        (r"khati(y|v)an", Label::Khatiyan),
        (r"owner name", Label::OwnerName),
        (r"father", Label::Father),
        (r"tribe", Label::Tribe),
        (r"type of land", Label::TypeOfLand),
        (r"extent of land", Label::ExtentOfLand),
        (r"north", Label::North),
        (r"south", Label::South),
        (r"east", Label::East),
        (r"west", Label::West),
        (r"authority", Label::Authority),
        (r"designation", Label::Designation),
        (r"date", Label::Date),
    ]
    .into_iter()
    .map(|(pattern, label)| {
        let regex = Regex::new(&format!("(?i){}", pattern)).expect("Label regex pattern is valid and should compile");
        (regex, label)
    })
    .collect()
});

/// Text between the first and second `:`, if the line has a colon
fn after_colon(text: &str) -> Option<&str> {
    text.split(':').nth(1)
}

/// Map a recognizer response onto a patta form draft.
pub fn map_ocr_to_form(ocr_result: &Value) -> PattaFormData {
    let response = OcrResponse::from_value(ocr_result);
    let detections = response.first_page_texts();
    let mut form = PattaFormData::default();

    for (i, raw) in detections.iter().enumerate() {
        let text = raw.trim();
        let next = detections.get(i + 1).copied();
        let inline_or_next = || if text.contains(':') { after_colon(text) } else { next };

        let Some(label) = LABELS
            .iter()
            .find(|(regex, _)| regex.is_match(text))
            .map(|(_, label)| *label)
        else {
            continue;
        };

        let location = &mut form.location;
        match label {
            Label::PattaNumber => form.patta_number = clean_text(inline_or_next()),
            Label::District => location.district = clean_text(inline_or_next()),
            Label::SubDivision => location.sub_division = clean_text(inline_or_next()),
            Label::RevenueCircle => location.revenue_circle = clean_text(inline_or_next()),
            Label::Survey => location.survey_number = clean_text(after_colon(text)),
            Label::Khatiyan => location.khatiyan_number = clean_text(after_colon(text)),
            Label::OwnerName => form.holder.name = clean_text(next),
            Label::Father => form.holder.father_name = clean_text(next),
            Label::Tribe => form.holder.tribe = clean_text(next),
            Label::TypeOfLand => form.rights.push(clean_text(inline_or_next())),
            Label::ExtentOfLand => location.area.value = parse_number(text),
            Label::North => location.boundaries.north = clean_text(after_colon(text)),
            Label::South => location.boundaries.south = clean_text(after_colon(text)),
            Label::East => location.boundaries.east = clean_text(after_colon(text)),
            Label::West => location.boundaries.west = clean_text(after_colon(text)),
            Label::Authority => form.issued_by.authority = clean_text(after_colon(text)),
            Label::Designation => form.issued_by.designation = clean_text(after_colon(text)),
            Label::Date => form.issued_by.date = parse_date(after_colon(text)),
        }
    }

    form.location.district = fuzzy_match(&form.location.district, KNOWN_DISTRICTS);
    form.location.village = fuzzy_match(&form.location.village, KNOWN_VILLAGES);

    tracing::debug!(
        "Mapped {} OCR detections to patta form {:?}",
        detections.len(),
        form.patta_number
    );

    form
}
