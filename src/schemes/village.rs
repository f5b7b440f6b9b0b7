//! Village-level schemes scored against resource records

use serde::Serialize;

use crate::models::{Availability, BambooCoverage, Electrification, ResourceFields, RoadConnectivity};

use super::{rank, Scored, DEFAULT_LIMIT};

type Rule<T> = fn(&ResourceFields) -> T;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VillageScheme {
    pub id: &'static str,
    pub name: &'static str,
    pub ministry: &'static str,
    pub focus_area: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    eligibility: Rule<bool>,
    #[serde(skip)]
    priority: Rule<i64>,
}

impl std::fmt::Debug for VillageScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VillageScheme").field("id", &self.id).finish()
    }
}

impl VillageScheme {
    pub fn is_eligible(&self, resource: &ResourceFields) -> bool {
        (self.eligibility)(resource)
    }

    pub fn priority(&self, resource: &ResourceFields) -> i64 {
        (self.priority)(resource)
    }
}

/// Points awarded when `cond` holds
fn pts(cond: bool, points: i64) -> i64 {
    if cond {
        points
    } else {
        0
    }
}

fn or0(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

/// Household count assumed for converting population to houses
const PEOPLE_PER_HOUSEHOLD: f64 = 5.0;

static SCHEMES: &[VillageScheme] = &[
    VillageScheme {
        id: "mgnrega",
        name: "MGNREGA",
        ministry: "Ministry of Rural Development",
        focus_area: "Rural employment + community asset creation",
        description: "Mahatma Gandhi National Rural Employment Guarantee Act",
        eligibility: |r| r.population < 10_000.0 && r.employment_ratio < 70.0,
        priority: |r| {
            pts(r.employment_ratio < 60.0, 30)
                + pts(r.poverty_ratio > 30.0, 25)
                + pts(r.st_percentage > 20.0, 20)
                + pts(r.infrastructure_status < 5.0, 25)
        },
    },
    VillageScheme {
        id: "pmgsy",
        name: "PMGSY",
        ministry: "Ministry of Rural Development",
        focus_area: "All-weather road connectivity",
        description: "Pradhan Mantri Gram Sadak Yojana",
        eligibility: |r| {
            r.population >= 250.0
                && matches!(
                    r.road_connectivity,
                    Some(RoadConnectivity::None) | Some(RoadConnectivity::Kaccha)
                )
        },
        priority: |r| {
            pts(r.road_connectivity == Some(RoadConnectivity::None), 50)
                + pts(r.road_connectivity == Some(RoadConnectivity::Kaccha), 30)
                + pts(r.st_percentage > 20.0, 20)
        },
    },
    VillageScheme {
        id: "jjm",
        name: "Jal Jeevan Mission",
        ministry: "Ministry of Jal Shakti",
        focus_area: "Tap water to every rural household",
        description: "Ensuring piped water supply to all rural households",
        eligibility: |r| matches!(r.water_availability, Availability::Low | Availability::Medium),
        priority: |r| {
            pts(r.water_availability == Availability::Low, 50)
                + pts(r.water_availability == Availability::Medium, 30)
                + pts(r.population > 1000.0, 20)
        },
    },
    VillageScheme {
        id: "pmksy",
        name: "PMKSY - Watershed & Irrigation",
        ministry: "Ministry of Agriculture & Farmers’ Welfare",
        focus_area: "Irrigation, water-use efficiency, watershed development",
        description: "Pradhan Mantri Krishi Sinchai Yojana",
        eligibility: |r| r.water_availability == Availability::Low || r.infrastructure_status < 5.0,
        priority: |r| {
            pts(r.water_availability == Availability::Low, 40)
                + pts(r.infrastructure_status < 5.0, 30)
                + pts(r.employment_ratio < 60.0, 30)
        },
    },
    VillageScheme {
        id: "icds",
        name: "ICDS / Poshan Abhiyaan",
        ministry: "Ministry of Women & Child Development",
        focus_area: "Anganwadi services, nutrition, maternal & child health",
        description: "Integrated Child Development Services",
        eligibility: |r| or0(r.children0to6) > 100.0 || or0(r.malnutrition_rate) > 30.0,
        priority: |r| {
            pts(or0(r.malnutrition_rate) > 30.0, 50)
                + pts(or0(r.children0to6) > 200.0, 50)
                + pts(r.st_percentage > 20.0, 20)
        },
    },
    VillageScheme {
        id: "samagra-shiksha",
        name: "Samagra Shiksha",
        ministry: "Ministry of Education",
        focus_area: "School infrastructure, inclusive education, digital learning",
        description: "Holistic education scheme",
        eligibility: |r| or0(r.school_dropout_rate) > 20.0 || or0(r.distance_to_school) > 5.0,
        priority: |r| {
            pts(or0(r.school_dropout_rate) > 30.0, 40)
                + pts(or0(r.distance_to_school) > 5.0, 40)
                + pts(r.literacy_rate < 70.0, 20)
        },
    },
    VillageScheme {
        id: "nhm",
        name: "National Health Mission",
        ministry: "Ministry of Health & Family Welfare",
        focus_area: "Rural health infrastructure",
        description: "Improving healthcare infrastructure and services",
        eligibility: |r| or0(r.distance_to_phc) > 5.0 || r.population > 2000.0,
        priority: |r| {
            pts(or0(r.distance_to_phc) > 10.0, 50)
                + pts(r.population > 3000.0, 30)
                + pts(r.st_percentage > 20.0, 20)
        },
    },
    VillageScheme {
        id: "pmay-g",
        name: "PMAY-G",
        ministry: "Ministry of Rural Development",
        focus_area: "Housing for rural poor",
        description: "Pradhan Mantri Awas Yojana - Gramin",
        eligibility: |r| r.housing_type.kutcha > 0.3 * r.population / PEOPLE_PER_HOUSEHOLD,
        priority: |r| {
            let h = &r.housing_type;
            let total = h.kutcha + h.semi_pacca + h.pacca;
            let total = if total == 0.0 { 1.0 } else { total };
            let kutcha_percentage = h.kutcha / total * 100.0;

            pts(kutcha_percentage > 50.0, 50)
                + pts(r.poverty_ratio > 30.0, 30)
                + pts(r.st_percentage > 20.0, 20)
        },
    },
    VillageScheme {
        id: "nrlm",
        name: "NRLM",
        ministry: "Ministry of Rural Development",
        focus_area: "SHGs, microfinance & enterprises",
        description: "National Rural Livelihood Mission",
        eligibility: |r| or0(r.women_population) > r.population * 0.4 && r.employment_ratio < 70.0,
        priority: |r| {
            pts(r.employment_ratio < 60.0, 40)
                + pts(or0(r.women_population) > r.population * 0.45, 40)
                + pts(r.st_percentage > 20.0, 20)
        },
    },
    VillageScheme {
        id: "gati-shakti",
        name: "PM Gati Shakti",
        ministry: "Ministry of Commerce & Industry",
        focus_area: "Multi-modal infrastructure planning",
        description: "Infrastructure development and planning",
        eligibility: |r| r.infrastructure_status < 6.0 || r.population > 5000.0,
        priority: |r| {
            pts(r.infrastructure_status < 5.0, 40)
                + pts(r.population > 5000.0, 40)
                + pts(r.employment_ratio < 70.0, 20)
        },
    },
    VillageScheme {
        id: "bamboo-mission",
        name: "National Bamboo Mission",
        ministry: "Ministry of Agriculture & Farmers’ Welfare",
        focus_area: "Bamboo plantations and NTFP-based livelihoods",
        description: "Promoting bamboo cultivation and industry",
        eligibility: |r| {
            matches!(
                r.bamboo_coverage,
                Some(BambooCoverage::Medium) | Some(BambooCoverage::High)
            )
        },
        priority: |r| {
            pts(r.bamboo_coverage == Some(BambooCoverage::High), 60)
                + pts(r.bamboo_coverage == Some(BambooCoverage::Medium), 40)
                + pts(r.st_percentage > 20.0, 20)
        },
    },
    VillageScheme {
        id: "van-dhan",
        name: "Van Dhan Yojana",
        ministry: "Ministry of Tribal Affairs",
        focus_area: "NTFP value chains",
        description: "Promoting tribal entrepreneurship through forest produce",
        eligibility: |r| or0(r.forest_cover_percentage) > 30.0 && r.st_percentage > 20.0,
        priority: |r| {
            pts(r.st_percentage > 30.0, 40)
                + pts(or0(r.forest_cover_percentage) > 40.0, 40)
                + pts(r.employment_ratio < 70.0, 20)
        },
    },
    VillageScheme {
        id: "solar-village",
        name: "Solar/RE Village Scheme",
        ministry: "Ministry of New & Renewable Energy",
        focus_area: "Renewable energy in rural areas",
        description: "Promoting solar energy in villages",
        eligibility: |r| {
            r.electrification_status != Some(Electrification::FullyElectrified)
                || r.population < 1000.0
        },
        priority: |r| {
            pts(r.electrification_status == Some(Electrification::NotElectrified), 60)
                + pts(r.electrification_status == Some(Electrification::Partial), 40)
                + pts(r.population < 1000.0, 30)
        },
    },
];

/// The full village rule table
pub fn catalog() -> &'static [VillageScheme] {
    SCHEMES
}

pub fn find(id: &str) -> Option<&'static VillageScheme> {
    SCHEMES.iter().find(|scheme| scheme.id == id)
}

pub fn recommend(resource: &ResourceFields, limit: usize) -> Vec<Scored<'static, VillageScheme>> {
    rank(
        SCHEMES,
        resource,
        |scheme, r| scheme.is_eligible(r),
        |scheme, r| scheme.priority(r),
        limit,
    )
}

/// Recommendations with the default limit
pub fn recommend_default(resource: &ResourceFields) -> Vec<Scored<'static, VillageScheme>> {
    recommend(resource, DEFAULT_LIMIT)
}
