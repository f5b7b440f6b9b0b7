//! Sample data for fresh databases
//!
//! Pattas come from a fixed list of titles. Resources are generated for five
//! districts in each of four states, three villages per district, with
//! figures spread deterministically over plausible ranges.

use serde_json::{json, Value};
use sqlx::SqlitePool;

use super::{PattaQuery, PattaRepository, ResourceRepository};
use crate::error::Result;
use crate::models::{PattaDraft, ResourceDraft, SYSTEM_USER_ID};

const VILLAGES_PER_DISTRICT: usize = 3;

struct StateSample {
    name: &'static str,
    districts: [&'static str; 5],
    /// `[min_lon, min_lat, max_lon, max_lat]`
    bounds: [f64; 4],
}

const STATES: &[StateSample] = &[
    StateSample {
        name: "Odisha",
        districts: ["Gajapati", "Kandhamal", "Rayagada", "Koraput", "Malkangiri"],
        bounds: [81.5, 17.5, 87.5, 22.5],
    },
    StateSample {
        name: "Madhya Pradesh",
        districts: ["Alirajpur", "Barwani", "Dhar", "Jhabua", "Mandla"],
        bounds: [74.0, 21.0, 82.5, 26.5],
    },
    StateSample {
        name: "Telangana",
        districts: ["Adilabad", "Kumram Bheem", "Mahabubabad", "Bhadradri Kothagudem", "Mancherial"],
        bounds: [77.0, 15.5, 81.5, 19.5],
    },
    StateSample {
        name: "Tripura",
        districts: ["Dhalai", "Gomati", "Khowai", "North Tripura", "South Tripura"],
        bounds: [91.0, 22.5, 92.5, 24.5],
    },
];

/// Insert sample pattas and resources into whichever tables are empty.
pub async fn seed_sample_data(pool: &SqlitePool) -> Result<()> {
    let pattas = PattaRepository::new(pool);
    if pattas.count(&PattaQuery::default()).await? == 0 {
        let samples = sample_pattas();
        for body in &samples {
            let fields = PattaDraft::from_json(body.clone())?.validate()?;
            pattas.create(&fields, SYSTEM_USER_ID).await?;
        }
        tracing::info!("Seeded {} sample pattas", samples.len());
    } else {
        tracing::debug!("Pattas table not empty, skipping patta seed");
    }

    let resources = ResourceRepository::new(pool);
    if resources.is_empty().await? {
        let samples = sample_resources();
        for body in &samples {
            let fields = ResourceDraft::from_json(body.clone())?.validate()?;
            resources.create(&fields).await?;
        }
        tracing::info!("Seeded {} sample resources", samples.len());
    } else {
        tracing::debug!("Resources table not empty, skipping resource seed");
    }

    Ok(())
}

fn sample_pattas() -> Vec<Value> {
    vec![
        json!({
            "pattaNumber": "P/MP/2023/001",
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
                    "north": "Road",
                    "south": "Stream",
                    "east": "Neighbor: Ramesh Patel",
                    "west": "Forest boundary"
                }
            },
            "rights": ["Right to cultivate", "Right to collect minor forest produce"],
            "isHeritable": true,
            "isTransferable": false,
            "issuedBy": {
                "authority": "Forest Department",
                "designation": "Deputy Conservator of Forests",
                "date": "2023-01-15"
            },
            "status": "active",
            "documents": [{ "name": "Land Record", "url": "https://example.com/documents/land1.pdf" }],
            "notes": "Land near the main road with good water source."
        }),
        json!({
            "pattaNumber": "P/MP/2023/002",
            "holder": {
                "name": "Sunita Bai",
                "fatherName": "Ram Singh",
                "tribe": "Baiga",
                "category": "Scheduled Tribe"
            },
            "location": {
                "village": "Dindori",
                "district": "Dindori",
                "state": "Madhya Pradesh",
                "coordinates": { "type": "Point", "coordinates": [81.0754, 22.943] },
                "surveyNumber": "12/7",
                "area": { "value": 1.75, "unit": "acres" },
                "boundaries": {
                    "north": "Hills",
                    "south": "Village road",
                    "east": "Neighbor: Ganesh Yadav",
                    "west": "Stream"
                }
            },
            "rights": ["Right to cultivate", "Right to graze cattle"],
            "isHeritable": true,
            "isTransferable": false,
            "issuedBy": {
                "authority": "Forest Department",
                "designation": "Deputy Conservator of Forests",
                "date": "2023-02-20"
            },
            "status": "active",
            "documents": [{ "name": "Land Record", "url": "https://example.com/documents/land2.pdf" }],
            "notes": "Hilly terrain with some forest cover."
        }),
        json!({
            "pattaNumber": "P/OD/2023/001",
            "holder": {
                "name": "Lakshman Majhi",
                "fatherName": "Biswanath Majhi",
                "tribe": "Santal",
                "category": "Scheduled Tribe"
            },
            "location": {
                "village": "Karanjia",
                "district": "Mayurbhanj",
                "state": "Odisha",
                "coordinates": { "type": "Point", "coordinates": [86.3379, 21.4927] },
                "surveyNumber": "89/15",
                "area": { "value": 3.2, "unit": "acres" },
                "boundaries": {
                    "north": "Paddy fields",
                    "south": "Forest area",
                    "east": "Neighbor: Harijan Sahoo",
                    "west": "Government land"
                }
            },
            "rights": [
                "Right to cultivate",
                "Right to collect minor forest produce",
                "Right to fish in nearby water body"
            ],
            "isHeritable": true,
            "isTransferable": true,
            "issuedBy": {
                "authority": "Revenue Department",
                "designation": "Tahsildar",
                "date": "2023-03-10"
            },
            "status": "active",
            "documents": [
                { "name": "Land Record", "url": "https://example.com/documents/land3.pdf" },
                { "name": "Identity Proof", "url": "https://example.com/documents/id3.pdf" }
            ],
            "notes": "Fertile land near water source."
        }),
    ]
}

/// Spread `step` (out of `steps`) over `[min, max]`, rounded to one decimal.
fn spread(step: usize, steps: usize, min: f64, max: f64) -> f64 {
    let t = (step % steps) as f64 / (steps - 1).max(1) as f64;
    ((min + (max - min) * t) * 10.0).round() / 10.0
}

fn pick<T: Copy>(choices: &[T], n: usize) -> T {
    choices[n % choices.len()]
}

fn sample_resources() -> Vec<Value> {
    let mut resources = Vec::new();
    let mut n = 0usize;

    for state in STATES {
        let [min_lon, min_lat, max_lon, max_lat] = state.bounds;
        for district in state.districts {
            for village in 1..=VILLAGES_PER_DISTRICT {
                // Co-prime strides so the figures don't move in lockstep
                let population = 500.0 + ((n * 617) % 9500) as f64;
                let kutcha = spread(n * 3, 7, 10.0, 60.0).round();
                let semi_pacca = spread(n * 5, 7, 10.0, 30.0).round();

                resources.push(json!({
                    "village": format!("Village {}{}", village, pick(&['A', 'B', 'C'], n)),
                    "district": district,
                    "state": state.name,
                    "location": {
                        "type": "Point",
                        "coordinates": [
                            spread(n * 7, 11, min_lon, max_lon),
                            spread(n * 5, 13, min_lat, max_lat)
                        ]
                    },
                    "population": population,
                    "stPercentage": spread(n * 7, 17, 5.0, 95.0),
                    "children0to6": (population * 0.12).round(),
                    "womenPopulation": (population * 0.5).round(),
                    "infrastructureStatus": spread(n * 3, 8, 2.0, 9.0).round(),
                    "roadConnectivity": pick(&["None", "Kaccha", "Pacca", "Highway"], n),
                    "distanceToPHC": spread(n * 5, 9, 1.0, 30.0),
                    "distanceToSchool": spread(n * 3, 7, 0.5, 10.0),
                    "electrificationStatus": pick(&["Not Electrified", "Partial", "Fully Electrified"], n + 1),
                    "waterAvailability": pick(&["Low", "Medium", "High"], n),
                    "foodAvailability": pick(&["Low", "Medium", "High"], n / 3),
                    "forestCoverPercentage": spread(n * 11, 13, 0.0, 80.0),
                    "bambooCoverage": pick(&["None", "Low", "Medium", "High"], n + 2),
                    "povertyRatio": spread(n * 5, 11, 5.0, 70.0),
                    "literacyRate": spread(n * 7, 9, 30.0, 95.0),
                    "employmentRatio": spread(n * 3, 10, 30.0, 90.0),
                    "housingType": {
                        "kutcha": kutcha,
                        "semiPacca": semi_pacca,
                        "pacca": 100.0 - kutcha - semi_pacca
                    },
                    "schoolDropoutRate": spread(n * 9, 10, 1.0, 40.0),
                    "malnutritionRate": spread(n * 4, 9, 1.0, 50.0)
                }));
                n += 1;
            }
        }
    }

    resources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    #[test]
    fn test_sample_resources_validate() {
        let samples = sample_resources();
        assert_eq!(samples.len(), STATES.len() * 5 * VILLAGES_PER_DISTRICT);
        for body in samples {
            ResourceDraft::from_json(body).unwrap().validate().unwrap();
        }
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = create_memory_pool().await.unwrap();

        seed_sample_data(&pool).await.unwrap();
        seed_sample_data(&pool).await.unwrap();

        let pattas = PattaRepository::new(&pool);
        assert_eq!(pattas.count(&PattaQuery::default()).await.unwrap(), 3);
        let resources = ResourceRepository::new(&pool).list(None, None).await.unwrap();
        assert_eq!(resources.len(), 60);
    }
}
