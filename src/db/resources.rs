//! Village resource database operations

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    Availability, BambooCoverage, Electrification, GeoJsonPoint, HousingType, Resource, ResourceFields,
    RoadConnectivity,
};

const DUPLICATE_RESOURCE: &str = "Resource with this village, district, and state already exists";

const RESOURCE_COLUMNS: &str = r#"
    id, village, district, state, population, longitude, latitude, st_percentage,
    children_0_to_6, women_population, infrastructure_status, road_connectivity,
    distance_to_phc, distance_to_school, electrification_status, water_availability,
    food_availability, forest_cover_percentage, bamboo_coverage, poverty_ratio,
    literacy_rate, employment_ratio, housing_kutcha, housing_semi_pacca, housing_pacca,
    school_dropout_rate, malnutrition_rate, created_at, updated_at
"#;

#[derive(Debug, Clone, sqlx::FromRow)]
struct ResourceRow {
    id: String,
    village: String,
    district: String,
    state: String,
    population: f64,
    longitude: f64,
    latitude: f64,
    st_percentage: f64,
    children_0_to_6: Option<f64>,
    women_population: Option<f64>,
    infrastructure_status: f64,
    road_connectivity: Option<String>,
    distance_to_phc: Option<f64>,
    distance_to_school: Option<f64>,
    electrification_status: Option<String>,
    water_availability: String,
    food_availability: String,
    forest_cover_percentage: Option<f64>,
    bamboo_coverage: Option<String>,
    poverty_ratio: f64,
    literacy_rate: f64,
    employment_ratio: f64,
    housing_kutcha: f64,
    housing_semi_pacca: f64,
    housing_pacca: f64,
    school_dropout_rate: Option<f64>,
    malnutrition_rate: Option<f64>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ResourceRow> for Resource {
    type Error = AppError;

    fn try_from(row: ResourceRow) -> Result<Self> {
        let id = row.id;
        let corrupt =
            |column: &str, value: &str| AppError::Internal(format!("Resource {} has invalid {}: {}", id, column, value));

        fn optional<T>(
            value: Option<String>,
            parse: fn(&str) -> Option<T>,
            on_err: impl Fn(&str) -> AppError,
        ) -> Result<Option<T>> {
            value.map(|v| parse(&v).ok_or_else(|| on_err(&v))).transpose()
        }

        let water_availability = Availability::parse(&row.water_availability)
            .ok_or_else(|| corrupt("water_availability", &row.water_availability))?;
        let food_availability = Availability::parse(&row.food_availability)
            .ok_or_else(|| corrupt("food_availability", &row.food_availability))?;
        let road_connectivity = optional(row.road_connectivity, RoadConnectivity::parse, |v| {
            corrupt("road_connectivity", v)
        })?;
        let electrification_status = optional(row.electrification_status, Electrification::parse, |v| {
            corrupt("electrification_status", v)
        })?;
        let bamboo_coverage = optional(row.bamboo_coverage, BambooCoverage::parse, |v| {
            corrupt("bamboo_coverage", v)
        })?;

        Ok(Resource {
            fields: ResourceFields {
                village: row.village,
                district: row.district,
                state: row.state,
                population: row.population,
                location: GeoJsonPoint::new(row.longitude, row.latitude),
                st_percentage: row.st_percentage,
                children0to6: row.children_0_to_6,
                women_population: row.women_population,
                infrastructure_status: row.infrastructure_status,
                road_connectivity,
                distance_to_phc: row.distance_to_phc,
                distance_to_school: row.distance_to_school,
                electrification_status,
                water_availability,
                food_availability,
                forest_cover_percentage: row.forest_cover_percentage,
                bamboo_coverage,
                poverty_ratio: row.poverty_ratio,
                literacy_rate: row.literacy_rate,
                employment_ratio: row.employment_ratio,
                housing_type: HousingType {
                    kutcha: row.housing_kutcha,
                    semi_pacca: row.housing_semi_pacca,
                    pacca: row.housing_pacca,
                },
                school_dropout_rate: row.school_dropout_rate,
                malnutrition_rate: row.malnutrition_rate,
            },
            id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Aggregation level for resource statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsLevel {
    State,
    District,
    Village,
}

impl StatsLevel {
    /// Narrowest level implied by the filters: a district groups by village,
    /// a state by district, nothing by state.
    pub fn for_filters(state: Option<&str>, district: Option<&str>) -> Self {
        match (state, district) {
            (_, Some(_)) => StatsLevel::Village,
            (Some(_), None) => StatsLevel::District,
            (None, None) => StatsLevel::State,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            StatsLevel::State => "state",
            StatsLevel::District => "district",
            StatsLevel::Village => "village",
        }
    }
}

/// One aggregated group
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ResourceStats {
    #[serde(rename = "_id")]
    pub group: String,
    #[serde(rename = "totalPopulation")]
    pub total_population: f64,
    #[serde(rename = "avgSTPercentage")]
    pub avg_st_percentage: f64,
    #[serde(rename = "avgInfrastructure")]
    pub avg_infrastructure: f64,
    #[serde(rename = "avgPovertyRatio")]
    pub avg_poverty_ratio: f64,
    #[serde(rename = "avgLiteracyRate")]
    pub avg_literacy_rate: f64,
    #[serde(rename = "avgEmploymentRatio")]
    pub avg_employment_ratio: f64,
    pub count: i64,
}

/// Resource repository
pub struct ResourceRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ResourceRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: &str) -> Result<Option<Resource>> {
        let row = sqlx::query_as::<_, ResourceRow>(&format!(
            "SELECT {} FROM resources WHERE id = ?",
            RESOURCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Resource::try_from).transpose()
    }

    /// List resources, optionally filtered, ordered by state, district, village
    pub async fn list(&self, state: Option<&str>, district: Option<&str>) -> Result<Vec<Resource>> {
        let rows = sqlx::query_as::<_, ResourceRow>(&format!(
            r#"
            SELECT {}
            FROM resources
            WHERE (?1 IS NULL OR state = ?1) AND (?2 IS NULL OR district = ?2)
            ORDER BY state ASC, district ASC, village ASC
            "#,
            RESOURCE_COLUMNS
        ))
        .bind(state)
        .bind(district)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Resource::try_from).collect()
    }

    /// Whether any resource has been stored yet
    pub async fn is_empty(&self) -> Result<bool> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM resources")
            .fetch_one(self.pool)
            .await?;
        Ok(result.0 == 0)
    }

    /// Aggregate statistics grouped at the level implied by the filters
    pub async fn stats(&self, state: Option<&str>, district: Option<&str>) -> Result<Vec<ResourceStats>> {
        let column = StatsLevel::for_filters(state, district).column();

        let stats = sqlx::query_as::<_, ResourceStats>(&format!(
            r#"
            SELECT
                {col} AS "group",
                SUM(population) AS total_population,
                AVG(st_percentage) AS avg_st_percentage,
                AVG(infrastructure_status) AS avg_infrastructure,
                AVG(poverty_ratio) AS avg_poverty_ratio,
                AVG(literacy_rate) AS avg_literacy_rate,
                AVG(employment_ratio) AS avg_employment_ratio,
                COUNT(*) AS count
            FROM resources
            WHERE (?1 IS NULL OR state = ?1) AND (?2 IS NULL OR district = ?2)
            GROUP BY {col}
            ORDER BY {col} ASC
            "#,
            col = column
        ))
        .bind(state)
        .bind(district)
        .fetch_all(self.pool)
        .await?;

        Ok(stats)
    }

    pub async fn create(&self, fields: &ResourceFields) -> Result<Resource> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(&format!(
            r#"
            INSERT INTO resources ({})
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            RESOURCE_COLUMNS
        ))
        .bind(&id)
        .bind(&fields.village)
        .bind(&fields.district)
        .bind(&fields.state)
        .bind(fields.population)
        .bind(fields.location.lon())
        .bind(fields.location.lat())
        .bind(fields.st_percentage)
        .bind(fields.children0to6)
        .bind(fields.women_population)
        .bind(fields.infrastructure_status)
        .bind(fields.road_connectivity.map(|v| v.as_str()))
        .bind(fields.distance_to_phc)
        .bind(fields.distance_to_school)
        .bind(fields.electrification_status.map(|v| v.as_str()))
        .bind(fields.water_availability.as_str())
        .bind(fields.food_availability.as_str())
        .bind(fields.forest_cover_percentage)
        .bind(fields.bamboo_coverage.map(|v| v.as_str()))
        .bind(fields.poverty_ratio)
        .bind(fields.literacy_rate)
        .bind(fields.employment_ratio)
        .bind(fields.housing_type.kutcha)
        .bind(fields.housing_type.semi_pacca)
        .bind(fields.housing_type.pacca)
        .bind(fields.school_dropout_rate)
        .bind(fields.malnutrition_rate)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await
        .map_err(|e| AppError::on_unique_violation(e, DUPLICATE_RESOURCE, None))?;

        tracing::debug!("Created resource {}/{}/{} ({})", fields.state, fields.district, fields.village, id);

        self.get(&id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to fetch created resource".to_string()))
    }

    /// Write back the updatable figures of a resource
    pub async fn update(&self, id: &str, fields: &ResourceFields) -> Result<Option<Resource>> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            UPDATE resources SET
                population = ?, st_percentage = ?, infrastructure_status = ?,
                water_availability = ?, food_availability = ?, poverty_ratio = ?,
                literacy_rate = ?, employment_ratio = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(fields.population)
        .bind(fields.st_percentage)
        .bind(fields.infrastructure_status)
        .bind(fields.water_availability.as_str())
        .bind(fields.food_availability.as_str())
        .bind(fields.poverty_ratio)
        .bind(fields.literacy_rate)
        .bind(fields.employment_ratio)
        .bind(&now)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM resources WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
