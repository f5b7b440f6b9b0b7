//! Patta database operations

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::geo::{haversine_m, BoundingBox, GeoPoint};
use crate::models::{
    Area, AreaUnit, Boundaries, GeoJsonPoint, Holder, HolderCategory, IssuedBy, Patta, PattaDocument,
    PattaFields, PattaLocation, PattaStatus,
};

const DUPLICATE_PATTA: &str = "Duplicate patta number";

const PATTA_COLUMNS: &str = r#"
    id, patta_number, holder_name, holder_father_name, holder_tribe, holder_category,
    village, district, state, longitude, latitude, survey_number, area_value, area_unit,
    boundary_north, boundary_south, boundary_east, boundary_west, rights_json,
    is_heritable, is_transferable, issued_authority, issued_designation, issued_date,
    status, documents_json, notes, created_by, last_updated_by, created_at, updated_at
"#;

/// Flat row as stored in SQLite
#[derive(Debug, Clone, sqlx::FromRow)]
struct PattaRow {
    id: String,
    patta_number: String,
    holder_name: String,
    holder_father_name: String,
    holder_tribe: String,
    holder_category: String,
    village: String,
    district: String,
    state: String,
    longitude: f64,
    latitude: f64,
    survey_number: String,
    area_value: f64,
    area_unit: String,
    boundary_north: String,
    boundary_south: String,
    boundary_east: String,
    boundary_west: String,
    rights_json: String,
    is_heritable: bool,
    is_transferable: bool,
    issued_authority: String,
    issued_designation: String,
    issued_date: String,
    status: String,
    documents_json: String,
    notes: Option<String>,
    created_by: String,
    last_updated_by: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<PattaRow> for Patta {
    type Error = AppError;

    fn try_from(row: PattaRow) -> Result<Self> {
        let corrupt = |column: &str, value: &str| {
            AppError::Internal(format!("Patta {} has invalid {}: {}", row.id, column, value))
        };

        let category = HolderCategory::parse(&row.holder_category)
            .ok_or_else(|| corrupt("holder_category", &row.holder_category))?;
        let unit = AreaUnit::parse(&row.area_unit).ok_or_else(|| corrupt("area_unit", &row.area_unit))?;
        let status = PattaStatus::parse(&row.status).ok_or_else(|| corrupt("status", &row.status))?;
        let date = NaiveDate::parse_from_str(&row.issued_date, "%Y-%m-%d")
            .map_err(|_| corrupt("issued_date", &row.issued_date))?;
        let rights: Vec<String> = serde_json::from_str(&row.rights_json)?;
        let documents: Vec<PattaDocument> = serde_json::from_str(&row.documents_json)?;

        Ok(Patta {
            id: row.id,
            fields: PattaFields {
                patta_number: row.patta_number,
                holder: Holder {
                    name: row.holder_name,
                    father_name: row.holder_father_name,
                    tribe: row.holder_tribe,
                    category,
                },
                location: PattaLocation {
                    village: row.village,
                    district: row.district,
                    state: row.state,
                    coordinates: GeoJsonPoint::new(row.longitude, row.latitude),
                    survey_number: row.survey_number,
                    area: Area {
                        value: row.area_value,
                        unit,
                    },
                    boundaries: Boundaries {
                        north: row.boundary_north,
                        south: row.boundary_south,
                        east: row.boundary_east,
                        west: row.boundary_west,
                    },
                },
                rights,
                is_heritable: row.is_heritable,
                is_transferable: row.is_transferable,
                issued_by: IssuedBy {
                    authority: row.issued_authority,
                    designation: row.issued_designation,
                    date,
                },
                status,
                documents,
                notes: row.notes,
            },
            created_by: row.created_by,
            last_updated_by: row.last_updated_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_pattas(rows: Vec<PattaRow>) -> Result<Vec<Patta>> {
    rows.into_iter().map(Patta::try_from).collect()
}

/// Listing filters for `GET /api/pattas`
#[derive(Debug, Default, Clone)]
pub struct PattaQuery {
    pub state: Option<String>,
    pub district: Option<String>,
    pub status: Option<PattaStatus>,
    /// Case-insensitive substring over number, holder, village, district, state and survey number
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Patta with its distance from a search center
#[derive(Debug, Clone)]
pub struct NearbyPatta {
    pub patta: Patta,
    pub distance_m: f64,
}

/// Patta repository
pub struct PattaRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PattaRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a specific patta
    pub async fn get(&self, id: &str) -> Result<Option<Patta>> {
        let row = sqlx::query_as::<_, PattaRow>(&format!(
            "SELECT {} FROM pattas WHERE id = ?",
            PATTA_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Patta::try_from).transpose()
    }

    /// List pattas matching the query, ordered by holder name
    pub async fn list(&self, query: &PattaQuery) -> Result<Vec<Patta>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM pattas
            WHERE {}
            ORDER BY holder_name ASC, patta_number ASC
            LIMIT ?5 OFFSET ?6
            "#,
            PATTA_COLUMNS, FILTER_SQL
        );

        let rows = sqlx::query_as::<_, PattaRow>(&sql)
            .bind(&query.state)
            .bind(&query.district)
            .bind(query.status.map(|s| s.as_str()))
            .bind(query.search.as_deref().map(super::like_pattern))
            .bind(query.limit.unwrap_or(-1))
            .bind(query.offset.unwrap_or(0))
            .fetch_all(self.pool)
            .await?;

        into_pattas(rows)
    }

    /// Count pattas matching the query filters (limit and offset ignored)
    pub async fn count(&self, query: &PattaQuery) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM pattas WHERE {}", FILTER_SQL);

        let result: (i64,) = sqlx::query_as(&sql)
            .bind(&query.state)
            .bind(&query.district)
            .bind(query.status.map(|s| s.as_str()))
            .bind(query.search.as_deref().map(super::like_pattern))
            .fetch_one(self.pool)
            .await?;

        Ok(result.0)
    }

    /// All pattas in a state, ordered by holder name
    pub async fn list_by_state(&self, state: &str) -> Result<Vec<Patta>> {
        self.list(&PattaQuery {
            state: Some(state.to_string()),
            ..Default::default()
        })
        .await
    }

    /// Pattas within `radius_m` metres of `center`, nearest first
    pub async fn near(&self, center: GeoPoint, radius_m: f64) -> Result<Vec<NearbyPatta>> {
        let bbox = BoundingBox::around(center, radius_m);
        let (min_lon, max_lon) = if bbox.crosses_antimeridian() {
            (-180.0, 180.0)
        } else {
            (bbox.min_lon, bbox.max_lon)
        };

        let rows = sqlx::query_as::<_, PattaRow>(&format!(
            r#"
            SELECT {}
            FROM pattas
            WHERE latitude BETWEEN ? AND ? AND longitude BETWEEN ? AND ?
            "#,
            PATTA_COLUMNS
        ))
        .bind(bbox.min_lat)
        .bind(bbox.max_lat)
        .bind(min_lon)
        .bind(max_lon)
        .fetch_all(self.pool)
        .await?;

        let mut nearby: Vec<NearbyPatta> = into_pattas(rows)?
            .into_iter()
            .filter_map(|patta| {
                let coords = &patta.fields.location.coordinates;
                let distance_m = haversine_m(center, GeoPoint::new(coords.lon(), coords.lat()));
                (distance_m <= radius_m).then_some(NearbyPatta { patta, distance_m })
            })
            .collect();

        nearby.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        Ok(nearby)
    }

    /// Create a new patta
    pub async fn create(&self, fields: &PattaFields, created_by: &str) -> Result<Patta> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(&format!(
            r#"
            INSERT INTO pattas ({})
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            PATTA_COLUMNS
        ))
        .bind(&id)
        .bind(&fields.patta_number)
        .bind(&fields.holder.name)
        .bind(&fields.holder.father_name)
        .bind(&fields.holder.tribe)
        .bind(fields.holder.category.as_str())
        .bind(&fields.location.village)
        .bind(&fields.location.district)
        .bind(&fields.location.state)
        .bind(fields.location.coordinates.lon())
        .bind(fields.location.coordinates.lat())
        .bind(&fields.location.survey_number)
        .bind(fields.location.area.value)
        .bind(fields.location.area.unit.as_str())
        .bind(&fields.location.boundaries.north)
        .bind(&fields.location.boundaries.south)
        .bind(&fields.location.boundaries.east)
        .bind(&fields.location.boundaries.west)
        .bind(serde_json::to_string(&fields.rights)?)
        .bind(fields.is_heritable)
        .bind(fields.is_transferable)
        .bind(&fields.issued_by.authority)
        .bind(&fields.issued_by.designation)
        .bind(fields.issued_by.date.format("%Y-%m-%d").to_string())
        .bind(fields.status.as_str())
        .bind(serde_json::to_string(&fields.documents)?)
        .bind(&fields.notes)
        .bind(created_by)
        .bind(None::<String>)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await
        .map_err(|e| AppError::on_unique_violation(e, DUPLICATE_PATTA, Some("pattaNumber")))?;

        tracing::debug!("Created patta {} ({})", fields.patta_number, id);

        self.get(&id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to fetch created patta".to_string()))
    }

    /// Replace the content of a patta
    pub async fn update(&self, id: &str, fields: &PattaFields, updated_by: &str) -> Result<Option<Patta>> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            UPDATE pattas SET
                patta_number = ?, holder_name = ?, holder_father_name = ?, holder_tribe = ?,
                holder_category = ?, village = ?, district = ?, state = ?, longitude = ?,
                latitude = ?, survey_number = ?, area_value = ?, area_unit = ?,
                boundary_north = ?, boundary_south = ?, boundary_east = ?, boundary_west = ?,
                rights_json = ?, is_heritable = ?, is_transferable = ?, issued_authority = ?,
                issued_designation = ?, issued_date = ?, status = ?, documents_json = ?,
                notes = ?, last_updated_by = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.patta_number)
        .bind(&fields.holder.name)
        .bind(&fields.holder.father_name)
        .bind(&fields.holder.tribe)
        .bind(fields.holder.category.as_str())
        .bind(&fields.location.village)
        .bind(&fields.location.district)
        .bind(&fields.location.state)
        .bind(fields.location.coordinates.lon())
        .bind(fields.location.coordinates.lat())
        .bind(&fields.location.survey_number)
        .bind(fields.location.area.value)
        .bind(fields.location.area.unit.as_str())
        .bind(&fields.location.boundaries.north)
        .bind(&fields.location.boundaries.south)
        .bind(&fields.location.boundaries.east)
        .bind(&fields.location.boundaries.west)
        .bind(serde_json::to_string(&fields.rights)?)
        .bind(fields.is_heritable)
        .bind(fields.is_transferable)
        .bind(&fields.issued_by.authority)
        .bind(&fields.issued_by.designation)
        .bind(fields.issued_by.date.format("%Y-%m-%d").to_string())
        .bind(fields.status.as_str())
        .bind(serde_json::to_string(&fields.documents)?)
        .bind(&fields.notes)
        .bind(updated_by)
        .bind(&now)
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| AppError::on_unique_violation(e, DUPLICATE_PATTA, Some("pattaNumber")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    /// Delete a patta
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM pattas WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Shared WHERE clause; parameters ?1..?4 are state, district, status and search pattern
const FILTER_SQL: &str = r#"
    (?1 IS NULL OR state = ?1)
    AND (?2 IS NULL OR district = ?2)
    AND (?3 IS NULL OR status = ?3)
    AND (?4 IS NULL
         OR patta_number LIKE ?4 ESCAPE '\'
         OR holder_name LIKE ?4 ESCAPE '\'
         OR holder_father_name LIKE ?4 ESCAPE '\'
         OR holder_tribe LIKE ?4 ESCAPE '\'
         OR village LIKE ?4 ESCAPE '\'
         OR district LIKE ?4 ESCAPE '\'
         OR state LIKE ?4 ESCAPE '\'
         OR survey_number LIKE ?4 ESCAPE '\')
"#;
