//! Database schema initialization

use sqlx::SqlitePool;

use crate::error::Result;

/// Initialize the database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA_SQL)
        .execute(pool)
        .await?;

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Forest-land titles
CREATE TABLE IF NOT EXISTS pattas (
    id TEXT PRIMARY KEY,
    patta_number TEXT NOT NULL UNIQUE,
    holder_name TEXT NOT NULL,
    holder_father_name TEXT NOT NULL,
    holder_tribe TEXT NOT NULL,
    holder_category TEXT NOT NULL,
    village TEXT NOT NULL,
    district TEXT NOT NULL,
    state TEXT NOT NULL,
    -- GeoJSON point, stored as plain degrees
    longitude REAL NOT NULL,
    latitude REAL NOT NULL,
    survey_number TEXT NOT NULL,
    area_value REAL NOT NULL,
    area_unit TEXT NOT NULL DEFAULT 'hectares',
    boundary_north TEXT NOT NULL,
    boundary_south TEXT NOT NULL,
    boundary_east TEXT NOT NULL,
    boundary_west TEXT NOT NULL,
    -- JSON array of strings
    rights_json TEXT NOT NULL DEFAULT '[]',
    is_heritable INTEGER NOT NULL DEFAULT 0,
    is_transferable INTEGER NOT NULL DEFAULT 0,
    issued_authority TEXT NOT NULL,
    issued_designation TEXT NOT NULL,
    issued_date TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'active',
    -- JSON array of {name, url, uploadedAt}
    documents_json TEXT NOT NULL DEFAULT '[]',
    notes TEXT,
    created_by TEXT NOT NULL,
    last_updated_by TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_pattas_state ON pattas(state);
CREATE INDEX IF NOT EXISTS idx_pattas_district ON pattas(district);
CREATE INDEX IF NOT EXISTS idx_pattas_status ON pattas(status);
CREATE INDEX IF NOT EXISTS idx_pattas_holder_name ON pattas(holder_name);
CREATE INDEX IF NOT EXISTS idx_pattas_coordinates ON pattas(latitude, longitude);

-- Village demographic and infrastructure statistics
CREATE TABLE IF NOT EXISTS resources (
    id TEXT PRIMARY KEY,
    village TEXT NOT NULL,
    district TEXT NOT NULL,
    state TEXT NOT NULL,
    population REAL NOT NULL,
    longitude REAL NOT NULL,
    latitude REAL NOT NULL,
    st_percentage REAL NOT NULL,
    children_0_to_6 REAL,
    women_population REAL,
    infrastructure_status REAL NOT NULL,
    road_connectivity TEXT,
    distance_to_phc REAL,
    distance_to_school REAL,
    electrification_status TEXT,
    water_availability TEXT NOT NULL,
    food_availability TEXT NOT NULL,
    forest_cover_percentage REAL,
    bamboo_coverage TEXT,
    poverty_ratio REAL NOT NULL,
    literacy_rate REAL NOT NULL,
    employment_ratio REAL NOT NULL,
    housing_kutcha REAL NOT NULL DEFAULT 0,
    housing_semi_pacca REAL NOT NULL DEFAULT 0,
    housing_pacca REAL NOT NULL DEFAULT 0,
    school_dropout_rate REAL,
    malnutrition_rate REAL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),

    UNIQUE(village, district, state)
);

CREATE INDEX IF NOT EXISTS idx_resources_state ON resources(state);
CREATE INDEX IF NOT EXISTS idx_resources_district ON resources(district);
"#;
