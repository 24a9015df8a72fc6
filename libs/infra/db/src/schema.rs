// [libs/infra/db/src/schema.rs]
/*!
 * =================================================================
 * APARATO: ARCHIVE SCHEMA BOOTSTRAP (V4.8 - IDEMPOTENT)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: GOBERNANZA ESTRUCTURAL DEL ARCHIVO DE VOYAGES
 *
 * # Logic:
 * `source_urls` persiste como arreglo JSON en TEXT (libSQL carece de
 * text[]). Las tablas join llevan clave primaria compuesta; la columna
 * derivada voyages.president_slug sostiene el guard anti-huérfanos del
 * reset presidencial.
 * =================================================================
 */

use libsql::Connection;
use tracing::{debug, info};

use crate::errors::DbError;

/// Entidades base del archivo, aplicadas en orden y de forma idempotente.
const ARCHIVE_TABLES: &[(&str, &str)] = &[
    (
        "TABLE_PRESIDENTS",
        r#"
        CREATE TABLE IF NOT EXISTS presidents (
            president_slug  TEXT PRIMARY KEY,
            full_name       TEXT NOT NULL,
            party           TEXT,
            term_start      TEXT,
            term_end        TEXT,
            wikipedia_url   TEXT,
            tags            TEXT
        );
    "#,
    ),
    (
        "TABLE_VOYAGES",
        r#"
        CREATE TABLE IF NOT EXISTS voyages (
            voyage_slug       TEXT PRIMARY KEY,
            title             TEXT,
            start_date        TEXT,
            end_date          TEXT,
            start_time        TEXT,
            end_time          TEXT,
            origin            TEXT,
            destination       TEXT,
            vessel_name       TEXT,
            voyage_type       TEXT,
            summary_markdown  TEXT,
            source_urls       TEXT,
            tags              TEXT,
            president_slug    TEXT
        );
    "#,
    ),
    (
        "TABLE_PEOPLE",
        r#"
        CREATE TABLE IF NOT EXISTS people (
            person_slug     TEXT PRIMARY KEY,
            full_name       TEXT,
            role_title      TEXT,
            organization    TEXT,
            birth_year      INTEGER,
            death_year      INTEGER,
            wikipedia_url   TEXT,
            notes_internal  TEXT,
            tags            TEXT
        );
    "#,
    ),
    (
        "TABLE_MEDIA",
        r#"
        CREATE TABLE IF NOT EXISTS media (
            media_slug             TEXT PRIMARY KEY,
            title                  TEXT,
            media_type             TEXT,
            s3_url                 TEXT,
            public_derivative_url  TEXT,
            credit                 TEXT,
            date                   TEXT,
            description_markdown   TEXT,
            tags                   TEXT,
            google_drive_link      TEXT
        );
    "#,
    ),
    (
        "TABLE_VOYAGE_PASSENGERS",
        r#"
        CREATE TABLE IF NOT EXISTS voyage_passengers (
            voyage_slug    TEXT NOT NULL,
            person_slug    TEXT NOT NULL,
            capacity_role  TEXT,
            notes          TEXT,
            PRIMARY KEY (voyage_slug, person_slug)
        );
    "#,
    ),
    (
        "TABLE_VOYAGE_MEDIA",
        r#"
        CREATE TABLE IF NOT EXISTS voyage_media (
            voyage_slug  TEXT NOT NULL,
            media_slug   TEXT NOT NULL,
            sort_order   INTEGER,
            notes        TEXT,
            PRIMARY KEY (voyage_slug, media_slug)
        );
    "#,
    ),
];

/// Índices de aceleración para el guard presidencial y el índice de enlaces.
const ARCHIVE_INDICES: &[(&str, &str)] = &[
    ("IDX_VOYAGES_PRESIDENT", "CREATE INDEX IF NOT EXISTS idx_voyages_president ON voyages (president_slug);"),
    ("IDX_MEDIA_LINK", "CREATE INDEX IF NOT EXISTS idx_media_link ON media (google_drive_link);"),
];

/// Aplica el esquema completo del archivo de forma idempotente.
pub async fn apply_archive_schema(connection: &Connection) -> Result<(), DbError> {
    for (label, sql) in ARCHIVE_TABLES.iter().chain(ARCHIVE_INDICES) {
        debug!("🏗️ [DATABASE]: Ensuring {label}");
        connection.execute(sql, ()).await?;
    }
    info!("🏗️ [DATABASE]: Archive schema verified ({} objects)", ARCHIVE_TABLES.len() + ARCHIVE_INDICES.len());
    Ok(())
}
