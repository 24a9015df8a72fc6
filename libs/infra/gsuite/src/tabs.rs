// [libs/infra/gsuite/src/tabs.rs]
/*!
 * =================================================================
 * APARATO: SHEET SCHEMA REGISTRY (V4.4)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: CABECERAS CANÓNICAS Y COLUMNAS CLAVE POR PESTAÑA
 * =================================================================
 */

pub const VOYAGES_TAB: &str = "voyages";
pub const PASSENGERS_TAB: &str = "passengers";
pub const MEDIA_TAB: &str = "media";
pub const VOYAGE_PASSENGERS_TAB: &str = "voyage_passengers";
pub const VOYAGE_MEDIA_TAB: &str = "voyage_media";
pub const VOYAGE_PRESIDENTS_TAB: &str = "voyage_presidents";
pub const PRESIDENTS_TAB: &str = "presidents";
pub const INGEST_LOG_TAB: &str = "ingest_log";

pub const VOYAGES_HEADERS: &[&str] = &[
    "voyage_slug",
    "title",
    "start_date",
    "end_date",
    "start_time",
    "end_time",
    "origin",
    "destination",
    "vessel_name",
    "voyage_type",
    "summary_markdown",
    "notes_internal",
    "source_urls",
    "tags",
];

pub const PASSENGERS_HEADERS: &[&str] = &[
    "person_slug",
    "full_name",
    "role_title",
    "organization",
    "birth_year",
    "death_year",
    "wikipedia_url",
    "notes_internal",
    "tags",
];

pub const MEDIA_HEADERS: &[&str] = &[
    "media_slug",
    "title",
    "media_type",
    "s3_url",
    "public_derivative_url",
    "credit",
    "date",
    "description_markdown",
    "tags",
    "copyright_restrictions",
    // Enlace original retenido por trazabilidad curatorial; además es el
    // índice del move-on-rename.
    "google_drive_link",
    "voyage_slug",
];

pub const VOYAGE_PASSENGERS_HEADERS: &[&str] = &["voyage_slug", "person_slug", "capacity_role", "notes"];

pub const VOYAGE_MEDIA_HEADERS: &[&str] = &["voyage_slug", "media_slug", "sort_order", "notes"];

pub const VOYAGE_PRESIDENTS_HEADERS: &[&str] = &["voyage_slug", "president_slug", "notes"];

pub const PRESIDENTS_HEADERS: &[&str] =
    &["president_slug", "full_name", "party", "term_start", "term_end", "wikipedia_url", "tags"];

pub const INGEST_LOG_HEADERS: &[&str] = &[
    "timestamp",
    "doc_id",
    "voyage_slug",
    "status", // OK | WITH_WARNINGS | ERROR
    "errors_count",
    "warnings_count",
    "media_declared",
    "media_uploaded",
    "thumbs_uploaded",
    "sync_mode",
    "dry_run",
    "s3_deleted",
    "s3_archived",
    "sheets_deleted_vm",
    "sheets_deleted_vp",
    "db_deleted_vm",
    "db_deleted_vp",
    "db_deleted_media",
    "db_deleted_people",
    "notes",
];

/// Pestañas gestionadas, en el orden de aseguramiento.
pub const MANAGED_TABS: &[&str] = &[
    VOYAGES_TAB,
    PASSENGERS_TAB,
    MEDIA_TAB,
    VOYAGE_PASSENGERS_TAB,
    VOYAGE_MEDIA_TAB,
    VOYAGE_PRESIDENTS_TAB,
    PRESIDENTS_TAB,
    INGEST_LOG_TAB,
];

/// Cabecera canónica de una pestaña gestionada.
pub fn expected_headers(tab: &str) -> &'static [&'static str] {
    match tab {
        VOYAGES_TAB => VOYAGES_HEADERS,
        PASSENGERS_TAB => PASSENGERS_HEADERS,
        MEDIA_TAB => MEDIA_HEADERS,
        VOYAGE_PASSENGERS_TAB => VOYAGE_PASSENGERS_HEADERS,
        VOYAGE_MEDIA_TAB => VOYAGE_MEDIA_HEADERS,
        VOYAGE_PRESIDENTS_TAB => VOYAGE_PRESIDENTS_HEADERS,
        PRESIDENTS_TAB => PRESIDENTS_HEADERS,
        INGEST_LOG_TAB => INGEST_LOG_HEADERS,
        _ => &[],
    }
}

/// Columnas que componen la clave de negocio de la pestaña.
pub fn key_columns(tab: &str) -> &'static [&'static str] {
    match tab {
        VOYAGES_TAB => &["voyage_slug"],
        PASSENGERS_TAB => &["person_slug"],
        MEDIA_TAB => &["media_slug"],
        VOYAGE_PASSENGERS_TAB => &["voyage_slug", "person_slug"],
        VOYAGE_MEDIA_TAB => &["voyage_slug", "media_slug"],
        VOYAGE_PRESIDENTS_TAB => &["voyage_slug", "president_slug"],
        PRESIDENTS_TAB => &["president_slug"],
        _ => &[],
    }
}
