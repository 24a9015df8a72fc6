// [libs/infra/gsuite/src/rows.rs]
/*!
 * =================================================================
 * APARATO: SHEET ROW PROJECTIONS (V4.4)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: PROYECCIÓN DE ENTIDADES DE DOMINIO A FILAS DE PLANILLA
 * =================================================================
 */

use sequoia_domain_models::{MediaItem, MediaUploadOutcome, Person, President, Voyage};

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Registro de planilla: pares `(columna, valor)` alineables a la cabecera.
pub type SheetRecord = Vec<(&'static str, String)>;

pub fn voyage_record(voyage: &Voyage) -> SheetRecord {
    vec![
        ("voyage_slug", voyage.voyage_slug.clone()),
        ("title", voyage.title.clone()),
        ("start_date", voyage.start_date.clone()),
        ("end_date", opt(&voyage.end_date)),
        ("start_time", opt(&voyage.start_time)),
        ("end_time", opt(&voyage.end_time)),
        ("origin", opt(&voyage.origin)),
        ("destination", opt(&voyage.destination)),
        ("vessel_name", opt(&voyage.vessel_name)),
        ("voyage_type", opt(&voyage.voyage_type)),
        ("summary_markdown", opt(&voyage.summary_markdown)),
        ("source_urls", voyage.source_urls.join(", ")),
        ("tags", opt(&voyage.tags)),
    ]
}

pub fn passenger_record(person: &Person) -> SheetRecord {
    vec![
        ("person_slug", person.person_slug.clone()),
        ("full_name", opt(&person.full_name)),
        ("role_title", opt(&person.role_title)),
        ("organization", opt(&person.organization)),
        ("birth_year", opt(&person.birth_year)),
        ("death_year", opt(&person.death_year)),
        ("wikipedia_url", opt(&person.wikipedia_url)),
        ("notes_internal", opt(&person.notes_internal)),
        ("tags", opt(&person.tags)),
    ]
}

pub fn media_record(item: &MediaItem, voyage_slug: &str, outcome: &MediaUploadOutcome) -> SheetRecord {
    vec![
        ("media_slug", item.media_slug.clone()),
        ("title", opt(&item.title)),
        ("media_type", opt(&item.media_type)),
        ("s3_url", outcome.s3_url.clone().unwrap_or_default()),
        ("public_derivative_url", outcome.public_derivative_url.clone().unwrap_or_default()),
        ("credit", item.credit.clone()),
        ("date", item.date.clone()),
        ("description_markdown", opt(&item.description_markdown)),
        ("tags", opt(&item.tags)),
        ("copyright_restrictions", opt(&item.copyright_restrictions)),
        ("google_drive_link", item.google_drive_link.clone()),
        ("voyage_slug", voyage_slug.to_string()),
    ]
}

pub fn voyage_passenger_record(voyage_slug: &str, person: &Person) -> SheetRecord {
    vec![
        ("voyage_slug", voyage_slug.to_string()),
        ("person_slug", person.person_slug.clone()),
        ("capacity_role", opt(&person.capacity_role)),
        ("notes", String::new()),
    ]
}

pub fn voyage_media_record(voyage_slug: &str, item: &MediaItem, sort_order: Option<i64>) -> SheetRecord {
    vec![
        ("voyage_slug", voyage_slug.to_string()),
        ("media_slug", item.media_slug.clone()),
        ("sort_order", sort_order.map(|n| n.to_string()).unwrap_or_default()),
        ("notes", String::new()),
    ]
}

pub fn voyage_president_record(voyage_slug: &str, president_slug: &str) -> SheetRecord {
    vec![
        ("voyage_slug", voyage_slug.to_string()),
        ("president_slug", president_slug.to_string()),
        ("notes", String::new()),
    ]
}

pub fn president_row(president: &President) -> Vec<String> {
    vec![
        president.president_slug.clone(),
        president.full_name.clone(),
        opt(&president.party),
        opt(&president.term_start),
        opt(&president.term_end),
        opt(&president.wikipedia_url),
        opt(&president.tags),
    ]
}
