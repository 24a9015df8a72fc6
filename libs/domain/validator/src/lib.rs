// [libs/domain/validator/src/lib.rs]
/*!
 * =================================================================
 * APARATO: BUNDLE VALIDATION ENGINE (V4.1 - REGISTRY SYNCED)
 * CLASIFICACIÓN: DOMAIN ENGINE (ESTRATO L2)
 * RESPONSABILIDAD: AUDITORÍA ESTRUCTURAL Y REFERENCIAL PRE-COMMIT
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. TOTAL REPORTING: Toda regla se evalúa; jamás se corta en el primer
 *    fallo. El reporte lista los errores en orden de descubrimiento.
 * 2. REGISTRY GRACE: Un presidente ausente del registro degrada a
 *    warning, dado que el reset presidencial lo incorporará antes del
 *    primer commit de voyage.
 * =================================================================
 */

use once_cell::sync::Lazy;
use regex::Regex;

use sequoia_core_slugger::slugify;
use sequoia_domain_models::{PresidentRegistry, VoyageBundle, VoyageType};

/// Fecha canónica YYYY-MM-DD.
static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("regex estática inválida"));
/// Hora HH:MM u HH:MM:SS.
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}(:\d{2})?$").expect("regex estática inválida"));
/// Estructura capturante del voyage_slug.
static VOYAGE_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})-([a-z0-9-]+)-([a-z0-9-]+)$").expect("regex estática inválida"));
/// Slug de persona: al menos dos tokens.
static PERSON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)+$").expect("regex estática inválida"));
/// Sufijo secuencial -NN del media_slug.
static MEDIA_SEQ_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-\d{2}$").expect("regex estática inválida"));

/// Reporte de auditoría de un paquete: errores bloquean el voyage,
/// warnings viajan al log de ingesta sin detenerlo.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Un paquete es válido cuando no acumuló errores.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn require(value: &str, path: &str, key: &str, errors: &mut Vec<String>) {
    if value.trim().is_empty() {
        errors.push(format!("[{path}] missing required field: {key}"));
    }
}

fn check_date(value: Option<&str>, path: &str, key: &str, errors: &mut Vec<String>) {
    if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
        if !DATE_RE.is_match(v) {
            errors.push(format!("[{path}] invalid date for {key}: {v} (YYYY-MM-DD)"));
        }
    }
}

fn check_time(value: Option<&str>, path: &str, key: &str, errors: &mut Vec<String>) {
    if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
        if !TIME_RE.is_match(v) {
            errors.push(format!("[{path}] invalid time for {key}: {v} (HH:MM or HH:MM:SS)"));
        }
    }
}

/// Reconoce un enlace de media soportado: Drive `/file/d/<id>/` o Dropbox.
pub fn is_supported_media_link(link: &str) -> bool {
    let lowered = link.to_lowercase();
    lowered.contains("/file/d/") || lowered.contains("dropbox.com")
}

/// Audita un paquete completo contra el registro presidencial de la corrida.
pub fn validate_bundle(bundle: &VoyageBundle, registry: &PresidentRegistry) -> ValidationReport {
    let mut report = ValidationReport::default();
    let voyage = &bundle.voyage;

    // ---- Campos obligatorios del voyage
    require(&voyage.voyage_slug, "voyage", "voyage_slug", &mut report.errors);
    require(&voyage.title, "voyage", "title", &mut report.errors);
    require(&voyage.start_date, "voyage", "start_date", &mut report.errors);
    require(&voyage.president, "voyage", "president", &mut report.errors);

    check_date(Some(voyage.start_date.as_str()), "voyage", "start_date", &mut report.errors);
    check_date(voyage.end_date.as_deref(), "voyage", "end_date", &mut report.errors);
    check_time(voyage.start_time.as_deref(), "voyage", "start_time", &mut report.errors);
    check_time(voyage.end_time.as_deref(), "voyage", "end_time", &mut report.errors);

    if let Some(vtype) = voyage.voyage_type.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        if VoyageType::parse(vtype).is_none() {
            report.errors.push(format!(
                "[voyage] invalid value for voyage_type: {vtype} (allowed: {:?})",
                VoyageType::ALLOWED
            ));
        }
    }

    // ---- Estructura del voyage_slug y paridad presidencial
    let voyage_slug = voyage.voyage_slug.trim();
    if !voyage_slug.is_empty() {
        match VOYAGE_SLUG_RE.captures(voyage_slug) {
            None => report.errors.push(format!(
                "[voyage] invalid voyage_slug format: {voyage_slug} (expected YYYY-MM-DD-<president>-<descriptor>)"
            )),
            Some(captures) => {
                let date_part = &captures[1];
                let start_date: String = voyage.start_date.trim().chars().take(10).collect();
                if !start_date.is_empty() && date_part != start_date {
                    report
                        .errors
                        .push(format!("[voyage] voyage_slug date {date_part} != start_date {start_date}"));
                }

                let president_name = voyage.president.trim();
                let expected_slug = registry
                    .resolve_slug_for_name(president_name)
                    .or_else(|| {
                        if president_name.is_empty() {
                            None
                        } else {
                            Some(slugify(president_name))
                        }
                    });
                if let Some(expected) = expected_slug {
                    if !voyage_slug.starts_with(&format!("{date_part}-{expected}-")) {
                        report.errors.push(format!(
                            "[voyage] voyage_slug '{voyage_slug}' does not carry president '{expected}' after its date"
                        ));
                    }
                    if !registry.contains(&expected) {
                        report.warnings.push(format!(
                            "[voyage] president '{expected}' not present in the registry yet; the registry reset will add it"
                        ));
                    }
                }
            }
        }
    }

    // ---- Pasajeros
    for (index, passenger) in bundle.passengers.iter().enumerate() {
        let path = format!("passengers #{}", index + 1);
        let slug = passenger.person_slug.trim();
        if !slug.is_empty() && !PERSON_SLUG_RE.is_match(slug) {
            report.errors.push(format!("[{path}] invalid person slug: {slug}"));
        }
        for (key, value) in [("birth_year", &passenger.birth_year), ("death_year", &passenger.death_year)] {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                if !v.chars().all(|c| c.is_ascii_digit()) {
                    report.errors.push(format!("[{path}] {key} must be an integer if provided"));
                }
            }
        }
    }

    // ---- Media
    for (index, item) in bundle.media.iter().enumerate() {
        let path = format!("media #{}", index + 1);
        for (key, value) in [
            ("title", item.title.clone().unwrap_or_default()),
            ("credit", item.credit.clone()),
            ("date", item.date.clone()),
            ("google_drive_link", item.google_drive_link.clone()),
        ] {
            require(&value, &path, key, &mut report.errors);
        }
        check_date(Some(item.date.as_str()), &path, "date", &mut report.errors);

        // Enlace no soportado: warning, no error. El voyage prosigue y el
        // fetcher deja la fila del ítem con URLs nulas.
        let link = item.google_drive_link.trim();
        if !link.is_empty() && !is_supported_media_link(link) {
            report.warnings.push(format!(
                "[{path}] media link must be a Google Drive '/file/d/<ID>/...' or a Dropbox shared link"
            ));
        }

        let media_slug = item.media_slug.trim();
        if !media_slug.is_empty() && !voyage_slug.is_empty() {
            if !media_slug.contains(voyage_slug) || !MEDIA_SEQ_RE.is_match(media_slug) {
                report.errors.push(format!(
                    "[{path}] media slug '{media_slug}' does not match '<date>-<source>-{voyage_slug}-NN'"
                ));
            }
        }
    }

    report
}
