// [libs/domain/parser/src/document.rs]
/*!
 * =================================================================
 * APARATO: DOCUMENT ASSEMBLY ENGINE (V4.2 - CONTEXT AWARE)
 * CLASIFICACIÓN: DOMAIN ENGINE (ESTRATO L2)
 * RESPONSABILIDAD: MÁQUINA DE ESTADOS DE SECCIONES Y DERIVACIÓN DE SLUGS
 *
 * # Mathematical Proof (Slug Disambiguation):
 * La tupla (start_date, president_slug) indexa un contador por corrida;
 * la primera ocurrencia retiene el slug base y las subsecuentes reciben
 * el sufijo -NN desde 02. Dentro de una corrida dos voyages jamás
 * comparten voyage_slug.
 * =================================================================
 */

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use sequoia_core_slugger::{generate_media_slugs, slugify};
use sequoia_domain_models::{
    MediaItem, ParseOutcome, Person, President, PresidentRegistry, Voyage, VoyageBundle,
};

use crate::blocks::{field, field_any, parse_kv_block, split_entries_block, KvBlock};

/// Encabezado de sección del documento curatorial.
static SECTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^##\s+(president|voyage|passengers|media)\s*$").expect("regex estática inválida"));

/// Separador de URLs fuente (comas o espacios).
static SOURCE_URL_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,\s]+").expect("regex estática inválida"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    President,
    Voyage,
    Passengers,
    Media,
}

impl SectionKind {
    fn classify(header: &str) -> Option<Self> {
        let captures = SECTION_HEADER.captures(header.trim())?;
        match captures[1].to_lowercase().as_str() {
            "president" => Some(Self::President),
            "voyage" => Some(Self::Voyage),
            "passengers" => Some(Self::Passengers),
            "media" => Some(Self::Media),
            _ => None,
        }
    }
}

struct RawSection<'a> {
    kind: SectionKind,
    lines: Vec<&'a str>,
}

/// Fragmenta el documento en secciones encabezadas; `---` cierra el cuerpo.
fn scan_sections(text: &str) -> Vec<RawSection<'_>> {
    let mut sections: Vec<RawSection<'_>> = Vec::new();
    let mut collecting = false;
    for line in text.lines() {
        if let Some(kind) = SectionKind::classify(line) {
            sections.push(RawSection { kind, lines: Vec::new() });
            collecting = true;
            continue;
        }
        if line.trim() == "---" {
            collecting = false;
            continue;
        }
        if collecting {
            if let Some(section) = sections.last_mut() {
                section.lines.push(line);
            }
        }
    }
    sections
}

fn parse_president(kv: &KvBlock, warnings: &mut Vec<String>) -> Option<President> {
    let full_name = field(kv, "full_name")?;
    let president_slug = field(kv, "president_slug").unwrap_or_else(|| slugify(&full_name));
    if president_slug.is_empty() {
        warnings.push(format!("president '{full_name}' produced an empty slug; dropped"));
        return None;
    }
    Some(President {
        president_slug,
        full_name,
        party: field(kv, "party"),
        term_start: field(kv, "term_start"),
        term_end: field(kv, "term_end"),
        wikipedia_url: field(kv, "wikipedia_url"),
        tags: field(kv, "tags"),
    })
}

fn parse_passenger(kv: &KvBlock, warnings: &mut Vec<String>) -> Option<Person> {
    let full_name = field(kv, "full_name");
    let person_slug = match field_any(kv, &["slug", "person_slug"]) {
        Some(slug) => slug,
        // Sin slug declarado derivamos desde el nombre para no romper el join.
        None => match &full_name {
            Some(name) => slugify(name),
            None => {
                warnings.push("passenger entry missing both slug and full_name; dropped".to_string());
                return None;
            }
        },
    };
    Some(Person {
        person_slug,
        full_name,
        role_title: field(kv, "role_title"),
        organization: field(kv, "organization"),
        birth_year: field(kv, "birth_year"),
        death_year: field(kv, "death_year"),
        wikipedia_url: field(kv, "wikipedia_url"),
        notes_internal: field(kv, "notes_internal"),
        tags: field(kv, "tags"),
        capacity_role: field(kv, "capacity_role"),
    })
}

fn parse_media_item(kv: &KvBlock) -> MediaItem {
    MediaItem {
        media_slug: field_any(kv, &["slug", "media_slug"]).unwrap_or_default(),
        title: field(kv, "title"),
        media_type: field(kv, "media_type"),
        credit: field(kv, "credit").unwrap_or_default(),
        date: field(kv, "date").unwrap_or_default(),
        description_markdown: field_any(kv, &["description_markdown", "description"]),
        tags: field(kv, "tags"),
        google_drive_link: field(kv, "google_drive_link").unwrap_or_default(),
        source_slug: String::new(),
        copyright_restrictions: field(kv, "copyright_restrictions"),
    }
}

fn split_source_urls(raw: Option<String>) -> Vec<String> {
    let Some(value) = raw else {
        return Vec::new();
    };
    SOURCE_URL_SPLIT
        .split(value.trim())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Descriptor del voyage: primeras 5 palabras del título, slugificadas.
fn descriptor_from_title(title: &str) -> String {
    let head: Vec<&str> = title.split_whitespace().take(5).collect();
    let descriptor = slugify(&head.join(" "));
    if descriptor == sequoia_core_slugger::UNKNOWN_SLUG {
        "voyage".to_string()
    } else {
        descriptor
    }
}

/// Voyage en construcción durante el barrido de secciones.
struct OpenVoyage {
    kv: KvBlock,
    passengers: Vec<Person>,
    media: Vec<MediaItem>,
}

struct Assembler {
    registry: PresidentRegistry,
    slug_counters: HashMap<(String, String), u32>,
    bundles: Vec<VoyageBundle>,
    warnings: Vec<String>,
}

impl Assembler {
    fn flush(&mut self, open: Option<OpenVoyage>, context_president: Option<&President>) {
        let Some(open) = open else {
            return;
        };
        let kv = &open.kv;
        let title = field(kv, "title").unwrap_or_default();
        let start_date = field(kv, "start_date").unwrap_or_default();
        let president_name = field(kv, "president")
            .or_else(|| context_president.map(|p| p.full_name.clone()))
            .unwrap_or_default();

        let president_slug = self
            .registry
            .resolve_slug_for_name(&president_name)
            .unwrap_or_else(|| sequoia_core_slugger::UNKNOWN_PRESIDENT_SLUG.to_string());

        let voyage_slug = if !start_date.is_empty() && !president_slug.is_empty() {
            let descriptor = descriptor_from_title(&title);
            let base = format!("{start_date}-{president_slug}-{descriptor}");
            let sequence = self
                .slug_counters
                .entry((start_date.clone(), president_slug.clone()))
                .or_insert(0);
            *sequence += 1;
            if *sequence > 1 {
                format!("{base}-{:02}", sequence)
            } else {
                base
            }
        } else {
            // Degradación: el validador reclamará la ausencia.
            field(kv, "voyage_slug").unwrap_or_default()
        };

        let voyage = Voyage {
            voyage_slug: voyage_slug.clone(),
            title,
            start_date,
            end_date: field(kv, "end_date"),
            start_time: field(kv, "start_time"),
            end_time: field(kv, "end_time"),
            origin: field(kv, "origin"),
            destination: field(kv, "destination"),
            vessel_name: field(kv, "vessel_name"),
            voyage_type: field(kv, "voyage_type"),
            summary_markdown: field_any(kv, &["summary_markdown", "summary"]),
            source_urls: split_source_urls(field_any(kv, &["source_urls", "sources"])),
            tags: field(kv, "tags"),
            president: president_name,
            president_slug,
        };

        let mut media = open.media;
        generate_media_slugs(&mut media, &voyage_slug);

        self.bundles.push(VoyageBundle { voyage, passengers: open.passengers, media });
    }
}

/// Parsea el documento maestro completo en presidentes y paquetes de voyage.
///
/// El texto llega plano desde el transporte de Docs; el BOM se descarta.
/// Los bloques Passengers/Media sin voyage activo se descartan con warning.
pub fn parse_document(text: &str) -> ParseOutcome {
    let clean = text.trim_start_matches('\u{feff}');
    let sections = scan_sections(clean);

    let mut warnings: Vec<String> = Vec::new();

    // --- FASE 1: REGISTRO PRESIDENCIAL (fuente de verdad de la corrida) ---
    let mut presidents: Vec<President> = Vec::new();
    for section in sections.iter().filter(|s| s.kind == SectionKind::President) {
        let kv = parse_kv_block(&section.lines);
        let Some(president) = parse_president(&kv, &mut warnings) else {
            warnings.push("president section missing full_name; dropped".to_string());
            continue;
        };
        if let Some(existing) = presidents.iter_mut().find(|p| p.president_slug == president.president_slug) {
            *existing = president;
        } else {
            presidents.push(president);
        }
    }
    let registry = PresidentRegistry::from_presidents(&presidents);

    // --- FASE 2: ENSAMBLADO DE PAQUETES CON CONTEXTO PRESIDENCIAL ---
    let mut assembler = Assembler {
        registry,
        slug_counters: HashMap::new(),
        bundles: Vec::new(),
        warnings,
    };
    let mut context_president: Option<President> = None;
    let mut open_voyage: Option<OpenVoyage> = None;

    for section in &sections {
        match section.kind {
            SectionKind::President => {
                let flushed = open_voyage.take();
                assembler.flush(flushed, context_president.as_ref());
                let kv = parse_kv_block(&section.lines);
                if let Some(president) = parse_president(&kv, &mut assembler.warnings) {
                    context_president = Some(president);
                }
            }
            SectionKind::Voyage => {
                let flushed = open_voyage.take();
                assembler.flush(flushed, context_president.as_ref());
                open_voyage = Some(OpenVoyage {
                    kv: parse_kv_block(&section.lines),
                    passengers: Vec::new(),
                    media: Vec::new(),
                });
            }
            SectionKind::Passengers => match open_voyage.as_mut() {
                Some(open) => {
                    for entry in split_entries_block(&section.lines) {
                        let kv = parse_kv_block(&entry);
                        if let Some(person) = parse_passenger(&kv, &mut assembler.warnings) {
                            open.passengers.push(person);
                        }
                    }
                }
                None => {
                    warn!("⚠️ [PARSER]: Passengers block with no active voyage; dropped");
                    assembler.warnings.push("Passengers block with no active voyage; dropped".to_string());
                }
            },
            SectionKind::Media => match open_voyage.as_mut() {
                Some(open) => {
                    for entry in split_entries_block(&section.lines) {
                        let kv = parse_kv_block(&entry);
                        open.media.push(parse_media_item(&kv));
                    }
                }
                None => {
                    warn!("⚠️ [PARSER]: Media block with no active voyage; dropped");
                    assembler.warnings.push("Media block with no active voyage; dropped".to_string());
                }
            },
        }
    }
    let flushed = open_voyage.take();
    assembler.flush(flushed, context_president.as_ref());

    ParseOutcome {
        presidents,
        bundles: assembler.bundles,
        warnings: assembler.warnings,
    }
}
