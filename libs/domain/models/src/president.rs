// [libs/domain/models/src/president.rs]
/*!
 * =================================================================
 * APARATO: PRESIDENT DOMAIN MODELS (V4.0)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: REGISTRO PRESIDENCIAL Y RESOLUCIÓN DE SLUGS
 *
 * # Mathematical Proof (Registry Authority):
 * El registro se construye EXCLUSIVAMENTE desde las secciones President
 * del documento maestro. Tras el reset de la corrida, el conjunto de
 * slugs del registro es idéntico al conjunto persistido, por lo que toda
 * resolución local anticipa el estado post-commit.
 * =================================================================
 */

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use sequoia_core_slugger::slugify;

/// Fila maestra de un presidente en el registro del documento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct President {
    pub president_slug: String,
    pub full_name: String,
    pub party: Option<String>,
    pub term_start: Option<String>,
    pub term_end: Option<String>,
    pub wikipedia_url: Option<String>,
    pub tags: Option<String>,
}

/// Registro presidencial de la corrida: slugs conocidos y mapa nombre->slug.
///
/// Respaldado por las secciones President del documento; se consulta desde
/// el validador, el slugger de claves S3 y los escritores de joins.
#[derive(Debug, Clone, Default)]
pub struct PresidentRegistry {
    slugs: Vec<String>,
    fullname_to_slug: HashMap<String, String>,
}

impl PresidentRegistry {
    /// Construye el registro desde las filas parseadas del documento.
    pub fn from_presidents(presidents: &[President]) -> Self {
        let mut slugs = Vec::with_capacity(presidents.len());
        let mut fullname_to_slug = HashMap::with_capacity(presidents.len());
        for president in presidents {
            let slug = president.president_slug.trim().to_string();
            if slug.is_empty() {
                continue;
            }
            slugs.push(slug.clone());
            let full = president.full_name.trim().to_lowercase();
            if !full.is_empty() {
                fullname_to_slug.insert(full, slug);
            }
        }
        Self { slugs, fullname_to_slug }
    }

    /// Slugs presidenciales conocidos, en orden de declaración.
    pub fn known_slugs(&self) -> &[String] {
        &self.slugs
    }

    /// Pertenencia exacta de un slug al registro.
    pub fn contains(&self, president_slug: &str) -> bool {
        self.slugs.iter().any(|s| s == president_slug)
    }

    /// Resuelve el slug esperado para un nombre completo.
    ///
    /// Coincidencia por nombre (case-insensitive) contra el registro; sin
    /// coincidencia, degrada a `slugify(nombre)`. Nombre vacío -> `None`.
    pub fn resolve_slug_for_name(&self, full_name: &str) -> Option<String> {
        let trimmed = full_name.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(slug) = self.fullname_to_slug.get(&trimmed.to_lowercase()) {
            return Some(slug.clone());
        }
        Some(slugify(trimmed))
    }
}
