// [libs/domain/models/src/person.rs]
/*!
 * =================================================================
 * APARATO: PERSON DOMAIN MODELS (V4.0)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: CONTRATO MAESTRO DEL PASAJERO
 * =================================================================
 */

use serde::{Deserialize, Serialize};

/// Fila maestra de una persona embarcada.
///
/// `capacity_role` viaja sobre el registro parseado hacia la fila join
/// `voyage_passengers`; no forma parte de la tabla maestra `people`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub person_slug: String,
    pub full_name: Option<String>,
    pub role_title: Option<String>,
    pub organization: Option<String>,
    pub birth_year: Option<String>,
    pub death_year: Option<String>,
    pub wikipedia_url: Option<String>,
    pub notes_internal: Option<String>,
    pub tags: Option<String>,
    pub capacity_role: Option<String>,
}
