// [libs/domain/models/src/lib.rs]
/*!
 * =================================================================
 * APARATO: DOMAIN MODELS REGISTRY (V4.0 - INGEST MASTER)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: DEFINICIÓN DE CONTRATOS SOBERANOS DE ARCHIVO
 * =================================================================
 */

pub mod bundle;
pub mod media;
pub mod person;
pub mod president;
pub mod voyage;

pub use bundle::{MediaLinkSet, MediaUploadOutcome, ParseOutcome, VoyageBundle};
pub use media::{MediaItem, MediaType};
pub use person::Person;
pub use president::{President, PresidentRegistry};
pub use voyage::{Voyage, VoyageType};
