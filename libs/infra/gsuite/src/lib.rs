// [libs/infra/gsuite/src/lib.rs]
/*!
 * =================================================================
 * APARATO: GSUITE INFRASTRUCTURE REGISTRY (V4.4 - BATCH FIRST)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: TRANSPORTE DOCS/SHEETS Y PROYECCIÓN DE LA PLANILLA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SINGLE-READ INDEX: Cada pestaña se lee UNA vez por corrida; todo
 *    upsert posterior opera contra el índice en memoria.
 * 2. BATCH FIRST: Creación de pestañas, corrección de cabeceras y podas
 *    viajan en lotes únicos para respetar la cuota del API.
 * 3. HARNESS DISCIPLINE: Toda llamada remota cruza el arnés C4.
 * =================================================================
 */

pub mod client;
pub mod errors;
pub mod index_cache;
pub mod rows;
pub mod tabs;
pub mod writer;

pub use client::GoogleApiClient;
pub use errors::GsuiteError;
pub use index_cache::{TabIndexCache, UpsertDisposition};
pub use writer::{ExistingMediaRow, SheetsWriter};
