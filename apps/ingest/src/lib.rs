// [apps/ingest/src/lib.rs]
/*!
 * =================================================================
 * APARATO: INGEST APPLICATION LIBRARY (V4.9)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L6)
 * RESPONSABILIDAD: EXPOSICIÓN DE LOS MÓDULOS DEL RECONCILIADOR
 * =================================================================
 */

pub mod audit;
pub mod config;
pub mod pipeline;
pub mod reconciler;
