// [libs/infra/db/src/lib.rs]
/*!
 * =================================================================
 * APARATO: ARCHIVE DATABASE REGISTRY (V4.8 - TRANSACTIONAL)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: PERSISTENCIA RELACIONAL Y RECONCILIACIÓN DEL ARCHIVO
 * =================================================================
 */

pub mod client;
pub mod errors;
pub mod normalize;
pub mod repositories;
pub mod schema;

pub use client::SequoiaDbClient;
pub use errors::DbError;
