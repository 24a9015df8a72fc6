// [libs/infra/db/src/repositories/mod.rs]
/*!
 * =================================================================
 * APARATO: REPOSITORY REGISTRY (V4.8)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DE LOS REPOSITORIOS DEL ARCHIVO
 * =================================================================
 */

pub mod presidents;
pub mod reconcile;
pub mod voyages;

pub use presidents::{PresidentRepository, PresidentResetStats};
pub use reconcile::{DbPruneStats, GlobalDbPruneStats, ReconcileRepository};
pub use voyages::VoyageRepository;
