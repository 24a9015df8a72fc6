// [libs/infra/media/src/lib.rs]
/*!
 * =================================================================
 * APARATO: MEDIA HYDRATION REGISTRY (V4.6 - MOVE AWARE)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: DESCARGA, TRANSCODIFICACIÓN Y CLAVES CANÓNICAS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. MOVE-ON-RENAME: El mismo enlace fuente con clave canónica distinta
 *    se resuelve con COPY+DELETE, jamás con re-descarga.
 * 2. BOUNDED HYDRATION: Fan-out acotado por un pool pequeño de workers;
 *    el trabajo CPU de derivados se aísla en spawn_blocking.
 * 3. GRACEFUL ITEMS: Un ítem fallido degrada a warning con URLs nulas;
 *    el voyage continúa.
 * =================================================================
 */

pub mod derivatives;
pub mod detect;
pub mod engine;
pub mod errors;
pub mod keys;
pub mod links;

pub use engine::{LinkIndexEntry, MediaEngine};
pub use errors::MediaError;
