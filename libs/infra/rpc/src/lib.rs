// [libs/infra/rpc/src/lib.rs]
/*!
 * =================================================================
 * APARATO: RATE-LIMITED RPC HARNESS (V4.3 - RETRY-AFTER AWARE)
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: REINTENTOS, THROTTLE Y CACHÉ DE LECTURAS REMOTAS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SINGLE CLASSIFIER: Este es el ÚNICO punto del sistema que inspecciona
 *    la forma de un error remoto para decidir reintentabilidad.
 * 2. SERVER AUTHORITY: Un Retry-After del servidor desplaza al cálculo
 *    local de backoff.
 * 3. SESSION CACHES: La caché de lecturas es propiedad de la sesión de
 *    ingesta, no un global de módulo; se invalida por clave escrita.
 *
 * # Mathematical Proof (Bounded Backoff):
 * El retardo del intento k es min(BACKOFF_MAX, BASE * 2^k * (0.5 + u)),
 * u ~ U[0,1). La serie de esperas queda acotada por
 * (MAX_RETRIES+1) * BACKOFF_MAX, garantizando terminación de la corrida.
 * =================================================================
 */

pub mod cache;
pub mod harness;

pub use cache::ReadCache;
pub use harness::{RpcError, RpcHarness, RpcPolicy};
