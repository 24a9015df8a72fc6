// [libs/domain/parser/src/lib.rs]
/*!
 * =================================================================
 * APARATO: MASTER DOCUMENT PARSER (V4.2 - CONTEXT AWARE)
 * CLASIFICACIÓN: DOMAIN ENGINE (ESTRATO L2)
 * RESPONSABILIDAD: TRANSFORMACIÓN DE TEXTO CURATORIAL EN PAQUETES
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. PURE TEXT-IN: El transporte del documento (Docs API) vive en L3;
 *    este motor recibe texto plano y emite registros tipados.
 * 2. PRESIDENT CONTEXT: Una sección President vigente se adhiere a cada
 *    voyage subsecuente hasta ser reemplazada.
 * 3. GRACEFUL DEGRADATION: Bloques huérfanos se descartan con warning,
 *    jamás abortan la corrida.
 * =================================================================
 */

pub mod blocks;
pub mod document;

pub use document::parse_document;
