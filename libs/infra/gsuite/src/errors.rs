// [libs/infra/gsuite/src/errors.rs]
/*!
 * =================================================================
 * APARATO: GSUITE ERROR CATALOG (V4.4)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DOCS/SHEETS
 * =================================================================
 */

use thiserror::Error;

use sequoia_infra_rpc::RpcError;

#[derive(Error, Debug)]
pub enum GsuiteError {
    /// Fallo remoto ya clasificado (y eventualmente reintentado) por el arnés.
    #[error("[L3_GSUITE_RPC_FAULT]: {0}")]
    Rpc(#[from] RpcError),

    /// La pestaña esperada no existe tras la fase de aseguramiento.
    #[error("[L3_GSUITE_TAB_FAULT]: TAB_NOT_FOUND -> {0}")]
    TabNotFound(String),

    /// La cabecera de la pestaña no expone una columna clave requerida.
    #[error("[L3_GSUITE_HEADER_FAULT]: KEY_COLUMN_MISSING -> {tab}:{column}")]
    KeyColumnMissing { tab: String, column: String },
}
