// [libs/infra/media/src/errors.rs]
/*!
 * =================================================================
 * APARATO: MEDIA ERROR CATALOG (V4.6)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE HIDRATACIÓN
 * =================================================================
 */

use thiserror::Error;

use sequoia_infra_object_store::StoreError;
use sequoia_infra_rpc::RpcError;

#[derive(Error, Debug)]
pub enum MediaError {
    /// Fallo remoto de descarga (Drive/Dropbox), ya reintentado por el arnés.
    #[error("[L3_MEDIA_RPC_FAULT]: {0}")]
    Rpc(#[from] RpcError),

    /// Fallo del almacén de objetos durante PUT/COPY/DELETE.
    #[error("[L3_MEDIA_STORE_FAULT]: {0}")]
    Store(#[from] StoreError),

    /// El enlace no es Drive `/file/d/<ID>/` ni Dropbox.
    #[error("[L3_MEDIA_LINK_FAULT]: UNSUPPORTED_SOURCE -> {0}")]
    UnsupportedLink(String),

    /// Bytes ilegibles como imagen o fallo de codificación JPEG.
    #[error("[L3_MEDIA_IMAGE_FAULT]: {0}")]
    Image(String),
}
