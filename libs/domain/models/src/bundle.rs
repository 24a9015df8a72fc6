// [libs/domain/models/src/bundle.rs]
/*!
 * =================================================================
 * APARATO: INGEST BUNDLE CONTRACTS (V4.0)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: PAQUETES DE INGESTA Y RESULTADOS DE SUBIDA DE MEDIA
 * =================================================================
 */

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::media::MediaItem;
use crate::person::Person;
use crate::president::President;
use crate::voyage::Voyage;

/// Paquete estructurado de un voyage: la unidad de procesamiento del pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoyageBundle {
    pub voyage: Voyage,
    pub passengers: Vec<Person>,
    pub media: Vec<MediaItem>,
}

/// Resultado del parseo completo del documento maestro.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// Filas de las secciones President, en orden de declaración.
    pub presidents: Vec<President>,
    /// Paquetes de voyage, en orden de declaración.
    pub bundles: Vec<VoyageBundle>,
    /// Bloques descartados y anomalías no fatales.
    pub warnings: Vec<String>,
}

/// Desenlace de la subida de un ítem de media al almacén de objetos.
///
/// Un ítem fallido conserva su entrada con ambas URLs en `None`; la fila
/// aguas abajo existe igualmente con columnas nulas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaUploadOutcome {
    /// `s3://bucket/key` del original privado.
    pub s3_url: Option<String>,
    /// URL HTTP pública del preview (solo imágenes).
    pub public_derivative_url: Option<String>,
}

/// Mapa `media_slug -> desenlace` producido por el fetcher de media.
pub type MediaLinkSet = HashMap<String, MediaUploadOutcome>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voyage::Voyage;

    #[test]
    fn certify_bundle_json_parity() {
        let bundle = VoyageBundle {
            voyage: Voyage {
                voyage_slug: "1933-04-23-roosevelt-franklin-fishing-trip".into(),
                title: "Fishing Trip".into(),
                start_date: "1933-04-23".into(),
                source_urls: vec!["https://archives.example/log".into()],
                president: "Franklin D. Roosevelt".into(),
                president_slug: "roosevelt-franklin".into(),
                ..Voyage::default()
            },
            passengers: Vec::new(),
            media: Vec::new(),
        };

        let serialized = serde_json::to_string(&bundle).expect("serialización del paquete");
        let restored: VoyageBundle = serde_json::from_str(&serialized).expect("deserialización del paquete");
        assert_eq!(restored.voyage, bundle.voyage);
    }

    #[test]
    fn certify_failed_upload_outcome_is_all_null() {
        let outcome = MediaUploadOutcome::default();
        assert!(outcome.s3_url.is_none() && outcome.public_derivative_url.is_none());
    }
}
