// [apps/ingest/src/audit.rs]
/*!
 * =================================================================
 * APARATO: INGEST AUDIT LOG (V4.9 - RICH ROW SET)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L6)
 * RESPONSABILIDAD: FILAS DE AUDITORÍA DE LA PESTAÑA ingest_log
 *
 * # Logic:
 * Una fila por voyage más una fila [GLOBAL] de cierre. El log es la
 * fuente de verdad visible de la corrida; la consola lo refleja.
 * =================================================================
 */

/// Estado final de un voyage dentro de la corrida.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Ok,
    WithWarnings,
    Error,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::WithWarnings => "WITH_WARNINGS",
            Self::Error => "ERROR",
        }
    }

    /// Clasificación estándar: errores dominan, warnings degradan.
    pub fn classify(errors_count: usize, warnings_count: usize) -> Self {
        if errors_count > 0 {
            Self::Error
        } else if warnings_count > 0 {
            Self::WithWarnings
        } else {
            Self::Ok
        }
    }
}

/// Fila completa de la pestaña `ingest_log` (20 columnas).
#[derive(Debug, Clone)]
pub struct AuditRow {
    pub timestamp: String,
    pub doc_id: String,
    pub voyage_slug: String,
    pub status: RunStatus,
    pub errors_count: usize,
    pub warnings_count: usize,
    pub media_declared: usize,
    pub media_uploaded: usize,
    pub thumbs_uploaded: usize,
    pub sync_mode: &'static str,
    pub dry_run: bool,
    pub s3_deleted: usize,
    pub s3_archived: usize,
    pub sheets_deleted_vm: usize,
    pub sheets_deleted_vp: usize,
    pub db_deleted_vm: usize,
    pub db_deleted_vp: usize,
    pub db_deleted_media: usize,
    pub db_deleted_people: usize,
    pub notes: String,
}

impl AuditRow {
    /// Fila base con contadores en cero.
    pub fn blank(timestamp: &str, doc_id: &str, voyage_slug: &str, dry_run: bool) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            doc_id: doc_id.to_string(),
            voyage_slug: voyage_slug.to_string(),
            status: RunStatus::Ok,
            errors_count: 0,
            warnings_count: 0,
            media_declared: 0,
            media_uploaded: 0,
            thumbs_uploaded: 0,
            sync_mode: "exact",
            dry_run,
            s3_deleted: 0,
            s3_archived: 0,
            sheets_deleted_vm: 0,
            sheets_deleted_vp: 0,
            db_deleted_vm: 0,
            db_deleted_vp: 0,
            db_deleted_media: 0,
            db_deleted_people: 0,
            notes: String::new(),
        }
    }

    /// Proyección a celdas, en el orden exacto de la cabecera del log.
    pub fn to_cells(&self) -> Vec<String> {
        let notes: String = self.notes.chars().take(250).collect();
        vec![
            self.timestamp.clone(),
            self.doc_id.clone(),
            self.voyage_slug.clone(),
            self.status.as_str().to_string(),
            self.errors_count.to_string(),
            self.warnings_count.to_string(),
            self.media_declared.to_string(),
            self.media_uploaded.to_string(),
            self.thumbs_uploaded.to_string(),
            self.sync_mode.to_string(),
            if self.dry_run { "TRUE" } else { "FALSE" }.to_string(),
            self.s3_deleted.to_string(),
            self.s3_archived.to_string(),
            self.sheets_deleted_vm.to_string(),
            self.sheets_deleted_vp.to_string(),
            self.db_deleted_vm.to_string(),
            self.db_deleted_vp.to_string(),
            self.db_deleted_media.to_string(),
            self.db_deleted_people.to_string(),
            notes,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequoia_infra_gsuite::tabs::INGEST_LOG_HEADERS;

    #[test]
    fn certify_row_arity_matches_log_header() {
        let row = AuditRow::blank("2026-08-01T00:00:00Z", "doc-1", "[GLOBAL]", false);
        assert_eq!(row.to_cells().len(), INGEST_LOG_HEADERS.len());
    }

    #[test]
    fn certify_status_classification() {
        assert_eq!(RunStatus::classify(0, 0), RunStatus::Ok);
        assert_eq!(RunStatus::classify(0, 3), RunStatus::WithWarnings);
        assert_eq!(RunStatus::classify(2, 3), RunStatus::Error);
    }

    #[test]
    fn certify_notes_truncation_and_flags() {
        let mut row = AuditRow::blank("t", "d", "v", true);
        row.notes = "x".repeat(400);
        let cells = row.to_cells();
        assert_eq!(cells[10], "TRUE");
        assert_eq!(cells[19].len(), 250);
    }
}
