// [libs/infra/db/src/repositories/presidents.rs]
/*!
 * =================================================================
 * APARATO: PRESIDENT REPOSITORY (V4.8 - SAFE RESET)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: RESET PRESIDENCIAL SIN TRUNCATE
 *
 * # Mathematical Proof (Referential Safety):
 * TRUNCATE está prohibido: cascada sobre las referencias de voyages.
 * El reset es upsert total + DELETE guardado por NOT EXISTS contra
 * voyages.president_slug, por lo que ningún presidente referenciado
 * puede desaparecer del archivo.
 * =================================================================
 */

use libsql::{params_from_iter, Value};
use tracing::info;

use sequoia_domain_models::President;

use crate::client::SequoiaDbClient;
use crate::errors::DbError;
use crate::normalize::{nd_lenient, ns};

/// Desenlace del reset presidencial para el log de la corrida.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresidentResetStats {
    pub upserted: usize,
    pub pruned: usize,
}

const UPSERT_PRESIDENT_SQL: &str = r#"
    INSERT INTO presidents (president_slug, full_name, party, term_start, term_end, wikipedia_url, tags)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT(president_slug) DO UPDATE SET
        full_name     = excluded.full_name,
        party         = excluded.party,
        term_start    = excluded.term_start,
        term_end      = excluded.term_end,
        wikipedia_url = excluded.wikipedia_url,
        tags          = excluded.tags
"#;

pub struct PresidentRepository {
    database_client: SequoiaDbClient,
}

impl PresidentRepository {
    pub fn new(client: SequoiaDbClient) -> Self {
        Self { database_client: client }
    }

    /// Fuerza la tabla presidencial a reflejar el documento: upsert de
    /// todas las filas entrantes y poda guardada de las ausentes.
    ///
    /// Con `dry_run` los upserts se aplican y la poda queda suprimida.
    pub async fn safe_reset(&self, presidents: &[President], dry_run: bool) -> Result<PresidentResetStats, DbError> {
        let connection = self.database_client.connection()?;
        let transaction = connection.transaction().await?;

        for president in presidents {
            transaction
                .execute(
                    UPSERT_PRESIDENT_SQL,
                    params_from_iter(vec![
                        Value::Text(president.president_slug.trim().to_string()),
                        Value::Text(president.full_name.trim().to_string()),
                        ns(president.party.as_deref()),
                        nd_lenient(president.term_start.as_deref()),
                        nd_lenient(president.term_end.as_deref()),
                        ns(president.wikipedia_url.as_deref()),
                        ns(president.tags.as_deref()),
                    ]),
                )
                .await?;
        }

        let incoming: Vec<String> = presidents
            .iter()
            .map(|p| p.president_slug.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let pruned = if dry_run {
            tracing::warn!("🧪 [DATABASE/DRY]: President prune suppressed");
            0
        } else if incoming.is_empty() {
            transaction
                .execute(
                    r#"
                    DELETE FROM presidents
                    WHERE NOT EXISTS (
                        SELECT 1 FROM voyages v
                        WHERE v.president_slug = presidents.president_slug
                    )
                    "#,
                    (),
                )
                .await?
        } else {
            let placeholders: Vec<String> = (1..=incoming.len()).map(|n| format!("?{n}")).collect();
            let sql = format!(
                r#"
                DELETE FROM presidents
                WHERE president_slug NOT IN ({})
                  AND NOT EXISTS (
                      SELECT 1 FROM voyages v
                      WHERE v.president_slug = presidents.president_slug
                  )
                "#,
                placeholders.join(", ")
            );
            transaction
                .execute(&sql, params_from_iter(incoming.iter().map(|s| Value::Text(s.clone()))))
                .await?
        };

        transaction.commit().await?;
        info!("🏛️ [DATABASE]: Presidents safely reset (upserted {}, pruned {pruned})", presidents.len());
        Ok(PresidentResetStats { upserted: presidents.len(), pruned: pruned as usize })
    }
}
