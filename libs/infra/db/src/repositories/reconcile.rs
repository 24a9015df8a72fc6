// [libs/infra/db/src/repositories/reconcile.rs]
/*!
 * =================================================================
 * APARATO: RECONCILE REPOSITORY (V4.8 - NO ORPHANS)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: PODA EXACTA DE JOINS, MAESTROS Y VOYAGES
 *
 * # Mathematical Proof (Master Safety):
 * Toda eliminación de maestro lleva un guard NOT EXISTS contra sus
 * joins. Un maestro referenciado por cualquier join sobrevive a la
 * poda, por lo que el invariante "join -> maestro existente" se
 * preserva tras cada reconciliación.
 * =================================================================
 */

use std::collections::HashSet;

use libsql::{params_from_iter, Connection, Value};
use tracing::{info, warn};

use crate::client::SequoiaDbClient;
use crate::errors::DbError;

/// Contadores de la poda per-voyage para el log de auditoría.
#[derive(Debug, Clone, Copy, Default)]
pub struct DbPruneStats {
    pub deleted_voyage_media: usize,
    pub deleted_voyage_passengers: usize,
    pub deleted_media: usize,
    pub deleted_people: usize,
}

/// Contadores de la reconciliación global.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalDbPruneStats {
    pub deleted_voyages: usize,
    pub deleted_voyage_media: usize,
    pub deleted_voyage_passengers: usize,
}

fn placeholders(start: usize, count: usize) -> String {
    (start..start + count).map(|n| format!("?{n}")).collect::<Vec<_>>().join(", ")
}

pub struct ReconcileRepository {
    database_client: SequoiaDbClient,
}

impl ReconcileRepository {
    pub fn new(client: SequoiaDbClient) -> Self {
        Self { database_client: client }
    }

    /// Slugs presentes en un join para un voyage y ausentes del set deseado.
    async fn stale_join_slugs(
        connection: &Connection,
        join_table: &str,
        slug_column: &str,
        voyage_slug: &str,
        desired: &HashSet<String>,
    ) -> Result<Vec<String>, DbError> {
        let mut values: Vec<Value> = vec![Value::Text(voyage_slug.to_string())];
        let sql = if desired.is_empty() {
            format!("SELECT {slug_column} FROM {join_table} WHERE voyage_slug = ?1")
        } else {
            values.extend(desired.iter().map(|s| Value::Text(s.clone())));
            format!(
                "SELECT {slug_column} FROM {join_table} WHERE voyage_slug = ?1 AND {slug_column} NOT IN ({})",
                placeholders(2, desired.len())
            )
        };
        let mut rows = connection.query(&sql, params_from_iter(values)).await?;
        let mut stale = Vec::new();
        while let Some(row) = rows.next().await? {
            stale.push(row.get::<String>(0)?);
        }
        Ok(stale)
    }

    /// Poda per-voyage: joins ausentes del paquete y, opcionalmente, los
    /// maestros que quedaron sin referencia alguna.
    pub async fn prune_voyage_joins(
        &self,
        voyage_slug: &str,
        desired_media: &HashSet<String>,
        desired_people: &HashSet<String>,
        prune_masters: bool,
        dry_run: bool,
    ) -> Result<DbPruneStats, DbError> {
        let connection = self.database_client.connection()?;
        let mut stats = DbPruneStats::default();

        let stale_media =
            Self::stale_join_slugs(&connection, "voyage_media", "media_slug", voyage_slug, desired_media).await?;
        let stale_people =
            Self::stale_join_slugs(&connection, "voyage_passengers", "person_slug", voyage_slug, desired_people)
                .await?;

        if dry_run {
            warn!(
                "🧪 [RECONCILE/DRY]: Would prune {} voyage_media and {} voyage_passengers row(s) for {voyage_slug}",
                stale_media.len(),
                stale_people.len()
            );
            stats.deleted_voyage_media = stale_media.len();
            stats.deleted_voyage_passengers = stale_people.len();
            return Ok(stats);
        }

        let transaction = connection.transaction().await?;

        for (join_table, slug_column, stale) in [
            ("voyage_media", "media_slug", &stale_media),
            ("voyage_passengers", "person_slug", &stale_people),
        ] {
            if stale.is_empty() {
                continue;
            }
            let sql = format!(
                "DELETE FROM {join_table} WHERE voyage_slug = ?1 AND {slug_column} IN ({})",
                placeholders(2, stale.len())
            );
            let mut values: Vec<Value> = vec![Value::Text(voyage_slug.to_string())];
            values.extend(stale.iter().map(|s| Value::Text(s.clone())));
            let deleted = transaction.execute(&sql, params_from_iter(values)).await? as usize;
            match join_table {
                "voyage_media" => stats.deleted_voyage_media = deleted,
                _ => stats.deleted_voyage_passengers = deleted,
            }
        }

        if prune_masters {
            // Solo los candidatos recién desvinculados; el guard NOT EXISTS
            // suprime cualquier borrado que dejaría joins huérfanos.
            if !stale_media.is_empty() {
                let sql = format!(
                    r#"
                    DELETE FROM media
                    WHERE media_slug IN ({})
                      AND NOT EXISTS (
                          SELECT 1 FROM voyage_media vm
                          WHERE vm.media_slug = media.media_slug
                      )
                    "#,
                    placeholders(1, stale_media.len())
                );
                stats.deleted_media = transaction
                    .execute(&sql, params_from_iter(stale_media.iter().map(|s| Value::Text(s.clone()))))
                    .await? as usize;
            }
            if !stale_people.is_empty() {
                let sql = format!(
                    r#"
                    DELETE FROM people
                    WHERE person_slug IN ({})
                      AND NOT EXISTS (
                          SELECT 1 FROM voyage_passengers vp
                          WHERE vp.person_slug = people.person_slug
                      )
                    "#,
                    placeholders(1, stale_people.len())
                );
                stats.deleted_people = transaction
                    .execute(&sql, params_from_iter(stale_people.iter().map(|s| Value::Text(s.clone()))))
                    .await? as usize;
            }
        }

        transaction.commit().await?;
        if stats.deleted_voyage_media + stats.deleted_voyage_passengers > 0 {
            info!(
                "✂️ [RECONCILE]: {voyage_slug}: joins pruned vm={} vp={} media={} people={}",
                stats.deleted_voyage_media, stats.deleted_voyage_passengers, stats.deleted_media, stats.deleted_people
            );
        }
        Ok(stats)
    }

    /// Reconciliación global: todo voyage ausente del set deseado se
    /// retira junto con sus filas join. El almacén de objetos jamás se
    /// poda desde aquí.
    pub async fn prune_missing_voyages(
        &self,
        desired_voyage_slugs: &HashSet<String>,
        dry_run: bool,
    ) -> Result<GlobalDbPruneStats, DbError> {
        let connection = self.database_client.connection()?;
        let mut stats = GlobalDbPruneStats::default();

        let desired: Vec<Value> = desired_voyage_slugs.iter().map(|s| Value::Text(s.clone())).collect();
        let not_in_clause = if desired.is_empty() {
            String::new()
        } else {
            format!(" WHERE voyage_slug NOT IN ({})", placeholders(1, desired.len()))
        };

        if dry_run {
            let sql = format!("SELECT COUNT(*) FROM voyages{not_in_clause}");
            let mut rows = connection.query(&sql, params_from_iter(desired.clone())).await?;
            if let Some(row) = rows.next().await? {
                stats.deleted_voyages = row.get::<i64>(0)? as usize;
            }
            warn!("🧪 [RECONCILE/DRY]: Would prune {} voyage row(s) globally", stats.deleted_voyages);
            return Ok(stats);
        }

        let transaction = connection.transaction().await?;

        let vm_sql = format!("DELETE FROM voyage_media{not_in_clause}");
        stats.deleted_voyage_media =
            transaction.execute(&vm_sql, params_from_iter(desired.clone())).await? as usize;

        let vp_sql = format!("DELETE FROM voyage_passengers{not_in_clause}");
        stats.deleted_voyage_passengers =
            transaction.execute(&vp_sql, params_from_iter(desired.clone())).await? as usize;

        let voyages_sql = format!("DELETE FROM voyages{not_in_clause}");
        stats.deleted_voyages = transaction.execute(&voyages_sql, params_from_iter(desired)).await? as usize;

        transaction.commit().await?;
        if stats.deleted_voyages > 0 {
            info!(
                "🌐 [RECONCILE]: Global prune removed {} voyage(s), vm={} vp={}",
                stats.deleted_voyages, stats.deleted_voyage_media, stats.deleted_voyage_passengers
            );
        }
        Ok(stats)
    }
}
