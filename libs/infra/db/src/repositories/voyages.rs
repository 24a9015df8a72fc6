// [libs/infra/db/src/repositories/voyages.rs]
/*!
 * =================================================================
 * APARATO: VOYAGE REPOSITORY (V4.8 - ACID PER VOYAGE)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: UPSERT TRANSACCIONAL DE UN PAQUETE COMPLETO
 *
 * # Logic:
 * Orden interno fijo: fila voyage, maestros people, maestros media,
 * joins voyage_passengers y voyage_media. Cualquier fallo revierte la
 * transacción y aflora con el voyage_slug a bordo.
 * =================================================================
 */

use libsql::{params_from_iter, Transaction, Value};
use tracing::info;

use sequoia_core_slugger::media_sort_order;
use sequoia_domain_models::{MediaLinkSet, VoyageBundle};

use crate::client::SequoiaDbClient;
use crate::errors::DbError;
use crate::normalize::{nd, nint, ns, nt, nurls, nyear};

const UPSERT_VOYAGE_SQL: &str = r#"
    INSERT INTO voyages (
        voyage_slug, title, start_date, end_date, start_time, end_time,
        origin, destination, vessel_name, voyage_type,
        summary_markdown, source_urls, tags, president_slug
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
    ON CONFLICT(voyage_slug) DO UPDATE SET
        title            = excluded.title,
        start_date       = excluded.start_date,
        end_date         = excluded.end_date,
        start_time       = excluded.start_time,
        end_time         = excluded.end_time,
        origin           = excluded.origin,
        destination      = excluded.destination,
        vessel_name      = excluded.vessel_name,
        voyage_type      = excluded.voyage_type,
        summary_markdown = excluded.summary_markdown,
        source_urls      = excluded.source_urls,
        tags             = excluded.tags,
        president_slug   = excluded.president_slug
"#;

const UPSERT_PERSON_SQL: &str = r#"
    INSERT INTO people (
        person_slug, full_name, role_title, organization,
        birth_year, death_year, wikipedia_url, notes_internal, tags
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
    ON CONFLICT(person_slug) DO UPDATE SET
        full_name      = excluded.full_name,
        role_title     = excluded.role_title,
        organization   = excluded.organization,
        birth_year     = excluded.birth_year,
        death_year     = excluded.death_year,
        wikipedia_url  = excluded.wikipedia_url,
        notes_internal = excluded.notes_internal,
        tags           = excluded.tags
"#;

const UPSERT_MEDIA_SQL: &str = r#"
    INSERT INTO media (
        media_slug, title, media_type, s3_url, public_derivative_url,
        credit, date, description_markdown, tags, google_drive_link
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
    ON CONFLICT(media_slug) DO UPDATE SET
        title                 = excluded.title,
        media_type            = excluded.media_type,
        s3_url                = excluded.s3_url,
        public_derivative_url = excluded.public_derivative_url,
        credit                = excluded.credit,
        date                  = excluded.date,
        description_markdown  = excluded.description_markdown,
        tags                  = excluded.tags,
        google_drive_link     = excluded.google_drive_link
"#;

const UPSERT_VOYAGE_PASSENGER_SQL: &str = r#"
    INSERT INTO voyage_passengers (voyage_slug, person_slug, capacity_role, notes)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(voyage_slug, person_slug) DO UPDATE SET
        capacity_role = excluded.capacity_role,
        notes         = excluded.notes
"#;

const UPSERT_VOYAGE_MEDIA_SQL: &str = r#"
    INSERT INTO voyage_media (voyage_slug, media_slug, sort_order, notes)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(voyage_slug, media_slug) DO UPDATE SET
        sort_order = COALESCE(excluded.sort_order, voyage_media.sort_order),
        notes      = excluded.notes
"#;

pub struct VoyageRepository {
    database_client: SequoiaDbClient,
}

impl VoyageRepository {
    pub fn new(client: SequoiaDbClient) -> Self {
        Self { database_client: client }
    }

    /// Upsert de voyage, maestros y joins en una única transacción.
    pub async fn upsert_bundle(&self, bundle: &VoyageBundle, links: &MediaLinkSet) -> Result<(), DbError> {
        let voyage_slug = bundle.voyage.voyage_slug.clone();
        let connection = self.database_client.connection()?;
        let transaction = connection.transaction().await?;

        match Self::apply_bundle(&transaction, bundle, links).await {
            Ok(()) => {
                transaction.commit().await?;
                info!("💾 [DATABASE]: Upsert complete for voyage {voyage_slug}");
                Ok(())
            }
            Err(fault) => {
                let _ = transaction.rollback().await;
                Err(DbError::VoyageTransaction { voyage_slug, detail: fault.to_string() })
            }
        }
    }

    async fn apply_bundle(
        transaction: &Transaction,
        bundle: &VoyageBundle,
        links: &MediaLinkSet,
    ) -> Result<(), DbError> {
        let voyage = &bundle.voyage;
        let voyage_slug = voyage.voyage_slug.trim().to_string();

        // 1) Fila maestra del voyage
        transaction
            .execute(
                UPSERT_VOYAGE_SQL,
                params_from_iter(vec![
                    Value::Text(voyage_slug.clone()),
                    ns(Some(voyage.title.as_str())),
                    nd(Some(voyage.start_date.as_str()))?,
                    nd(voyage.end_date.as_deref())?,
                    nt(voyage.start_time.as_deref())?,
                    nt(voyage.end_time.as_deref())?,
                    ns(voyage.origin.as_deref()),
                    ns(voyage.destination.as_deref()),
                    ns(voyage.vessel_name.as_deref()),
                    ns(voyage.voyage_type.as_deref()),
                    ns(voyage.summary_markdown.as_deref()),
                    nurls(&voyage.source_urls),
                    ns(voyage.tags.as_deref()),
                    ns(Some(voyage.president_slug.as_str())),
                ]),
            )
            .await?;

        // 2) Maestros de personas
        for person in &bundle.passengers {
            transaction
                .execute(
                    UPSERT_PERSON_SQL,
                    params_from_iter(vec![
                        ns(Some(person.person_slug.as_str())),
                        ns(person.full_name.as_deref()),
                        ns(person.role_title.as_deref()),
                        ns(person.organization.as_deref()),
                        nyear(person.birth_year.as_deref())?,
                        nyear(person.death_year.as_deref())?,
                        ns(person.wikipedia_url.as_deref()),
                        ns(person.notes_internal.as_deref()),
                        ns(person.tags.as_deref()),
                    ]),
                )
                .await?;
        }

        // 3) Maestros de media (URLs desde el mapa del fetcher)
        for item in &bundle.media {
            let outcome = links.get(&item.media_slug);
            transaction
                .execute(
                    UPSERT_MEDIA_SQL,
                    params_from_iter(vec![
                        ns(Some(item.media_slug.as_str())),
                        ns(item.title.as_deref()),
                        ns(item.media_type.as_deref()),
                        ns(outcome.and_then(|o| o.s3_url.as_deref())),
                        ns(outcome.and_then(|o| o.public_derivative_url.as_deref())),
                        ns(Some(item.credit.as_str())),
                        nd(Some(item.date.as_str()))?,
                        ns(item.description_markdown.as_deref()),
                        ns(item.tags.as_deref()),
                        ns(Some(item.google_drive_link.as_str())),
                    ]),
                )
                .await?;
        }

        // 4) Join voyage_passengers
        for person in &bundle.passengers {
            transaction
                .execute(
                    UPSERT_VOYAGE_PASSENGER_SQL,
                    params_from_iter(vec![
                        Value::Text(voyage_slug.clone()),
                        ns(Some(person.person_slug.as_str())),
                        ns(person.capacity_role.as_deref()),
                        Value::Null,
                    ]),
                )
                .await?;
        }

        // 5) Join voyage_media; sort_order desde los dígitos finales del slug
        for item in &bundle.media {
            transaction
                .execute(
                    UPSERT_VOYAGE_MEDIA_SQL,
                    params_from_iter(vec![
                        Value::Text(voyage_slug.clone()),
                        ns(Some(item.media_slug.as_str())),
                        nint(media_sort_order(&item.media_slug)),
                        Value::Null,
                    ]),
                )
                .await?;
        }

        Ok(())
    }
}
