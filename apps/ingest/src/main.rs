// [apps/ingest/src/main.rs]
/*!
 * =================================================================
 * APARATO: INGEST SHELL (V4.9 - ENTRY POINT)
 * CLASIFICACIÓN: APPLICATION LAYER (ENTRY POINT)
 * RESPONSABILIDAD: BOOTSTRAP DE ENTORNO E IGNICIÓN DEL PIPELINE
 *
 * # Errors:
 * - `CONFIG_FAULT`: entorno incompleto o credenciales inválidas; el
 *   proceso aborta con salida no-cero antes de cualquier I/O remoto.
 * =================================================================
 */

use anyhow::Result;
use clap::Parser;
use tracing::info;

use sequoia_ingest_lib::config::IngestDirectives;
use sequoia_ingest_lib::pipeline::IngestPipeline;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. ENTORNO Y OBSERVABILIDAD
    dotenvy::dotenv().ok();
    sequoia_shared_crowsnest::init_tracing("sequoia_ingest");

    info!("💠 [SHELL]: === Sequoia Voyage Ingest ===");

    // 2. DIRECTIVAS ESTRATÉGICAS (falla antes de todo I/O)
    let directives = IngestDirectives::parse();
    let config = directives.into_config()?;

    // 3. ENSAMBLADO DE LA SESIÓN E IGNICIÓN
    let pipeline = IngestPipeline::assemble(config).await?;
    pipeline.execute().await?;

    Ok(())
}
