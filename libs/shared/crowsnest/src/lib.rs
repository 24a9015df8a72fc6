// [libs/shared/crowsnest/src/lib.rs]
/*!
 * =================================================================
 * APARATO: CROWSNEST OBSERVER (V4.0 - PANIC SHIELDED)
 * CLASIFICACIÓN: SHARED UTILITY (ESTRATO L4)
 * RESPONSABILIDAD: TELEMETRÍA, TRAZADO Y CAPTURA DE PÁNICOS
 *
 * # Comportamiento:
 * - Desarrollo: logs interactivos con color y marcas de tiempo locales.
 * - Producción: estructura JSON plana para la ingesta de la plataforma.
 * =================================================================
 */

use std::panic;

use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as formatting_layer, EnvFilter};

/// Inicializa el sistema de trazas con blindaje de pánicos.
///
/// El filtro prioriza el dominio propio y silencia el ruido de
/// infraestructura (hyper, reqwest, libsql). Panica si otro suscriptor
/// global ya fue inicializado en el runtime.
pub fn init_tracing(service_identifier: &str) {
    let environmental_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "{service_identifier}={level},hyper=warn,reqwest=warn,libsql=error",
            level = if cfg!(debug_assertions) { "debug" } else { "info" }
        )
        .into()
    });

    let is_production = !cfg!(debug_assertions);
    if is_production {
        tracing_subscriber::registry()
            .with(environmental_filter)
            .with(formatting_layer::layer().json().flatten_event(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(environmental_filter)
            .with(formatting_layer::layer().with_target(false))
            .init();
    }

    install_panic_hook();
}

/// Hook de pánico: el rastro queda en el log estructurado antes de caer.
fn install_panic_hook() {
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let panic_location = panic_info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());
        error!("💥 [PANIC]: Unrecoverable fault at {panic_location}: {panic_info}");
        previous_hook(panic_info);
    }));
}
