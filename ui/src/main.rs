//! Heimdall UI Entry Point
//!
//! Reads the viewer configuration from the host page, initializes logging
//! and mounts the Leptos app to the DOM.
//!
//! The host may embed a TOML configuration:
//!
//! ```html
//! <script id="heimdall-config" type="application/toml">
//! base_url = "http://heimdall.internal:8080"
//! auto_refresh_interval_ms = 5000
//! </script>
//! ```

use heimdall_shared::ViewerConfig;
use heimdall_ui::App;
use leptos::*;
use tracing_wasm::WASMLayerConfigBuilder;

const CONFIG_ELEMENT_ID: &str = "heimdall-config";

fn main() {
    let embedded = document()
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content());
    let (viewer_config, config_error) = match embedded.as_deref().map(ViewerConfig::from_toml) {
        None => (ViewerConfig::default(), None),
        Some(Ok(config)) => (config, None),
        Some(Err(err)) => (ViewerConfig::default(), Some(err)),
    };

    let level = viewer_config
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::DEBUG);
    let config = WASMLayerConfigBuilder::default()
        .set_max_level(level)
        .build();
    tracing_wasm::set_as_global_default_with_config(config);

    if let Some(err) = config_error {
        tracing::warn!("ignoring embedded config #{}: {}", CONFIG_ELEMENT_ID, err);
    }
    tracing::info!("Starting Heimdall UI");

    mount_to_body(move || view! { <App config=viewer_config /> });
}
