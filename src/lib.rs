// cargo: dep = "yew"
// cargo: dep = "serde"
// cargo: dep = "serde_json"
// cargo: dep = "pulldown-cmark"
// cargo: dep = "wasm-bindgen"
// cargo: dep = "web-sys"
// cargo: dep = "uuid"
// cargo: dep = "js-sys"
// cargo: dep = "anyhow"
// cargo: dep = "thiserror"
// cargo: dep = "tracing"
// cargo: dep = "tracing-wasm"
// cargo: dep = "chrono"
// cargo: dep = "console_error_panic_hook"

mod app;
mod components;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
mod utils;

use wasm_bindgen::prelude::*;
use app::{App, AppProps};
use config::AppConfig;

#[wasm_bindgen(start)]
pub fn run_app() {
    utils::set_panic_hook();
    let config = AppConfig::default();
    utils::init_tracing(config.tracing_level());
    yew::Renderer::<App>::with_props(AppProps { config }).render();
}
