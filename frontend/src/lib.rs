pub mod api;
pub mod app;
pub mod bindings;
pub mod components;
pub mod logging;
pub mod pages;
pub mod repo;
pub mod storage;
pub mod utils;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init();
    leptos::mount_to_body(app::App);
}
