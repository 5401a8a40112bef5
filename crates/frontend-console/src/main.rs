use panel_frontend_console::App;

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    panel_frontend_common::logging::init();
    yew::Renderer::<App>::new().render();
}
