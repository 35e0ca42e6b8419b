#[cfg(feature = "csr")]
fn main() {
    use partner_portal::App;

    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    leptos::mount::mount_to_body(App);
}

#[cfg(not(feature = "csr"))]
pub fn main() {
    // The portal only runs in the browser. Build with `--features csr`, e.g. through Trunk.
}
