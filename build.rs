fn main() {
    // The Tauri context (config, icons, bundled pages) is only generated for
    // the desktop shell; the orchestration core builds without it.
    #[cfg(feature = "desktop")]
    {
        tauri_build::build();
    }
}
