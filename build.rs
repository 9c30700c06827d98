fn main() {
    // Build-time credentials are baked in via `option_env!` in config.rs.
    println!("cargo:rerun-if-env-changed=WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WIFI_PASSWORD");
    println!("cargo:rerun-if-env-changed=OSC_TARGET");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
