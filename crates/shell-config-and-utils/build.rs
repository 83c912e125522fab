fn main() {
    // option_env!() values are cached unless cargo is told to watch them.
    println!("cargo:rerun-if-env-changed=SOHWAGI_API_URL");
    println!("cargo:rerun-if-env-changed=SOHWAGI_WEB_APP_URL");
}
