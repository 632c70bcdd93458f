fn main() {
    // option_env!() values are cached by cargo unless we ask for a rebuild.
    println!("cargo:rerun-if-env-changed=POSTBOARD_DEFAULT_API_URL");
}
