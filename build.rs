use std::env;

fn main() {
    // ESP-IDF link arguments and cfg flags only make sense for the firmware target,
    // host builds (unit tests) skip them.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    println!("cargo:rerun-if-changed=build.rs");
}
