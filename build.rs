use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Debug vs Release configurations
    if env::var("PROFILE").map(|p| p == "debug").unwrap_or(false) {
        println!("cargo:rustc-cfg=feature=\"debug\"");
    }

    // Host builds only run the portable scheduler and driver logic under test
    let target = env::var("TARGET").unwrap_or_default();
    if !target.contains("avr") {
        return;
    }

    // Configure for ATmega128
    println!("cargo:rustc-link-arg-bins=-mmcu=atmega128");
    println!("cargo:warning=Building for ATmega128 at 16MHz");
}
