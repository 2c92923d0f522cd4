use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();

    // `link.x` INCLUDEs the memory map, so put it where the linker looks.
    fs::copy(manifest_dir.join("memory.x"), out_dir.join("memory.x")).unwrap();
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Only bare-metal images get the firmware linker script; host builds
    // (tests, the layout listing) link as ordinary programs.
    if os == "none" {
        println!("cargo:rustc-link-arg=-T{}", manifest_dir.join("link.x").display());
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=link.x");
    println!("cargo:rerun-if-changed=build.rs");
}
