use std::env;
use std::path::PathBuf;

const LINKAGE_FEATURES: [&str; 4] = ["LIB_MT", "LIB_MD", "DLL_STATIC", "DLL_RUNTIME"];

fn main() {
    let linkage = select_linkage();
    check_address_width();
    emit_link_directives(linkage);

    println!("cargo:rerun-if-env-changed=ZLIBWAPI_LIB_DIR");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Exactly one linkage feature may be enabled.
fn select_linkage() -> &'static str {
    let enabled: Vec<&'static str> = LINKAGE_FEATURES
        .iter()
        .copied()
        .filter(|feature| env::var_os(format!("CARGO_FEATURE_{}", feature)).is_some())
        .collect();

    match enabled.as_slice() {
        [one] => *one,
        [] => panic!(
            "zlibwapi-test: no linkage mode selected; enable one of lib-mt, lib-md, dll-static, dll-runtime"
        ),
        many => panic!(
            "zlibwapi-test: conflicting linkage modes {:?}; build with --no-default-features and a single mode",
            many
        ),
    }
}

fn check_address_width() {
    let width = env::var("CARGO_CFG_TARGET_POINTER_WIDTH").unwrap_or_default();
    if width != "32" && width != "64" {
        panic!("zlibwapi-test: unsupported target pointer width '{}'", width);
    }
}

fn emit_link_directives(linkage: &str) {
    let kind = match linkage {
        "LIB_MT" | "LIB_MD" => "static",
        "DLL_STATIC" => "dylib",
        _ => return,
    };

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let name = if target_os == "windows" { "zlibwapi" } else { "z" };

    if let Some(dir) = env::var_os("ZLIBWAPI_LIB_DIR") {
        let dir = PathBuf::from(dir);
        println!("cargo:rustc-link-search=native={}", dir.display());
    }
    println!("cargo:rustc-link-lib={}={}", kind, name);
}
