// Build script for flutter_rust_bridge code generation
//
// Dart bindings for src/api.rs are generated with the CLI tool:
//   flutter_rust_bridge_codegen generate
//
// Running codegen from build.rs would make every cargo build depend on the
// Flutter toolchain, so it stays a manual step.

fn main() {
    // Tell cargo to rerun this build script if api.rs changes
    println!("cargo:rerun-if-changed=src/api.rs");
}
