//! Build script for quarterdiff - locates a system DuckDB when not bundled

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=DUCKDB_LIB_PATH");

    // The bundled feature compiles DuckDB from source, nothing to link against
    if env::var("CARGO_FEATURE_BUNDLED").is_ok() {
        return;
    }

    if env::var("SKIP_DUCKDB_DETECTION").is_ok() {
        println!("cargo:warning=Skipping DuckDB detection");
        println!("cargo:rustc-link-lib=duckdb");
        return;
    }

    match find_duckdb_library() {
        Some(lib_path) => {
            println!("cargo:rustc-link-search=native={}", lib_path.display());
            println!("cargo:rustc-link-lib=duckdb");
        }
        None => {
            eprintln!("❌ DuckDB library not found!");
            eprintln!();
            eprintln!("Build with the bundled engine:  cargo build --features bundled");
            eprintln!("or point at an install:         export DUCKDB_LIB_PATH=/path/to/duckdb/lib");
            panic!("DuckDB library not found");
        }
    }
}

fn find_duckdb_library() -> Option<PathBuf> {
    if let Ok(path) = env::var("DUCKDB_LIB_PATH") {
        let path_buf = PathBuf::from(path);
        if has_duckdb_library(&path_buf) {
            return Some(path_buf);
        }
    }

    if !cfg!(target_os = "windows") {
        if let Ok(output) = Command::new("pkg-config")
            .args(["--libs-only-L", "duckdb"])
            .output()
        {
            if output.status.success() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let found = stdout
                    .split_whitespace()
                    .filter_map(|flag| flag.strip_prefix("-L"))
                    .map(PathBuf::from)
                    .find(|path| has_duckdb_library(path));
                if found.is_some() {
                    return found;
                }
            }
        }
    }

    let candidates: &[&str] = if cfg!(target_os = "macos") {
        &["/opt/homebrew/lib", "/usr/local/lib", "/opt/local/lib"]
    } else if cfg!(target_os = "windows") {
        &["C:\\Program Files\\DuckDB\\lib", "C:\\duckdb\\lib"]
    } else {
        &["/usr/lib", "/usr/local/lib", "/usr/lib/x86_64-linux-gnu", "/usr/lib64"]
    };

    candidates
        .iter()
        .map(PathBuf::from)
        .find(|path| has_duckdb_library(path))
}

fn has_duckdb_library(path: &Path) -> bool {
    let names: &[&str] = if cfg!(target_os = "windows") {
        &["duckdb.dll", "duckdb.lib"]
    } else if cfg!(target_os = "macos") {
        &["libduckdb.dylib", "libduckdb.a"]
    } else {
        &["libduckdb.so", "libduckdb.so.1", "libduckdb.a"]
    };

    path.is_dir() && names.iter().any(|name| path.join(name).exists())
}
