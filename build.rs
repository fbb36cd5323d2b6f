//! Build script for generating shell completions and man page.
//!
//! Generates assets at build time for packaging.

use std::env;
use std::fs;

use clap::CommandFactory;
use clap_complete::{generate_to, Shell};
use clap_mangen::Man;

// Share the argument definitions with the binary
#[allow(dead_code)]
#[path = "src/cli/args.rs"]
mod args;

fn main() {
    println!("cargo:rerun-if-changed=src/cli/args.rs");
    println!("cargo:rerun-if-env-changed=LOCALSQL_GENERATE_ASSETS");

    // Only generate during release builds or when explicitly requested
    let profile = env::var("PROFILE").unwrap_or_default();
    let force_generate = env::var("LOCALSQL_GENERATE_ASSETS").is_ok();

    if profile != "release" && !force_generate {
        return;
    }

    let out_dir = std::path::PathBuf::from(
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"),
    )
    .join("target")
    .join("assets");

    fs::create_dir_all(&out_dir).expect("Failed to create assets directory");

    let mut cmd = args::Args::command();
    cmd = cmd.name("localsql");

    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        let path = generate_to(shell, &mut cmd, "localsql", &out_dir)
            .expect("Failed to generate completions");
        println!("cargo:warning=Generated completion: {}", path.display());
    }

    // Rename zsh completion to expected name
    let zsh_src = out_dir.join("_localsql");
    let zsh_dst = out_dir.join("localsql.zsh");
    if zsh_src.exists() {
        let _ = fs::rename(&zsh_src, &zsh_dst);
    }

    let man = Man::new(cmd);
    let man_path = out_dir.join("localsql.1");
    let mut man_file = fs::File::create(&man_path).expect("Failed to create man page file");
    man.render(&mut man_file).expect("Failed to render man page");
    println!("cargo:warning=Generated man page: {}", man_path.display());
}
