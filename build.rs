#[path = "src/cli.rs"]
mod cli;

use clap::CommandFactory;
use clap_complete::generate_to;
use clap_complete::shells::{Bash, Elvish, Fish, PowerShell, Zsh};
use cli::JwsoxArgs;
use std::{fs, io};

fn main() -> io::Result<()> {
    // Completions are written into the package directory, so only rerun
    // when the CLI definition changes.
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/cli.rs");
    generate_completions()
}

fn generate_completions() -> io::Result<()> {
    const BIN_NAME: &str = env!("CARGO_PKG_NAME");
    const OUT_DIR: &str = "contrib/completions";
    let cmd = &mut JwsoxArgs::command();

    fs::create_dir_all(OUT_DIR)?;

    generate_to(Bash, cmd, BIN_NAME, OUT_DIR)?;
    generate_to(Elvish, cmd, BIN_NAME, OUT_DIR)?;
    generate_to(Fish, cmd, BIN_NAME, OUT_DIR)?;
    generate_to(PowerShell, cmd, BIN_NAME, OUT_DIR)?;
    generate_to(Zsh, cmd, BIN_NAME, OUT_DIR)?;

    Ok(())
}
