// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: build configuration file
fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("PATH")
        .default_value("build.toml")
        .help("Build configuration file")
}

fn build_cli() -> Command {
    Command::new("curator")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Dependency curation and conditional extension resolution")
        .subcommand_required(false)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve the application classpath, activating conditional dependencies")
                .arg(config_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the result as JSON"),
                )
                .arg(
                    Arg::new("manifest")
                        .long("manifest")
                        .action(ArgAction::SetTrue)
                        .help("Write runtime.classpath and deployment.classpath"),
                ),
        )
        .subcommand(
            Command::new("curate")
                .about("Apply the update policy to declared dependencies")
                .arg(config_arg())
                .arg(
                    Arg::new("policy")
                        .long("policy")
                        .value_parser(["none", "next-micro", "next-minor", "next-major"])
                        .help("Override the configured update policy"),
                )
                .arg(
                    Arg::new("origin")
                        .long("origin")
                        .value_parser(["declared", "last-update"])
                        .help("Override where curation starts from"),
                )
                .arg(
                    Arg::new("dry_run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Show updates without writing curation state"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Validate the configuration and the artifact catalog")
                .arg(config_arg()),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("curator.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
