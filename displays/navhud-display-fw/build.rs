//! Build script for navhud-display-fw
//!
//! - Sets up linker search paths for memory.x
//! - Validates navhud.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use navhud_core::config::{ConfigError, HudConfig};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate navhud.toml at compile time
///
/// The firmware parses the same file again at boot with its own reader.
fn validate_config() {
    println!("cargo:rerun-if-changed=navhud.toml");

    let config_path = Path::new("navhud.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: navhud.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a navhud.toml configuration file.         ║\n\
            ║  Please create one in the navhud-display-fw directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read navhud.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Syntax, unknown keys and value types
    let config: HudConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid navhud.toml                                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    // Value ranges
    if let Err(e) = config.validate() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid value in navhud.toml                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            ║  • {:<62} ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            describe(e)
        );
    }

    // The on-device reader must agree with the toml crate
    match navhud_core::parse_config(&config_content) {
        Ok(parsed) if parsed == config => {}
        Ok(_) => panic!("navhud.toml: on-device parser disagrees with toml crate"),
        Err(e) => panic!("navhud.toml: on-device parser rejected file: {:?}", e),
    }

    println!("cargo:warning=navhud.toml validated successfully");
}

fn describe(error: ConfigError) -> &'static str {
    match error {
        ConfigError::EmptyDeviceName => "[link] device_name must not be empty",
        ConfigError::ZeroSessionTimeout => "[link] session_timeout_ms must be > 0",
        ConfigError::ZeroTickInterval => "[link] tick_interval_ms must be > 0",
        ConfigError::TickSlowerThanTimeout => {
            "[link] tick_interval_ms must not exceed session_timeout_ms"
        }
        ConfigError::InvalidI2cAddress => "[display] i2c_address must be 0x08-0x77",
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
