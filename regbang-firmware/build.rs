//! Build script for regbang-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates link.toml and compiles it into `$OUT_DIR/link.rs`

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    setup_linker(&out_dir);
    generate_link_config(&out_dir);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Link settings after validation
struct LinkSettings {
    baud: u32,
    read_reserved: bool,
    write_reserved: bool,
    status_poll_ms: u64,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            baud: 115_200,
            read_reserved: false,
            write_reserved: false,
            status_poll_ms: 100,
        }
    }
}

/// Validate link.toml and write it out as Rust constants
fn generate_link_config(out_dir: &Path) {
    println!("cargo:rerun-if-changed=link.toml");

    let config_path = Path::new("link.toml");
    let settings = if config_path.exists() {
        let content = match fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(e) => fail("Failed to read link.toml", &[e.to_string()]),
        };
        let config: toml::Value = match toml::from_str(&content) {
            Ok(value) => value,
            Err(e) => fail("Invalid TOML syntax in link.toml", &[e.to_string()]),
        };
        validate_link(&config)
    } else {
        println!("cargo:warning=link.toml not found, using 115200 baud canonical frames");
        LinkSettings::default()
    };

    let generated = format!(
        "/// Serial line rate\n\
         pub const BAUD: u32 = {};\n\
         /// Reserved zero byte in read frames\n\
         pub const READ_RESERVED: bool = {};\n\
         /// Reserved zero byte in write frames\n\
         pub const WRITE_RESERVED: bool = {};\n\
         /// Status port poll interval\n\
         pub const STATUS_POLL_MS: u64 = {};\n",
        settings.baud, settings.read_reserved, settings.write_reserved, settings.status_poll_ms
    );
    fs::write(out_dir.join("link.rs"), generated).unwrap();
}

/// Check the `[link]` table, collecting every problem before failing
fn validate_link(config: &toml::Value) -> LinkSettings {
    let mut settings = LinkSettings::default();
    let link = match config.get("link") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => fail("Invalid link configuration", &["[link] must be a table".into()]),
        None => return settings,
    };

    let mut errors = Vec::new();

    for key in link.keys() {
        if !["baud", "read_reserved", "write_reserved", "status_poll_ms"].contains(&key.as_str()) {
            errors.push(format!("[link] unknown key '{}'", key));
        }
    }

    match link.get("baud") {
        Some(toml::Value::Integer(baud)) if *baud > 0 && *baud <= 1_000_000 => {
            settings.baud = *baud as u32;
        }
        Some(_) => errors.push("[link] baud must be 1-1000000".into()),
        None => {}
    }

    for (key, slot) in [
        ("read_reserved", &mut settings.read_reserved),
        ("write_reserved", &mut settings.write_reserved),
    ] {
        match link.get(key) {
            Some(toml::Value::Boolean(value)) => *slot = *value,
            Some(_) => errors.push(format!("[link] {} must be true or false", key)),
            None => {}
        }
    }

    match link.get("status_poll_ms") {
        Some(toml::Value::Integer(ms)) if *ms > 0 => settings.status_poll_ms = *ms as u64,
        Some(_) => errors.push("[link] status_poll_ms must be positive".into()),
        None => {}
    }

    if !errors.is_empty() {
        fail("Invalid link configuration", &errors);
    }
    settings
}

/// Abort the build with a boxed error report
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
