use std::fs::{self, File};
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context as _;

mod fetch;

struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        println!(
            "{level:<5} {file}:{line} > {text}",
            level = record.level(),
            file = record.file().unwrap_or_else(|| record.target()),
            line = record
                .line()
                .map_or_else(|| "??".to_string(), |line| line.to_string()),
            text = record.args(),
        );
    }

    fn flush(&self) {}
}

impl Logger {
    fn init() {
        log::set_logger(&Logger).expect("could not set logger");
        log::set_max_level(log::LevelFilter::Info);
    }
}

/// where things are read from and written to. everything is relative to the working directory.
///
/// NOTE: `src/` is the consumer's source dir; running this from the gl3w-gen checkout itself puts
/// `gl3w.cpp` and `gl3w_procs.rs` next to `main.rs`.
pub struct Layout {
    pub glcorearb: PathBuf,
    pub glcorearb_url: String,
    pub header: PathBuf,
    pub source: PathBuf,
    pub rust_procs: PathBuf,
}

impl Layout {
    pub fn in_dir(root: &Path) -> Self {
        Self {
            glcorearb: root.join("include/GL/glcorearb.h"),
            glcorearb_url: fetch::GLCOREARB_URL.to_string(),
            header: root.join("include/GL/gl3w.h"),
            source: root.join("src/gl3w.cpp"),
            rust_procs: root.join("src/gl3w_procs.rs"),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::in_dir(Path::new(""))
    }
}

fn write_file(
    path: &Path,
    emit: impl FnOnce(&mut BufWriter<File>) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    log::info!("generating {}", path.display());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("could not create {}", parent.display()))?;
    }
    let mut w = BufWriter::new(
        File::create(path).with_context(|| format!("could not create {}", path.display()))?,
    );
    emit(&mut w)?;
    w.flush()
        .with_context(|| format!("could not write {}", path.display()))?;
    Ok(())
}

fn generate(layout: &Layout) -> anyhow::Result<()> {
    let glcorearb = fetch::fetch_header(layout).context("could not fetch glcorearb.h")?;

    log::info!("parsing {}", layout.glcorearb.display());
    let commands = gl3w_generator::parse_commands(&glcorearb);
    log::info!("found {} entry points", commands.len());

    write_file(&layout.header, |w| gl3w_generator::emit_header(w, &commands))?;
    write_file(&layout.source, |w| gl3w_generator::emit_source(w, &commands))?;
    write_file(&layout.rust_procs, |w| {
        gl3w_generator::emit_rust_procs(w, &commands)
    })?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    Logger::init();
    generate(&Layout::default())
}
