use std::fs;

use anyhow::{Context as _, bail};

use crate::Layout;

pub const GLCOREARB_URL: &str = "https://registry.khronos.org/OpenGL/api/GL/glcorearb.h";

/// returns the contents of the cached header, downloading it first if it's not there yet.
pub fn fetch_header(layout: &Layout) -> anyhow::Result<String> {
    let path = &layout.glcorearb;

    if path.exists() {
        log::info!("reusing {}", path.display());
        return fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()));
    }

    log::info!("downloading {} to {}", layout.glcorearb_url, path.display());
    let response = reqwest::blocking::get(&layout.glcorearb_url)
        .with_context(|| format!("could not get {}", layout.glcorearb_url))?;
    let status = response.status();
    if !status.is_success() {
        bail!("could not get {}: {status}", layout.glcorearb_url);
    }
    let text = response.text().context("could not read response body")?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("could not create {}", parent.display()))?;
    }
    fs::write(path, &text).with_context(|| format!("could not write {}", path.display()))?;

    Ok(text)
}
