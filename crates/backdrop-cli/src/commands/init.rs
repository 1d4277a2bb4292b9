//! Page initialization command

use anyhow::{Context, Result};
use backdrop_page::PageFile;
use std::fs;
use std::path::Path;

pub fn run(name: &str) -> Result<()> {
    let path = format!("{}.toml", name);
    write_sample(name, Path::new(&path))?;

    println!("Created page '{}'", path);
    println!();
    println!("Next steps:");
    println!("  backdrop inspect {}", path);
    println!("  backdrop run {}", path);
    println!("  backdrop render {} --output render", path);

    Ok(())
}

fn write_sample(name: &str, path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("File '{}' already exists", path.display());
    }
    let content = PageFile::sample(name).to_toml_string()?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
