use anyhow::{Context, Result};
use skilllinkup_core::config::MANIFEST_FILE;
use skilllinkup_core::load_site;
use skilllinkup_generator::{GeneratedSite, RenderOptions, generate_site};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Build static site for deployment
pub async fn run(path: PathBuf, output: PathBuf) -> Result<()> {
    println!("🔨 Building static site...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    if !path.join(MANIFEST_FILE).exists() {
        anyhow::bail!("{} not found in {}", MANIFEST_FILE, path.display());
    }

    let site = load_site(&path).context("Failed to load site")?;

    println!("✓ Loaded: {}", site.info.name);
    println!("  URL: {}", site.info.url);
    println!("  Pages: {}", site.pages.len());
    println!();

    println!("📄 Rendering pages...");
    let generated = generate_site(&site, RenderOptions::default())?;
    let written = write_generated(&generated, &output)?;
    println!("   ✓ Wrote {} files", written);

    println!("🎨 Copying static files...");
    let copied = copy_static(&path.join("static"), &output.join("static"))?;
    println!("   ✓ Copied {} static files", copied);

    println!();
    println!("✅ Build complete!");
    println!("   Output: {}", output.display());
    println!();
    println!("To test locally:");
    println!("   cd {} && python3 -m http.server 8000", output.display());
    println!();

    Ok(())
}

/// Write rendered pages and assets below `output`
fn write_generated(generated: &GeneratedSite, output: &Path) -> Result<usize> {
    fs::create_dir_all(output).context("Failed to create output directory")?;

    let files = generated
        .pages
        .iter()
        .map(|(p, html)| (p, html.as_bytes()))
        .chain(generated.assets.iter().map(|(p, data)| (p, data.as_slice())));

    let mut count = 0;
    for (relative, data) in files {
        let dst = output.join(relative);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&dst, data).with_context(|| format!("Failed to write {}", dst.display()))?;
        count += 1;
    }
    Ok(count)
}

fn copy_static(src: &Path, dst: &Path) -> Result<usize> {
    if !src.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(src)?;
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
            count += 1;
        }
    }
    Ok(count)
}
