use skilllinkup_validator::validate_site;
use std::path::PathBuf;

pub async fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating site at: {}", path.display());

    let report = validate_site(&path);

    for line in &report.info {
        println!("  ✓ {}", line);
    }
    for warning in &report.warnings {
        println!("  ⚠ {}", warning);
    }
    for error in &report.errors {
        eprintln!("  ✗ {}", error);
    }

    if !report.is_ok() {
        anyhow::bail!(
            "Validation failed with {} error(s) and {} warning(s)",
            report.errors.len(),
            report.warnings.len()
        );
    }

    println!(
        "\n✅ Site valid ({} warning(s))",
        report.warnings.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn shipped_site() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../site")
    }

    #[tokio::test]
    async fn test_shipped_site_passes_validation() {
        let report = validate_site(shipped_site());
        assert!(report.is_ok(), "{:?}", report.errors);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        run(shipped_site()).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_site_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(run(dir.path().to_path_buf()).await.is_err());
    }
}
