// Site validation: manifest, content bundles, and locale parity

use skilllinkup_core::config::{MANIFEST_FILE, Manifest, parse_site_toml_str};
use skilllinkup_core::content::{bundle_file_name, load_page_content};
use skilllinkup_core::Locale;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Flattened shape of one bundle
#[derive(Debug, Default, PartialEq)]
pub struct BundleShape {
    /// Dotted key paths; array elements contribute under `key[]`
    pub keys: BTreeSet<String>,
    /// Item count of every array, by path
    pub lengths: BTreeMap<String, usize>,
}

/// Flatten a parsed bundle into its key paths
pub fn bundle_shape(value: &toml::Value) -> BundleShape {
    let mut shape = BundleShape::default();
    collect(value, "", &mut shape);
    shape
}

fn collect(value: &toml::Value, prefix: &str, shape: &mut BundleShape) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                shape.keys.insert(path.clone());
                collect(child, &path, shape);
            }
        }
        toml::Value::Array(items) => {
            shape.lengths.insert(prefix.to_string(), items.len());
            let element = format!("{}[]", prefix);
            for item in items {
                if item.is_table() {
                    collect(item, &element, shape);
                }
            }
        }
        _ => {}
    }
}

/// Compare two locale shapes of the same page.
///
/// Missing keys are errors; differing array lengths are warnings since
/// translations sometimes legitimately differ in list length.
pub fn compare_shapes(
    page: &str,
    en: &BundleShape,
    nl: &BundleShape,
    report: &mut ValidationReport,
) {
    for key in en.keys.difference(&nl.keys) {
        report
            .errors
            .push(format!("{}: key '{}' present in en but missing in nl", page, key));
    }
    for key in nl.keys.difference(&en.keys) {
        report
            .errors
            .push(format!("{}: key '{}' present in nl but missing in en", page, key));
    }
    for (path, en_len) in &en.lengths {
        if let Some(nl_len) = nl.lengths.get(path)
            && nl_len != en_len
        {
            report.warnings.push(format!(
                "{}: '{}' has {} items in en but {} in nl",
                page, path, en_len, nl_len
            ));
        }
    }
}

fn read_shape(dir: &Path, page: &str, locale: Locale) -> Result<BundleShape, String> {
    let path = dir.join(bundle_file_name(locale));
    let raw = fs::read_to_string(&path)
        .map_err(|e| format!("{}: cannot read {}: {}", page, path.display(), e))?;
    let value: toml::Value = toml::from_str(&raw)
        .map_err(|e| format!("{}: invalid TOML in {}: {}", page, path.display(), e.message()))?;
    Ok(bundle_shape(&value))
}

/// Validate a site directory without rendering it
pub fn validate_site<P: AsRef<Path>>(dir: P) -> ValidationReport {
    let dir = dir.as_ref();
    let mut report = ValidationReport::default();

    let manifest = match load_manifest(dir) {
        Ok(m) => m,
        Err(e) => {
            report.errors.push(e);
            return report;
        }
    };
    report.info.push(format!(
        "{}: {} pages, base URL {}",
        manifest.info.name,
        manifest.pages.len(),
        manifest.info.url
    ));
    if manifest.store.is_none() {
        report
            .warnings
            .push("no [store] section: post pages will only work with --posts".to_string());
    }

    check_static_assets(dir, &manifest, &mut report);

    let mut referenced = HashSet::new();
    for def in &manifest.pages {
        let label = if def.path.is_empty() { "home" } else { def.path.as_str() };
        let content_dir = dir.join(&def.content);
        referenced.insert(normalize(&content_dir));

        match (
            read_shape(&content_dir, label, Locale::En),
            read_shape(&content_dir, label, Locale::Nl),
        ) {
            (Ok(en), Ok(nl)) => {
                let before = report.errors.len();
                compare_shapes(label, &en, &nl, &mut report);
                if report.errors.len() == before {
                    report
                        .info
                        .push(format!("{}: {} keys match in en and nl", label, en.keys.len()));
                }
            }
            (en, nl) => {
                report.errors.extend(en.err());
                report.errors.extend(nl.err());
                continue;
            }
        }

        // shape errors the key comparison cannot see (missing required keys, bad tables)
        if let Err(e) = load_page_content(&content_dir, label) {
            report.errors.push(e.to_string());
        }
    }

    find_orphans(dir, &referenced, &mut report);

    tracing::debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validation finished"
    );
    report
}

fn load_manifest(dir: &Path) -> Result<Manifest, String> {
    let path = dir.join(MANIFEST_FILE);
    let raw = fs::read_to_string(&path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    parse_site_toml_str(&raw, None).map_err(|e| format!("{}: {}", MANIFEST_FILE, e))
}

/// Site-local images (`/static/...`) must exist; absolute URLs are not checked
fn check_static_assets(dir: &Path, manifest: &Manifest, report: &mut ValidationReport) {
    let pages = manifest.pages.iter().filter_map(|def| {
        let label = if def.path.is_empty() { "home" } else { def.path.as_str() };
        def.image.as_deref().map(|image| (label, image))
    });

    for (owner, asset) in std::iter::once(("site.logo", manifest.info.logo.as_str())).chain(pages) {
        if !asset.starts_with("/static/") {
            continue;
        }
        let file = dir.join(asset.trim_start_matches('/'));
        if !file.is_file() {
            report
                .errors
                .push(format!("{}: image '{}' not found at {}", owner, asset, file.display()));
        }
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.components().collect()
}

/// Content directories with bundles that no page points at
fn find_orphans(dir: &Path, referenced: &HashSet<PathBuf>, report: &mut ValidationReport) {
    let content_root = dir.join("content");
    if !content_root.is_dir() {
        return;
    }

    let en_bundle = bundle_file_name(Locale::En);
    let nl_bundle = bundle_file_name(Locale::Nl);
    let mut orphans: Vec<String> = WalkDir::new(&content_root)
        .min_depth(1)
        .max_depth(3)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .filter(|e| e.path().join(&en_bundle).exists() || e.path().join(&nl_bundle).exists())
        .filter(|e| !referenced.contains(&normalize(e.path())))
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .unwrap_or(e.path())
                .display()
                .to_string()
        })
        .collect();
    orphans.sort();

    for orphan in orphans {
        report
            .warnings
            .push(format!("{}: content not referenced by any page", orphan));
    }
}
