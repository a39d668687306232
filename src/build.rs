//! Site building orchestration.
//!
//! Walks the templates directory, hydrates every `.html` template against
//! the configured data source, and copies everything else through as a
//! static asset. Templates are independent page loads, so they hydrate in
//! parallel; the two fetches within one page stay strictly sequential.

use crate::{
    config::SellaConfig,
    fetch::DataSource,
    hydrate::hydrate_page,
    log,
    markdown,
};
use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};
use walkdir::WalkDir;

/// Build the entire site: hydrate templates, copy assets.
///
/// If `config.build.clean` is true, clears the output directory first.
/// The local data directory is not copied to the output; hydrated pages
/// no longer fetch anything at view time.
pub fn build_site(config: &'static SellaConfig) -> Result<()> {
    let templates = &config.build.templates;
    let output = &config.build.output;

    prepare_output(output, config.build.clean)?;

    let source = DataSource::from_config(config)?;
    let md = markdown::converter(config.data.markdown);

    let (pages, assets) = collect_site_files(config);
    log!("build"; "hydrating {} templates, {} assets", pages.len(), assets.len());

    let has_error = AtomicBool::new(false);

    let (pages_result, assets_result) = rayon::join(
        || {
            pages.par_iter().try_for_each(|path| {
                if has_error.load(Ordering::Relaxed) {
                    return Err(anyhow!("Aborted"));
                }
                if let Err(e) = hydrate_one(path, templates, output, config, &source, md.as_ref())
                {
                    if !has_error.swap(true, Ordering::Relaxed) {
                        log!("error"; "{}: {:#}", path.display(), e);
                    }
                    return Err(anyhow!("Build failed"));
                }
                Ok(())
            })
        },
        || {
            assets.par_iter().try_for_each(|path| {
                if has_error.load(Ordering::Relaxed) {
                    return Err(anyhow!("Aborted"));
                }
                if let Err(e) = copy_asset(path, templates, output) {
                    if !has_error.swap(true, Ordering::Relaxed) {
                        log!("error"; "{}: {:#}", path.display(), e);
                    }
                    return Err(anyhow!("Build failed"));
                }
                Ok(())
            })
        },
    );

    pages_result?;
    assets_result?;

    log!("build"; "done");
    Ok(())
}

/// Split the templates tree into page templates and static assets.
///
/// The local data directory is excluded from both: its documents are baked
/// into the pages during hydration.
fn collect_site_files(config: &SellaConfig) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let data_dir = config.local_data_dir();

    let files: Vec<PathBuf> = WalkDir::new(&config.build.templates)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| !path.starts_with(&data_dir))
        .collect();

    files
        .into_iter()
        .partition(|path| path.extension().is_some_and(|ext| ext == "html"))
}

/// Hydrate one template and write it to the mirrored output path.
fn hydrate_one(
    path: &Path,
    templates: &Path,
    output: &Path,
    config: &SellaConfig,
    source: &DataSource,
    md: &dyn markdown::MarkdownConverter,
) -> Result<()> {
    let content =
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let hydrated = hydrate_page(&content, source, md)
        .with_context(|| format!("Failed to hydrate {}", path.display()))?;
    let hydrated = minify(&hydrated, config);

    let dest = mirror_path(path, templates, output)?;
    ensure_parent(&dest)?;
    fs::write(&dest, hydrated)
        .with_context(|| format!("Failed to write {}", dest.display()))?;
    Ok(())
}

/// Copy a non-HTML file through unchanged.
fn copy_asset(path: &Path, templates: &Path, output: &Path) -> Result<()> {
    let dest = mirror_path(path, templates, output)?;
    ensure_parent(&dest)?;
    fs::copy(path, &dest)
        .with_context(|| format!("Failed to copy {}", path.display()))?;
    Ok(())
}

/// Map a templates-tree path to its output-tree counterpart.
fn mirror_path(path: &Path, templates: &Path, output: &Path) -> Result<PathBuf> {
    let rel = path
        .strip_prefix(templates)
        .with_context(|| format!("{} is outside the templates directory", path.display()))?;
    Ok(output.join(rel))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

/// Ensure the output directory exists, clearing it first when requested.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;
    Ok(())
}

/// Minify hydrated HTML when enabled.
///
/// Returns `Cow::Borrowed` if minify is disabled, `Cow::Owned` otherwise.
fn minify<'a>(html: &'a [u8], config: &SellaConfig) -> Cow<'a, [u8]> {
    if !config.build.minify {
        return Cow::Borrowed(html);
    }

    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    Cow::Owned(minify_html::minify(html, &cfg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_for(templates: &Path) -> SellaConfig {
        let mut config = SellaConfig::default();
        config.build.templates = templates.to_path_buf();
        config
    }

    #[test]
    fn test_collect_excludes_data_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let templates = dir.path();
        fs::create_dir_all(templates.join("_data")).unwrap();
        fs::create_dir_all(templates.join("assets")).unwrap();
        fs::write(templates.join("index.html"), "<html/>").unwrap();
        fs::write(templates.join("assets/style.css"), "body{}").unwrap();
        fs::write(templates.join("_data/common.json"), "{}").unwrap();

        let (pages, assets) = collect_site_files(&config_for(templates));

        assert_eq!(pages, vec![templates.join("index.html")]);
        assert_eq!(assets, vec![templates.join("assets/style.css")]);
    }

    #[test]
    fn test_mirror_path() {
        let dest = mirror_path(
            Path::new("site/sub/page.html"),
            Path::new("site"),
            Path::new("public"),
        )
        .unwrap();
        assert_eq!(dest, PathBuf::from("public/sub/page.html"));

        assert!(mirror_path(Path::new("elsewhere/x"), Path::new("site"), Path::new("public")).is_err());
    }

    #[test]
    fn test_minify_disabled_borrows() {
        let mut config = SellaConfig::default();
        config.build.minify = false;
        let html = b"<p>  spaced  </p>";
        assert!(matches!(minify(html, &config), Cow::Borrowed(_)));
    }

    #[test]
    fn test_minify_enabled_shrinks() {
        let config = SellaConfig::default();
        let html = b"<html><body>   <p>x</p>   \n\n</body></html>";
        let out = minify(html, &config);
        assert!(out.len() < html.len());
    }
}
