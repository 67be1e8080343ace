//! Removal of generated artifacts and their navigation entries

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{CleanupRequest, CleanupResult, Orchestrator};
use crate::codegen::{AUTO_GENERATED_MARKER, COMPONENTS_DIR, MODELS_DIR, SERVICES_DIR};
use crate::config::PreserveList;
use crate::error::{CodegenError, Result};
use crate::navigation::Footprint;

const COMPONENT_SUFFIXES: [&str; 2] = ["-list", "-form"];
const COMPONENT_EXTENSIONS: [&str; 3] = ["ts", "html", "css"];

/// Deleted paths and errors accumulated over one cleanup run
#[derive(Default)]
struct Sweep {
    deleted: Vec<PathBuf>,
    errors: Vec<String>,
}

impl Sweep {
    fn delete_file(&mut self, path: &Path) {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!("Deleted {}", path.display());
                self.deleted.push(path.to_path_buf());
            }
            Err(e) => self.record(CodegenError::io(path, e)),
        }
    }

    fn record(&mut self, err: CodegenError) {
        warn!("{}", err);
        self.errors.push(err.to_string());
    }
}

impl Orchestrator {
    /// Delete generated artifacts under the request's base path and unhook
    /// every table whose component folders were removed
    pub fn cleanup(&self, request: &CleanupRequest) -> CleanupResult {
        let base = &request.base_path;
        let preserve = &self.config.preserve;
        info!("Starting cleanup of {}", base.display());

        let mut sweep = Sweep::default();
        let stems = sweep_components(base, preserve, &mut sweep);
        sweep_suffixed(
            &base.join(MODELS_DIR),
            ".model.ts",
            |name| preserve.keeps_model(name),
            &mut sweep,
        );
        sweep_suffixed(
            &base.join(SERVICES_DIR),
            ".service.ts",
            |name| preserve.keeps_service(name),
            &mut sweep,
        );
        if let Some(backend) = &request.backend_output_path {
            sweep_entities(backend, &mut sweep);
        }

        // Unhook by the folder itself; its name need not singularize back to the table
        for stem in &stems {
            let report = self
                .navigation
                .remove_footprint(base, &Footprint::for_folder(stem));
            debug!(
                "Unhooked {}: {} route lines, {} menu lines",
                stem, report.routes.removed, report.menu.removed
            );
            sweep.errors.extend(report.errors);
        }

        let success = sweep.errors.is_empty() || !sweep.deleted.is_empty();
        let message = if !sweep.errors.is_empty() {
            "Cleanup completed with errors".to_string()
        } else if sweep.deleted.is_empty() {
            "Nothing to clean up".to_string()
        } else {
            format!(
                "Deleted {} generated paths for {} table(s)",
                sweep.deleted.len(),
                stems.len()
            )
        };

        info!("{}", message);
        CleanupResult {
            success,
            message,
            deleted_paths: sweep.deleted,
            errors: sweep.errors,
        }
    }
}

/// Sorted entries of `dir`; a missing directory has none
fn entries(dir: &Path, sweep: &mut Sweep) -> Vec<(String, PathBuf)> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let read = match fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) => {
            sweep.record(CodegenError::io(dir, e));
            return Vec::new();
        }
    };

    let mut found: Vec<(String, PathBuf)> = read
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            Some((name, entry.path()))
        })
        .collect();
    found.sort();
    found
}

/// Remove `{stem}-list` / `{stem}-form` folders and return their table stems
fn sweep_components(base: &Path, preserve: &PreserveList, sweep: &mut Sweep) -> BTreeSet<String> {
    let mut stems = BTreeSet::new();

    for (name, path) in entries(&base.join(COMPONENTS_DIR), sweep) {
        if !path.is_dir() || preserve.keeps_component(&name) {
            continue;
        }
        let Some(stem) = COMPONENT_SUFFIXES
            .iter()
            .find_map(|suffix| name.strip_suffix(suffix))
            .filter(|stem| !stem.is_empty())
        else {
            continue;
        };

        for ext in COMPONENT_EXTENSIONS {
            let file = path.join(format!("{}.{}", name, ext));
            if file.is_file() {
                sweep.delete_file(&file);
            }
        }
        match remove_if_empty(&path) {
            Ok(true) => sweep.deleted.push(path.clone()),
            Ok(false) => debug!("Keeping non-empty folder {}", path.display()),
            Err(e) => sweep.record(e),
        }
        stems.insert(stem.to_string());
    }

    stems
}

/// Remove files in `dir` ending with `suffix` unless preserved
fn sweep_suffixed<F>(dir: &Path, suffix: &str, keep: F, sweep: &mut Sweep)
where
    F: Fn(&str) -> bool,
{
    for (name, path) in entries(dir, sweep) {
        if name.ends_with(suffix) && path.is_file() && !keep(&name) {
            sweep.delete_file(&path);
        }
    }
}

/// Remove backend entities that carry the generated-file marker
fn sweep_entities(dir: &Path, sweep: &mut Sweep) {
    for (name, path) in entries(dir, sweep) {
        if !name.ends_with(".cs") || !path.is_file() {
            continue;
        }
        match fs::read_to_string(&path) {
            Ok(content) if content.starts_with(AUTO_GENERATED_MARKER) => sweep.delete_file(&path),
            Ok(_) => debug!("Keeping hand-written {}", path.display()),
            Err(e) => sweep.record(CodegenError::io(&path, e)),
        }
    }
}

fn remove_if_empty(dir: &Path) -> Result<bool> {
    let mut contents = fs::read_dir(dir).map_err(|e| CodegenError::io(dir, e))?;
    if contents.next().is_some() {
        return Ok(false);
    }
    fs::remove_dir(dir).map_err(|e| CodegenError::io(dir, e))?;
    Ok(true)
}
