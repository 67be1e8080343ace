//! Patching of the hand-maintained route table and sidebar menu.
//!
//! Both files are treated as lines of text. Only lines recognised as an
//! import, a route entry or a menu item are ever touched; every other line
//! is carried through byte for byte, line endings included.

mod document;
mod locks;
mod menu;
mod routes;

pub use locks::PatchLocks;
pub use menu::{apply_menu, remove_menu};
pub use routes::{apply_routes, remove_routes};

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::codegen::{to_kebab_case, NamingBundle};
use crate::config::NavigationSettings;
use crate::error::{CodegenError, Result};

/// What a single patch did to one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchReport {
    /// Lines added
    pub inserted: usize,
    /// Lines rewritten from a legacy form
    pub migrated: usize,
    /// Lines deleted
    pub removed: usize,
    /// Anchors that were expected but not found
    pub missing_anchors: Vec<String>,
    /// The file itself does not exist
    pub file_missing: bool,
}

impl PatchReport {
    pub fn is_noop(&self) -> bool {
        self.inserted == 0 && self.migrated == 0 && self.removed == 0
    }
}

/// New file content plus what changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub content: String,
    pub report: PatchReport,
}

/// Reports for both navigation files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationReport {
    pub routes: PatchReport,
    pub menu: PatchReport,
    /// Failures reading or writing either file; the other file is still patched
    pub errors: Vec<String>,
}

impl NavigationReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// What identifies one table's entries in the navigation files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footprint {
    /// Component classes, e.g. `OrderItemList`
    pub classes: Vec<String>,
    /// Component folders; every symbol imported from them counts as ours
    pub folders: Vec<String>,
    /// First route segment, e.g. `order-items`
    pub segment: String,
    /// Menu titles, matched only on items without a `route`
    pub titles: Vec<String>,
}

impl Footprint {
    /// Entries generated for `naming`, including the legacy singular folders
    pub fn for_table(naming: &NamingBundle) -> Self {
        let legacy = naming.legacy_folder();
        Self {
            classes: vec![naming.list_class(), naming.form_class()],
            folders: vec![
                naming.list_component(),
                naming.form_component(),
                format!("{}-list", legacy),
                format!("{}-form", legacy),
            ],
            segment: naming.plural_kebab.clone(),
            titles: vec![naming.singular_pascal.clone(), naming.display_name.clone()],
        }
    }

    /// Entries tied to a `{stem}-list` / `{stem}-form` folder pair.
    ///
    /// `stem` is the plural camel name taken from disk. It does not always
    /// singularize back to the table (`movies` → `Movy`), so classes are
    /// learned from the imports of those folders instead.
    pub fn for_folder(stem: &str) -> Self {
        Self {
            classes: Vec::new(),
            folders: vec![format!("{}-list", stem), format!("{}-form", stem)],
            segment: to_kebab_case(stem),
            titles: Vec::new(),
        }
    }

    /// Import path points into one of our component folders
    pub(crate) fn owns_import_path(&self, path: &str) -> bool {
        self.folders
            .iter()
            .any(|folder| path.contains(&format!("/{}/", folder)))
    }

    /// Route path is our segment or nested under it
    pub(crate) fn owns_route_path(&self, path: &str) -> bool {
        let path = path.trim_start_matches('/').to_ascii_lowercase();
        let segment = self.segment.to_ascii_lowercase();
        path == segment || path.starts_with(&format!("{}/", segment))
    }
}

/// Applies and removes navigation entries on disk
pub struct NavigationPatcher {
    settings: NavigationSettings,
    locks: PatchLocks,
}

impl NavigationPatcher {
    pub fn new(settings: NavigationSettings) -> Self {
        Self {
            settings,
            locks: PatchLocks::default(),
        }
    }

    pub fn settings(&self) -> &NavigationSettings {
        &self.settings
    }

    /// Add routes, imports and a menu item for a table; migrates legacy entries.
    ///
    /// A failure on one file is recorded in the report and the other file is
    /// still patched.
    pub fn apply(&self, base: &Path, naming: &NamingBundle) -> NavigationReport {
        let mut errors = Vec::new();
        let routes = self.patch_recorded(
            &base.join(&self.settings.routes_file),
            |content| apply_routes(content, naming, &self.settings),
            &mut errors,
        );
        let menu = self.patch_recorded(
            &base.join(&self.settings.menu_file),
            |content| apply_menu(content, naming, &self.settings),
            &mut errors,
        );

        info!(
            "Navigation for {}: {} route lines, {} menu lines added",
            naming.singular_pascal, routes.inserted, menu.inserted
        );
        NavigationReport {
            routes,
            menu,
            errors,
        }
    }

    /// Remove every entry generated for a table
    pub fn remove(&self, base: &Path, naming: &NamingBundle) -> NavigationReport {
        self.remove_footprint(base, &Footprint::for_table(naming))
    }

    /// Remove every entry matching `footprint`
    pub fn remove_footprint(&self, base: &Path, footprint: &Footprint) -> NavigationReport {
        let mut errors = Vec::new();
        let routes = self.patch_recorded(
            &base.join(&self.settings.routes_file),
            |content| remove_routes(content, footprint),
            &mut errors,
        );
        let menu = self.patch_recorded(
            &base.join(&self.settings.menu_file),
            |content| remove_menu(content, footprint),
            &mut errors,
        );

        info!(
            "Navigation for /{}: {} route lines, {} menu lines removed",
            footprint.segment, routes.removed, menu.removed
        );
        NavigationReport {
            routes,
            menu,
            errors,
        }
    }

    /// `patch_file`, with a failure pushed onto `errors` instead of returned
    fn patch_recorded<F>(&self, path: &Path, patch: F, errors: &mut Vec<String>) -> PatchReport
    where
        F: FnOnce(&str) -> Patched,
    {
        match self.patch_file(path, patch) {
            Ok(report) => report,
            Err(e) => {
                warn!("{}", e);
                errors.push(e.to_string());
                PatchReport::default()
            }
        }
    }

    /// Read, transform and (only if changed) write one file under its lock
    fn patch_file<F>(&self, path: &Path, patch: F) -> Result<PatchReport>
    where
        F: FnOnce(&str) -> Patched,
    {
        let lock = self.locks.lock_for(path);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if !path.exists() {
            warn!("Navigation file not found: {}", path.display());
            return Ok(PatchReport {
                file_missing: true,
                ..PatchReport::default()
            });
        }

        let original = std::fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
        let Patched { content, report } = patch(&original);

        for anchor in &report.missing_anchors {
            let err = CodegenError::PatchAnchorNotFound {
                file: path.to_path_buf(),
                anchor: anchor.clone(),
            };
            warn!("{}", err);
        }

        if content != original {
            std::fs::write(path, &content).map_err(|e| CodegenError::io(path, e))?;
            debug!("Patched {}", path.display());
        } else {
            debug!("{} already up to date", path.display());
        }

        Ok(report)
    }
}

/// Byte offset just past `key:` when `key` appears as an object property
pub(crate) fn find_property(line: &str, key: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut from = 0;

    while let Some(pos) = line[from..].find(key) {
        let start = from + pos;
        let end = start + key.len();
        from = end;

        let boundary_before = start == 0 || !is_ident_byte(bytes[start - 1]);
        if !boundary_before {
            continue;
        }
        let rest = &line[end..];
        let trimmed = rest.trim_start();
        if let Some(after_colon) = trimmed.strip_prefix(':') {
            let colon_end = line.len() - after_colon.len();
            return Some(colon_end);
        }
    }

    None
}

/// Span (start, end) of the quoted string value of `key`, quotes excluded
pub(crate) fn quoted_property(line: &str, key: &str) -> Option<(usize, usize)> {
    let after = find_property(line, key)?;
    let rest = &line[after..];
    let value = rest.trim_start();
    let offset = after + (rest.len() - value.len());

    let quote = value.chars().next().filter(|c| matches!(c, '\'' | '"' | '`'))?;
    let inner = &value[1..];
    let close = inner.find(quote)?;

    Some((offset + 1, offset + 1 + close))
}

/// Bare identifier value of `key`, e.g. `component: OrderItemList`
pub(crate) fn identifier_property<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let after = find_property(line, key)?;
    let value = line[after..].trim_start();
    let len = value.bytes().take_while(|b| is_ident_byte(*b)).count();
    (len > 0).then(|| &value[..len])
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Leading whitespace of a line
pub(crate) fn indentation(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SIDEBAR: &str = "  menuItems: MenuItem[] = [\n    { title: 'Settings', icon: '⚙️', route: '/settings' }\n  ];\n";

    #[test]
    fn test_unreadable_routes_file_still_patches_menu() {
        let dir = TempDir::new().unwrap();
        let settings = NavigationSettings::default();
        let routes = dir.path().join(&settings.routes_file);
        let menu = dir.path().join(&settings.menu_file);
        std::fs::write(&routes, [0xff, 0xfe, 0x00]).unwrap();
        std::fs::create_dir_all(menu.parent().unwrap()).unwrap();
        std::fs::write(&menu, SIDEBAR).unwrap();

        let patcher = NavigationPatcher::new(settings);
        let naming = NamingBundle::derive("Order_Items").unwrap();
        let report = patcher.apply(dir.path(), &naming);

        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("app.routes.ts"));
        assert!(!report.is_clean());
        assert_eq!(report.routes, PatchReport::default());
        assert_eq!(report.menu.inserted, 1);
        assert!(std::fs::read_to_string(&menu).unwrap().contains("route: '/order-items'"));

        let removed = patcher.remove(dir.path(), &naming);
        assert_eq!(removed.errors.len(), 1);
        assert_eq!(removed.menu.removed, 1);
        assert_eq!(std::fs::read_to_string(&menu).unwrap(), SIDEBAR);
    }

    #[test]
    fn test_directory_in_place_of_routes_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let settings = NavigationSettings::default();
        std::fs::create_dir_all(dir.path().join(&settings.routes_file)).unwrap();

        let patcher = NavigationPatcher::new(settings);
        let report = patcher.apply(dir.path(), &NamingBundle::derive("Customers").unwrap());

        assert_eq!(report.errors.len(), 1);
        assert!(!report.routes.file_missing);
        // The menu file simply does not exist
        assert!(report.menu.file_missing);
    }

    #[test]
    fn test_missing_files_are_not_errors() {
        let dir = TempDir::new().unwrap();
        let patcher = NavigationPatcher::new(NavigationSettings::default());
        let report = patcher.apply(dir.path(), &NamingBundle::derive("Customers").unwrap());

        assert!(report.is_clean());
        assert!(report.routes.file_missing);
        assert!(report.menu.file_missing);
    }

    #[test]
    fn test_footprint_route_paths() {
        let footprint = Footprint::for_folder("orderItems");
        assert_eq!(footprint.segment, "order-items");
        assert!(footprint.owns_route_path("order-items"));
        assert!(footprint.owns_route_path("order-items/edit/:id"));
        assert!(footprint.owns_route_path("/order-items"));
        assert!(!footprint.owns_route_path("order-items-archive"));
        assert!(!footprint.owns_route_path("reports/order-items"));
        assert!(footprint.owns_import_path("./components/orderItems-form/orderItems-form"));
        assert!(!footprint.owns_import_path("./components/customerOrderItems-form/customerOrderItems-form"));
    }

    #[test]
    fn test_find_property_skips_longer_keys() {
        let line = "  { path: '', redirectTo: '/dashboard', pathMatch: 'full' },";
        let (start, end) = quoted_property(line, "path").unwrap();
        assert_eq!(&line[start..end], "");

        let line = "  { pathMatch: 'full', path: 'login' },";
        let (start, end) = quoted_property(line, "path").unwrap();
        assert_eq!(&line[start..end], "login");
    }

    #[test]
    fn test_identifier_property() {
        let line = "  { path: 'x', component: OrderItemList, canActivate: [authGuard] },";
        assert_eq!(identifier_property(line, "component"), Some("OrderItemList"));
        assert_eq!(identifier_property(line, "redirectTo"), None);
    }

    #[test]
    fn test_quoted_property_spacing() {
        let line = "{title:'Order Item',icon:'📋'}";
        let (start, end) = quoted_property(line, "title").unwrap();
        assert_eq!(&line[start..end], "Order Item");
        let (start, end) = quoted_property(line, "icon").unwrap();
        assert_eq!(&line[start..end], "📋");
    }

    #[test]
    fn test_indentation() {
        assert_eq!(indentation("    { title: 'x' }"), "    ");
        assert_eq!(indentation("x"), "");
    }
}
