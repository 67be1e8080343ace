//! Route table patching: component imports and route entries

use tracing::debug;

use super::document::Document;
use super::{identifier_property, indentation, quoted_property, Footprint, PatchReport, Patched};
use crate::codegen::NamingBundle;
use crate::config::NavigationSettings;

/// Path of the catch-all route that bounds the route list
const WILDCARD_PATH: &str = "**";

/// `import { A, B } from '...'`
#[derive(Debug)]
struct ImportLine<'a> {
    symbols: Vec<&'a str>,
    path: (usize, usize),
}

impl ImportLine<'_> {
    fn imports(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s.eq_ignore_ascii_case(symbol))
    }
}

fn parse_import(text: &str) -> Option<ImportLine<'_>> {
    if !text.trim_start().starts_with("import") {
        return None;
    }
    let open = text.find('{')?;
    let close = open + text[open..].find('}')?;

    let symbols = text[open + 1..close]
        .split(',')
        .filter_map(|s| s.split_whitespace().next())
        .collect();

    let from = close + text[close..].find("from")? + "from".len();
    let rest = &text[from..];
    let value = rest.trim_start();
    let start = from + (rest.len() - value.len());
    let quote = value.chars().next().filter(|c| matches!(c, '\'' | '"'))?;
    let end = start + 1 + value[1..].find(quote)?;

    Some(ImportLine {
        symbols,
        path: (start + 1, end),
    })
}

/// `{ path: '...', component: X, ... }` on a single line
#[derive(Debug)]
struct RouteLine<'a> {
    path: &'a str,
    component: Option<&'a str>,
}

fn parse_route(text: &str) -> Option<RouteLine<'_>> {
    if !text.trim_start().starts_with('{') {
        return None;
    }
    let (start, end) = quoted_property(text, "path")?;
    Some(RouteLine {
        path: &text[start..end],
        component: identifier_property(text, "component"),
    })
}

/// Module path of a generated component, e.g. `./components/orderItems-list/orderItems-list`
fn component_path(folder: &str) -> String {
    format!("./components/{0}/{0}", folder)
}

/// The three route entries generated per table
fn expected_routes(naming: &NamingBundle) -> [(String, String); 3] {
    let segment = &naming.plural_kebab;
    [
        (segment.clone(), naming.list_class()),
        (format!("{}/new", segment), naming.form_class()),
        (format!("{}/edit/:id", segment), naming.form_class()),
    ]
}

/// Rewrite imports that still point at the singular component folders
fn migrate_imports(doc: &mut Document, naming: &NamingBundle) -> usize {
    let legacy = naming.legacy_folder();
    let rewrites = [
        (
            component_path(&format!("{}-list", legacy)),
            component_path(&naming.list_component()),
            naming.list_class(),
        ),
        (
            component_path(&format!("{}-form", legacy)),
            component_path(&naming.form_component()),
            naming.form_class(),
        ),
    ];

    let mut migrated = 0;
    for idx in 0..doc.len() {
        let text = doc.text(idx);
        let Some(import) = parse_import(text) else {
            continue;
        };
        let path = &text[import.path.0..import.path.1];

        for (old, new, symbol) in &rewrites {
            if old != new && import.imports(symbol) && path == old {
                let updated = format!("{}{}{}", &text[..import.path.0], new, &text[import.path.1..]);
                debug!("Migrating import {} -> {}", old, new);
                doc.set_text(idx, &updated);
                migrated += 1;
                break;
            }
        }
    }
    migrated
}

/// Add the table's imports and routes; existing entries are left alone
pub fn apply_routes(content: &str, naming: &NamingBundle, settings: &NavigationSettings) -> Patched {
    let mut doc = Document::parse(content);
    let mut report = PatchReport {
        migrated: migrate_imports(&mut doc, naming),
        ..PatchReport::default()
    };

    // Imports go after the guard import, else after the last import
    let wanted = [
        (naming.list_class(), component_path(&naming.list_component())),
        (naming.form_class(), component_path(&naming.form_component())),
    ];
    let imports: Vec<(usize, ImportLine<'_>)> = doc
        .texts()
        .filter_map(|(i, text)| parse_import(text).map(|import| (i, import)))
        .collect();
    let new_imports: Vec<String> = wanted
        .iter()
        .filter(|(symbol, _)| !imports.iter().any(|(_, import)| import.imports(symbol)))
        .map(|(symbol, path)| format!("import {{ {} }} from '{}';", symbol, path))
        .collect();
    let guard_line = imports
        .iter()
        .rev()
        .find(|(_, import)| import.imports(&settings.guard_symbol))
        .map(|(i, _)| *i);
    let insert_imports_at = guard_line
        .or_else(|| imports.last().map(|(i, _)| *i))
        .map_or(0, |i| i + 1);

    report.inserted += new_imports.len();
    doc.insert(insert_imports_at, &new_imports);

    // Routes go directly before the wildcard entry
    let existing: Vec<String> = doc
        .texts()
        .filter_map(|(_, text)| parse_route(text).map(|r| r.path.to_string()))
        .collect();
    let missing: Vec<(String, String)> = expected_routes(naming)
        .into_iter()
        .filter(|(path, _)| !existing.iter().any(|p| p.eq_ignore_ascii_case(path)))
        .collect();

    if !missing.is_empty() {
        let sentinel = doc
            .texts()
            .find(|(_, text)| parse_route(text).is_some_and(|r| r.path == WILDCARD_PATH))
            .map(|(i, text)| (i, indentation(text).to_string()));

        match sentinel {
            Some((idx, indent)) => {
                let lines: Vec<String> = missing
                    .iter()
                    .map(|(path, component)| {
                        format!(
                            "{}{{ path: '{}', component: {}, canActivate: [{}] }},",
                            indent, path, component, settings.guard_symbol
                        )
                    })
                    .collect();
                report.inserted += lines.len();
                doc.insert(idx, &lines);
            }
            None => report
                .missing_anchors
                .push(format!("{{ path: '{}' }}", WILDCARD_PATH)),
        }
    }

    Patched {
        content: doc.render(),
        report,
    }
}

/// Drop the imports and route entries matching `footprint`.
///
/// Symbols imported from the footprint's folders count as ours even when
/// their class name is not known up front. A route goes only when both its
/// component and its path are ours.
pub fn remove_routes(content: &str, footprint: &Footprint) -> Patched {
    let mut doc = Document::parse(content);

    let mut classes: Vec<String> = footprint.classes.clone();
    for (_, text) in doc.texts() {
        let Some(import) = parse_import(text) else {
            continue;
        };
        if footprint.owns_import_path(&text[import.path.0..import.path.1]) {
            classes.extend(import.symbols.iter().map(|s| s.to_string()));
        }
    }
    let ours = |symbol: &str| classes.iter().any(|c| c.eq_ignore_ascii_case(symbol));

    let doomed: Vec<usize> = doc
        .texts()
        .filter(|(_, text)| {
            if let Some(import) = parse_import(text) {
                return !import.symbols.is_empty() && import.symbols.iter().all(|s| ours(*s));
            }
            parse_route(text).is_some_and(|route| {
                route.component.is_some_and(|component| ours(component))
                    && footprint.owns_route_path(route.path)
            })
        })
        .map(|(i, _)| i)
        .collect();

    debug!("Removing {} route table lines for /{}", doomed.len(), footprint.segment);
    doc.remove(&doomed);

    Patched {
        content: doc.render(),
        report: PatchReport {
            removed: doomed.len(),
            ..PatchReport::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTES: &str = "import { Routes } from '@angular/router';
import { Login } from './components/login/login';
import { ProductList } from './components/product-list/product-list';
import { authGuard } from './guards/auth-guard';

export const routes: Routes = [
  { path: '', redirectTo: '/dashboard', pathMatch: 'full' },
  { path: 'login', component: Login },
  { path: 'products', component: ProductList, canActivate: [authGuard] },
  { path: '**', redirectTo: '/dashboard' } // Wildcard route for 404 errors
];
";

    fn naming(table: &str) -> NamingBundle {
        NamingBundle::derive(table).unwrap()
    }

    #[test]
    fn test_apply_inserts_imports_and_routes() {
        let settings = NavigationSettings::default();
        let patched = apply_routes(ROUTES, &naming("dbo.Order_Items"), &settings);

        let expected = "import { Routes } from '@angular/router';
import { Login } from './components/login/login';
import { ProductList } from './components/product-list/product-list';
import { authGuard } from './guards/auth-guard';
import { OrderItemList } from './components/orderItems-list/orderItems-list';
import { OrderItemForm } from './components/orderItems-form/orderItems-form';

export const routes: Routes = [
  { path: '', redirectTo: '/dashboard', pathMatch: 'full' },
  { path: 'login', component: Login },
  { path: 'products', component: ProductList, canActivate: [authGuard] },
  { path: 'order-items', component: OrderItemList, canActivate: [authGuard] },
  { path: 'order-items/new', component: OrderItemForm, canActivate: [authGuard] },
  { path: 'order-items/edit/:id', component: OrderItemForm, canActivate: [authGuard] },
  { path: '**', redirectTo: '/dashboard' } // Wildcard route for 404 errors
];
";
        assert_eq!(patched.content, expected);
        assert_eq!(patched.report.inserted, 5);
        assert!(patched.report.missing_anchors.is_empty());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let settings = NavigationSettings::default();
        let n = naming("Order_Items");
        let once = apply_routes(ROUTES, &n, &settings).content;
        let twice = apply_routes(&once, &n, &settings);

        assert_eq!(twice.content, once);
        assert!(twice.report.is_noop());
        assert_eq!(once.matches("import { OrderItemList }").count(), 1);
        assert_eq!(once.matches("path: 'order-items/new'").count(), 1);
    }

    #[test]
    fn test_apply_then_remove_round_trips() {
        let settings = NavigationSettings::default();
        let customers = naming("Customers");
        let orders = naming("Order_Items");

        let with_customers = apply_routes(ROUTES, &customers, &settings).content;
        let with_both = apply_routes(&with_customers, &orders, &settings).content;
        let removed = remove_routes(&with_both, &Footprint::for_table(&orders));

        assert_eq!(removed.content, with_customers);
        assert_eq!(removed.report.removed, 5);
        assert!(!removed.content.contains("OrderItem"));
        assert!(removed.content.contains("{ path: 'customers', component: CustomerList"));
    }

    #[test]
    fn test_remove_when_absent_is_noop() {
        let patched = remove_routes(ROUTES, &Footprint::for_table(&naming("Invoices")));
        assert_eq!(patched.content, ROUTES);
        assert!(patched.report.is_noop());
    }

    #[test]
    fn test_legacy_singular_import_is_migrated() {
        let settings = NavigationSettings::default();
        let legacy = ROUTES.replace(
            "import { authGuard } from './guards/auth-guard';\n",
            "import { authGuard } from './guards/auth-guard';
import { OrderItemList } from './components/orderItem-list/orderItem-list';
import { OrderItemForm } from './components/orderItem-form/orderItem-form';
",
        );

        let patched = apply_routes(&legacy, &naming("Order_Items"), &settings);
        assert_eq!(patched.report.migrated, 2);
        assert!(patched
            .content
            .contains("import { OrderItemList } from './components/orderItems-list/orderItems-list';"));
        assert!(!patched.content.contains("orderItem-list"));
        // Imports were present, so only the routes are added
        assert_eq!(patched.report.inserted, 3);
        assert_eq!(patched.content.matches("import { OrderItemForm }").count(), 1);
    }

    #[test]
    fn test_missing_wildcard_is_reported() {
        let settings = NavigationSettings::default();
        let content = "import { authGuard } from './guards/auth-guard';\n\nexport const routes = [\n];\n";
        let patched = apply_routes(content, &naming("Order_Items"), &settings);

        assert_eq!(patched.report.missing_anchors, vec!["{ path: '**' }".to_string()]);
        // Imports are still added
        assert_eq!(patched.report.inserted, 2);
        assert!(!patched.content.contains("path: 'order-items'"));
    }

    #[test]
    fn test_crlf_is_preserved() {
        let settings = NavigationSettings::default();
        let crlf = ROUTES.replace('\n', "\r\n");
        let patched = apply_routes(&crlf, &naming("Order_Items"), &settings);
        assert!(!patched.content.replace("\r\n", "").contains('\n'));
        assert!(patched
            .content
            .contains("  { path: 'order-items', component: OrderItemList, canActivate: [authGuard] },\r\n"));
    }

    #[test]
    fn test_remove_keeps_shared_imports() {
        let content = "import { OrderItemList, Other } from './shared';\n";
        let patched = remove_routes(content, &Footprint::for_table(&naming("Order_Items")));
        assert_eq!(patched.content, content);
    }

    #[test]
    fn test_remove_by_folder_when_name_does_not_singularize_back() {
        let settings = NavigationSettings::default();
        let movie = naming("Movie");
        assert_eq!(movie.plural_camel, "movies");
        let applied = apply_routes(ROUTES, &movie, &settings).content;

        let removed = remove_routes(&applied, &Footprint::for_folder("movies"));
        assert_eq!(removed.content, ROUTES);
        assert_eq!(removed.report.removed, 5);
    }

    #[test]
    fn test_remove_by_folder_handles_multi_word_segment() {
        let settings = NavigationSettings::default();
        let applied = apply_routes(ROUTES, &naming("Order_Items"), &settings).content;
        let removed = remove_routes(&applied, &Footprint::for_folder("orderItems"));
        assert_eq!(removed.content, ROUTES);
    }

    #[test]
    fn test_remove_keeps_hand_written_route_reusing_component() {
        let settings = NavigationSettings::default();
        let orders = naming("Order_Items");
        let applied = apply_routes(ROUTES, &orders, &settings).content;
        let custom = "  { path: 'reports/orders', component: OrderItemList, canActivate: [authGuard] },\n";
        let with_custom = applied.replace(
            "  { path: '**'",
            &format!("{}  {{ path: '**'", custom),
        );

        let removed = remove_routes(&with_custom, &Footprint::for_table(&orders));
        assert!(removed.content.contains(custom));
        assert!(!removed.content.contains("path: 'order-items"));
        assert_eq!(removed.report.removed, 5);
    }

    #[test]
    fn test_remove_handles_legacy_import_paths() {
        let legacy = ROUTES.replace(
            "import { authGuard } from './guards/auth-guard';\n",
            "import { authGuard } from './guards/auth-guard';
import { OrderItemList } from './components/orderItem-list/orderItem-list';
",
        );
        let removed = remove_routes(&legacy, &Footprint::for_table(&naming("Order_Items")));
        assert_eq!(removed.content, ROUTES);
    }
}
