//! Sidebar menu patching

use tracing::debug;

use super::document::Document;
use super::{find_property, indentation, quoted_property, Footprint, PatchReport, Patched};
use crate::codegen::NamingBundle;
use crate::config::NavigationSettings;

/// Property holding the menu array in the sidebar component
const MENU_ARRAY: &str = "menuItems";

/// Span of the quoted title when `text` is a single-line menu item literal
fn menu_title(text: &str) -> Option<(usize, usize)> {
    if !text.trim_start().starts_with('{') {
        return None;
    }
    quoted_property(text, "title")
}

/// True for titles this table owns: the class name or its display form
fn owns_title(title: &str, naming: &NamingBundle) -> bool {
    title.eq_ignore_ascii_case(&naming.singular_pascal)
        || title.eq_ignore_ascii_case(&naming.display_name)
}

/// First and closing line of the `menuItems: MenuItem[] = [` array
fn menu_array(doc: &Document) -> Option<(usize, usize)> {
    let (start, _) = doc.texts().find(|(_, text)| {
        find_property(text, MENU_ARRAY).is_some() && text.trim_end().ends_with('[')
    })?;
    let (end, _) = doc
        .texts()
        .skip(start + 1)
        .find(|(_, text)| text.trim_start().starts_with(']'))?;
    Some((start, end))
}

/// Rewrite unspaced titles (`'OrderItem'`) to the display form (`'Order Item'`)
fn migrate_titles(doc: &mut Document, naming: &NamingBundle) -> usize {
    if naming.display_name == naming.singular_pascal {
        return 0;
    }

    let mut migrated = 0;
    for idx in 0..doc.len() {
        let text = doc.text(idx);
        let Some((start, end)) = menu_title(text) else {
            continue;
        };
        if text[start..end].eq_ignore_ascii_case(&naming.singular_pascal) {
            let updated = format!("{}{}{}", &text[..start], naming.display_name, &text[end..]);
            debug!("Migrating menu title {} -> {}", naming.singular_pascal, naming.display_name);
            doc.set_text(idx, &updated);
            migrated += 1;
        }
    }
    migrated
}

/// Append a comma after the object literal on `idx` unless it already has one
fn ensure_trailing_comma(doc: &mut Document, idx: usize) {
    let text = doc.text(idx);
    let Some(close) = text.rfind('}') else {
        return;
    };
    if text[close + 1..].trim_start().starts_with(',') {
        return;
    }
    let updated = format!("{},{}", &text[..=close], &text[close + 1..]);
    doc.set_text(idx, &updated);
}

/// Add the table's menu item in front of the anchor item
pub fn apply_menu(content: &str, naming: &NamingBundle, settings: &NavigationSettings) -> Patched {
    let mut doc = Document::parse(content);
    let mut report = PatchReport {
        migrated: migrate_titles(&mut doc, naming),
        ..PatchReport::default()
    };

    let present = doc
        .texts()
        .filter_map(|(_, text)| menu_title(text).map(|(s, e)| &text[s..e]))
        .any(|title| owns_title(title, naming));

    if !present {
        let item = format!(
            "{{ title: '{}', icon: '{}', route: '/{}' }},",
            naming.display_name, settings.menu_icon, naming.plural_kebab
        );

        let anchor = doc
            .texts()
            .find(|(_, text)| {
                menu_title(text)
                    .is_some_and(|(s, e)| text[s..e].eq_ignore_ascii_case(&settings.menu_anchor_title))
            })
            .map(|(i, text)| (i, indentation(text).to_string()));

        if let Some((idx, indent)) = anchor {
            doc.insert(idx, &[format!("{}{}", indent, item)]);
            report.inserted += 1;
        } else if let Some((start, end)) = menu_array(&doc) {
            debug!(
                "Menu anchor '{}' not found, appending to {}",
                settings.menu_anchor_title, MENU_ARRAY
            );
            let last_item = (start + 1..end)
                .rev()
                .find(|&i| menu_title(doc.text(i)).is_some());

            match last_item {
                Some(last) => {
                    let indent = indentation(doc.text(last)).to_string();
                    ensure_trailing_comma(&mut doc, last);
                    doc.insert(last + 1, &[format!("{}{}", indent, item)]);
                }
                None => {
                    let indent = format!("{}  ", indentation(doc.text(start)));
                    doc.insert(end, &[format!("{}{}", indent, item)]);
                }
            }
            report.inserted += 1;
        } else {
            report
                .missing_anchors
                .push(format!("title: '{}'", settings.menu_anchor_title));
        }
    }

    Patched {
        content: doc.render(),
        report,
    }
}

/// True when the item routes to our segment, or carries no route and one of our titles
fn owns_item(text: &str, footprint: &Footprint) -> bool {
    let Some((start, end)) = menu_title(text) else {
        return false;
    };
    match quoted_property(text, "route") {
        Some((r_start, r_end)) => text[r_start..r_end]
            .trim_start_matches('/')
            .eq_ignore_ascii_case(&footprint.segment),
        None => footprint
            .titles
            .iter()
            .any(|title| title.eq_ignore_ascii_case(&text[start..end])),
    }
}

/// Drop the menu item matching `footprint`, whichever title form it uses
pub fn remove_menu(content: &str, footprint: &Footprint) -> Patched {
    let mut doc = Document::parse(content);

    let doomed: Vec<usize> = doc
        .texts()
        .filter(|(_, text)| owns_item(text, footprint))
        .map(|(i, _)| i)
        .collect();
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

    const SIDEBAR: &str = "export class Sidebar {
  menuItems: MenuItem[] = [
    { title: 'Dashboard', icon: '📊', route: '/dashboard' },
    { title: 'Products', icon: '📦', route: '/products' },
    { title: 'Settings', icon: '⚙️', route: '/settings' }
  ];
}
";

    fn naming(table: &str) -> NamingBundle {
        NamingBundle::derive(table).unwrap()
    }

    #[test]
    fn test_apply_inserts_before_settings() {
        let settings = NavigationSettings::default();
        let patched = apply_menu(SIDEBAR, &naming("Order_Items"), &settings);

        let expected = "export class Sidebar {
  menuItems: MenuItem[] = [
    { title: 'Dashboard', icon: '📊', route: '/dashboard' },
    { title: 'Products', icon: '📦', route: '/products' },
    { title: 'Order Item', icon: '📋', route: '/order-items' },
    { title: 'Settings', icon: '⚙️', route: '/settings' }
  ];
}
";
        assert_eq!(patched.content, expected);
        assert_eq!(patched.report.inserted, 1);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let settings = NavigationSettings::default();
        let n = naming("Order_Items");
        let once = apply_menu(SIDEBAR, &n, &settings).content;
        let twice = apply_menu(&once, &n, &settings);
        assert_eq!(twice.content, once);
        assert!(twice.report.is_noop());
    }

    #[test]
    fn test_legacy_title_is_migrated_in_place() {
        let settings = NavigationSettings::default();
        let legacy = SIDEBAR.replace(
            "    { title: 'Settings'",
            "    { title: 'OrderItem', icon: '📋', route: '/order-items' },\n    { title: 'Settings'",
        );
        let patched = apply_menu(&legacy, &naming("Order_Items"), &settings);

        assert_eq!(patched.report.migrated, 1);
        assert_eq!(patched.report.inserted, 0);
        assert_eq!(
            patched.content,
            legacy.replace("title: 'OrderItem'", "title: 'Order Item'")
        );
    }

    #[test]
    fn test_fallback_without_anchor() {
        let settings = NavigationSettings::default();
        let content = "  menuItems: MenuItem[] = [\n    { title: 'Dashboard', icon: '📊', route: '/dashboard' }\n  ];\n";
        let patched = apply_menu(content, &naming("Customers"), &settings);

        assert_eq!(
            patched.content,
            "  menuItems: MenuItem[] = [\n    { title: 'Dashboard', icon: '📊', route: '/dashboard' },\n    { title: 'Customer', icon: '📋', route: '/customers' },\n  ];\n"
        );
        assert!(patched.report.missing_anchors.is_empty());
    }

    #[test]
    fn test_fallback_into_empty_array() {
        let settings = NavigationSettings::default();
        let content = "  menuItems: MenuItem[] = [\n  ];\n";
        let patched = apply_menu(content, &naming("Customers"), &settings);
        assert_eq!(
            patched.content,
            "  menuItems: MenuItem[] = [\n    { title: 'Customer', icon: '📋', route: '/customers' },\n  ];\n"
        );
    }

    #[test]
    fn test_missing_menu_is_reported() {
        let settings = NavigationSettings::default();
        let content = "export const nothing = 1;\n";
        let patched = apply_menu(content, &naming("Customers"), &settings);
        assert_eq!(patched.content, content);
        assert_eq!(patched.report.missing_anchors, vec!["title: 'Settings'".to_string()]);
    }

    #[test]
    fn test_round_trip_keeps_other_items() {
        let settings = NavigationSettings::default();
        let customers = naming("Customers");
        let orders = naming("Order_Items");

        let with_customers = apply_menu(SIDEBAR, &customers, &settings).content;
        let with_both = apply_menu(&with_customers, &orders, &settings).content;
        let removed = remove_menu(&with_both, &Footprint::for_table(&orders));

        assert_eq!(removed.content, with_customers);
        assert_eq!(removed.report.removed, 1);
    }

    #[test]
    fn test_remove_handles_legacy_title() {
        let settings = NavigationSettings::default();
        let legacy = SIDEBAR.replace(
            "    { title: 'Settings'",
            "    { title: 'OrderItem', icon: '📋', route: '/order-items' },\n    { title: 'Settings'",
        );
        let removed = remove_menu(&legacy, &Footprint::for_table(&naming("Order_Items")));
        assert_eq!(removed.content, SIDEBAR);
    }

    #[test]
    fn test_remove_by_folder_matches_route() {
        let settings = NavigationSettings::default();
        let applied = apply_menu(SIDEBAR, &naming("Movie"), &settings).content;
        assert!(applied.contains("{ title: 'Movie', icon: '📋', route: '/movies' },"));

        let removed = remove_menu(&applied, &Footprint::for_folder("movies"));
        assert_eq!(removed.content, SIDEBAR);
        assert_eq!(removed.report.removed, 1);
    }

    #[test]
    fn test_remove_keeps_same_title_with_other_route() {
        let custom = SIDEBAR.replace(
            "    { title: 'Settings'",
            "    { title: 'Order Item', icon: '🧾', route: '/reports/order-items' },\n    { title: 'Settings'",
        );
        let removed = remove_menu(&custom, &Footprint::for_table(&naming("Order_Items")));
        assert_eq!(removed.content, custom);
        assert!(removed.report.is_noop());
    }

    #[test]
    fn test_remove_item_without_route_by_title() {
        let bare = SIDEBAR.replace(
            "    { title: 'Settings'",
            "    { title: 'OrderItem', icon: '📋' },\n    { title: 'Settings'",
        );
        let removed = remove_menu(&bare, &Footprint::for_table(&naming("Order_Items")));
        assert_eq!(removed.content, SIDEBAR);
    }
}
