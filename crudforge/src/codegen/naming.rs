//! Naming utilities for code generation

use heck::{ToLowerCamelCase, ToTitleCase};
use serde::Serialize;

use crate::error::{CodegenError, Result};

/// Every case and number variant of a table name used by the artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingBundle {
    /// `OrderItem`: class names, component names
    pub singular_pascal: String,
    /// `orderItem`: model and service file names
    pub singular_camel: String,
    /// `orderItems`: component folders, collections
    pub plural_camel: String,
    /// `order-items`: route segments
    pub plural_kebab: String,
    /// `Order Item`: menu titles and headings
    pub display_name: String,
}

impl NamingBundle {
    /// Derive the bundle from a raw, possibly schema-qualified, table identifier
    pub fn derive(table_name: &str) -> Result<Self> {
        let base = to_pascal_case(table_name);
        if base.is_empty() {
            return Err(CodegenError::InvalidTableName(table_name.to_string()));
        }

        let singular = match singularize(&base) {
            s if s.is_empty() => base,
            s => s,
        };
        let plural = pluralize(&singular);

        Ok(Self {
            singular_camel: to_camel_from_pascal(&singular),
            plural_camel: to_camel_from_pascal(&plural),
            plural_kebab: to_kebab_case(&plural),
            display_name: to_display_name(&singular),
            singular_pascal: singular,
        })
    }

    /// Folder stem used by older generator runs (singular instead of plural)
    pub fn legacy_folder(&self) -> &str {
        &self.singular_camel
    }

    /// `{plural}-list` / `{plural}-form` folder names
    pub fn list_component(&self) -> String {
        format!("{}-list", self.plural_camel)
    }

    pub fn form_component(&self) -> String {
        format!("{}-form", self.plural_camel)
    }

    /// `OrderItemList` / `OrderItemForm` / `OrderItemService`
    pub fn list_class(&self) -> String {
        format!("{}List", self.singular_pascal)
    }

    pub fn form_class(&self) -> String {
        format!("{}Form", self.singular_pascal)
    }

    pub fn service_class(&self) -> String {
        format!("{}Service", self.singular_pascal)
    }

    /// `OrderItems`: collection accessor names
    pub fn plural_pascal(&self) -> String {
        pluralize(&self.singular_pascal)
    }

    /// `Order Items`
    pub fn plural_display_name(&self) -> String {
        to_display_name(&self.plural_pascal())
    }
}

/// Split an identifier into words.
///
/// Words are separated by `_`, `-`, whitespace and case boundaries; runs of
/// capitals stay together unless the last one starts a new word
/// (`HTMLParser` → `HTML`, `Parser`).
pub fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();

    for token in input.split(|c: char| c == '_' || c == '-' || c.is_whitespace()) {
        let chars: Vec<char> = token.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let start = i;

            if c.is_ascii_uppercase() {
                let mut run = i;
                while run < chars.len() && chars[run].is_ascii_uppercase() {
                    run += 1;
                }
                let upper_len = run - i;
                let followed_by_lower = run < chars.len() && chars[run].is_ascii_lowercase();

                if upper_len == 1 && followed_by_lower {
                    i = run;
                    while i < chars.len() && chars[i].is_ascii_lowercase() {
                        i += 1;
                    }
                } else if followed_by_lower {
                    // Last capital belongs to the next word
                    i = run - 1;
                } else {
                    i = run;
                }
            } else if c.is_ascii_lowercase() {
                while i < chars.len() && chars[i].is_ascii_lowercase() {
                    i += 1;
                }
            } else if c.is_ascii_digit() {
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            } else {
                i += 1;
                continue;
            }

            words.push(chars[start..i].iter().collect());
        }
    }

    words
}

/// Convert a table identifier to PascalCase, preserving short acronyms.
///
/// The schema qualifier is dropped first: `dbo.Order_Items` → `OrderItems`.
pub fn to_pascal_case(input: &str) -> String {
    let input = input.trim();
    let input = match input.rfind('.') {
        Some(idx) => &input[idx + 1..],
        None => input,
    };
    let input = input.trim_matches(|c| matches!(c, '[' | ']' | '"' | '`'));

    let words = split_words(input);
    if words.is_empty() {
        return capitalize(input);
    }

    words.iter().map(|w| format_word(w)).collect()
}

fn format_word(word: &str) -> String {
    if word.chars().all(|c| c.is_ascii_digit()) {
        return word.to_string();
    }
    if word.len() <= 3 && word.chars().all(|c| c.is_ascii_uppercase()) {
        return word.to_string();
    }
    capitalize(&word.to_lowercase())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Reduce a plural PascalCase name to its singular form
pub fn singularize(name: &str) -> String {
    let lower = name.to_ascii_lowercase();

    if lower.ends_with("ies") {
        return format!("{}y", &name[..name.len() - 3]);
    }

    if ["ses", "xes", "zes", "ches", "shes"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return name[..name.len() - 2].to_string();
    }

    if lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") {
        return name[..name.len() - 1].to_string();
    }

    name.to_string()
}

/// Pluralize a singular PascalCase name
pub fn pluralize(name: &str) -> String {
    if name.is_empty() {
        return name.to_string();
    }
    let lower = name.to_ascii_lowercase();

    if lower.ends_with('y') && lower.len() > 1 {
        let before_y = lower.as_bytes()[lower.len() - 2];
        if !b"aeiou".contains(&before_y) {
            return format!("{}ies", &name[..name.len() - 1]);
        }
    }

    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return format!("{}es", name);
    }

    format!("{}s", name)
}

/// `OrderItem` → `orderItem`
pub fn to_camel_from_pascal(pascal: &str) -> String {
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `OrderItems` → `order-items`
pub fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() * 2);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() && i > 0 {
            out.push('-');
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// `OrderItem` → `Order Item`; two-letter acronyms stay upper case
pub fn to_display_name(name: &str) -> String {
    let words = split_words(name);
    if words.is_empty() {
        return name.to_string();
    }

    words
        .iter()
        .map(|w| {
            if w.len() <= 2 && w.chars().all(|c| c.is_ascii_uppercase()) {
                w.clone()
            } else {
                capitalize(&w.to_lowercase())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Column name → TypeScript property name (`Unit_Price` → `unitPrice`)
pub fn to_property_name(column_name: &str) -> String {
    column_name.to_lower_camel_case()
}

/// Column name → form label (`unit_price` → `Unit Price`)
pub fn to_column_label(column_name: &str) -> String {
    column_name.to_title_case()
}
