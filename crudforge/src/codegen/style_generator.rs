//! Stylesheets for the list and form views.
//!
//! Both are fixed: the markup only uses table-independent class names.

const LIST_STYLES: &str = include_str!("templates/list.css");
const FORM_STYLES: &str = include_str!("templates/form.css");

pub fn generate_list_css() -> String {
    LIST_STYLES.to_string()
}

pub fn generate_form_css() -> String {
    FORM_STYLES.to_string()
}
