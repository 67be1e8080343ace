//! Generated file records and their destination paths

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::naming::NamingBundle;

/// Kind of generated file, as reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Model,
    Service,
    Component,
    Template,
    Stylesheet,
    Entity,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::Model => "model",
            FileType::Service => "service",
            FileType::Component => "component",
            FileType::Template => "template",
            FileType::Stylesheet => "stylesheet",
            FileType::Entity => "entity",
        };
        f.write_str(name)
    }
}

/// One artifact ready to be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFile {
    pub file_name: String,
    pub file_path: PathBuf,
    pub file_type: FileType,
    pub content: String,
}

impl GeneratedFile {
    fn at(dir: PathBuf, file_name: String, file_type: FileType, content: String) -> Self {
        Self {
            file_path: dir.join(&file_name),
            file_name,
            file_type,
            content,
        }
    }
}

/// Destination directories, relative to the front-end base path
pub const MODELS_DIR: &str = "models";
pub const SERVICES_DIR: &str = "services";
pub const COMPONENTS_DIR: &str = "components";

/// The eight front-end bodies for one table, in assembly order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifacts {
    pub model: String,
    pub service: String,
    pub list_component: String,
    pub list_html: String,
    pub list_css: String,
    pub form_component: String,
    pub form_html: String,
    pub form_css: String,
}

/// Map rendered bodies onto their fixed locations under `base`
pub fn assemble_frontend(
    base: &Path,
    naming: &NamingBundle,
    rendered: RenderedArtifacts,
) -> Vec<GeneratedFile> {
    let stem = &naming.singular_camel;
    let list = naming.list_component();
    let form = naming.form_component();
    let list_dir = base.join(COMPONENTS_DIR).join(&list);
    let form_dir = base.join(COMPONENTS_DIR).join(&form);

    vec![
        GeneratedFile::at(
            base.join(MODELS_DIR),
            format!("{}.model.ts", stem),
            FileType::Model,
            rendered.model,
        ),
        GeneratedFile::at(
            base.join(SERVICES_DIR),
            format!("{}.service.ts", stem),
            FileType::Service,
            rendered.service,
        ),
        GeneratedFile::at(
            list_dir.clone(),
            format!("{}.ts", list),
            FileType::Component,
            rendered.list_component,
        ),
        GeneratedFile::at(
            list_dir.clone(),
            format!("{}.html", list),
            FileType::Template,
            rendered.list_html,
        ),
        GeneratedFile::at(
            list_dir,
            format!("{}.css", list),
            FileType::Stylesheet,
            rendered.list_css,
        ),
        GeneratedFile::at(
            form_dir.clone(),
            format!("{}.ts", form),
            FileType::Component,
            rendered.form_component,
        ),
        GeneratedFile::at(
            form_dir.clone(),
            format!("{}.html", form),
            FileType::Template,
            rendered.form_html,
        ),
        GeneratedFile::at(
            form_dir,
            format!("{}.css", form),
            FileType::Stylesheet,
            rendered.form_css,
        ),
    ]
}

/// `{backend}/{SingularPascal}.cs`
pub fn assemble_entity(backend: &Path, naming: &NamingBundle, content: String) -> GeneratedFile {
    GeneratedFile::at(
        backend.to_path_buf(),
        format!("{}.cs", naming.singular_pascal),
        FileType::Entity,
        content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_bodies() -> RenderedArtifacts {
        RenderedArtifacts {
            model: String::new(),
            service: String::new(),
            list_component: String::new(),
            list_html: String::new(),
            list_css: String::new(),
            form_component: String::new(),
            form_html: String::new(),
            form_css: String::new(),
        }
    }

    #[test]
    fn test_frontend_layout() {
        let naming = NamingBundle::derive("dbo.Order_Items").unwrap();
        let files = assemble_frontend(Path::new("app"), &naming, empty_bodies());
        let paths: Vec<_> = files.iter().map(|f| f.file_path.clone()).collect();

        assert_eq!(
            paths,
            vec![
                PathBuf::from("app/models/orderItem.model.ts"),
                PathBuf::from("app/services/orderItem.service.ts"),
                PathBuf::from("app/components/orderItems-list/orderItems-list.ts"),
                PathBuf::from("app/components/orderItems-list/orderItems-list.html"),
                PathBuf::from("app/components/orderItems-list/orderItems-list.css"),
                PathBuf::from("app/components/orderItems-form/orderItems-form.ts"),
                PathBuf::from("app/components/orderItems-form/orderItems-form.html"),
                PathBuf::from("app/components/orderItems-form/orderItems-form.css"),
            ]
        );
        assert_eq!(files[3].file_type, FileType::Template);
        assert_eq!(files[3].file_name, "orderItems-list.html");
    }

    #[test]
    fn test_entity_location() {
        let naming = NamingBundle::derive("Categories").unwrap();
        let file = assemble_entity(Path::new("api/Models"), &naming, String::new());
        assert_eq!(file.file_path, PathBuf::from("api/Models/Category.cs"));
        assert_eq!(file.file_type.to_string(), "entity");
    }

    #[test]
    fn test_json_shape() {
        let naming = NamingBundle::derive("Products").unwrap();
        let file = assemble_entity(Path::new("out"), &naming, "x".into());
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["fileName"], "Product.cs");
        assert_eq!(json["fileType"], "entity");
    }
}
