//! Backend entity generator - one annotated C# class per table

use heck::ToUpperCamelCase;
use tracing::debug;

use super::context::{Field, TemplateContext};
use super::type_resolver::TargetType;

/// First line of every generated entity; cleanup keys on it
pub const AUTO_GENERATED_MARKER: &str = "// <auto-generated>";

/// Appended to a property that would share its enclosing class's name
const CLASH_SUFFIX: &str = "Value";

/// Generate the entity class
pub fn generate_entity(ctx: &TemplateContext<'_>, namespace: &str) -> String {
    let class = ctx.naming.singular_pascal.as_str();
    debug!("Generating entity {}", class);

    let mut code = String::new();

    code.push_str(AUTO_GENERATED_MARKER);
    code.push('\n');
    code.push_str(&format!(
        "//     Generated by crudforge from {}. Changes will be overwritten.\n",
        ctx.table.qualified_name()
    ));
    code.push_str("// </auto-generated>\n");
    code.push_str("using System;\n");
    code.push_str("using System.ComponentModel.DataAnnotations;\n");
    code.push_str("using System.ComponentModel.DataAnnotations.Schema;\n\n");

    code.push_str(&format!("namespace {}\n{{\n", namespace));
    code.push_str(&format!(
        "    [Table(\"{}\", Schema = \"{}\")]\n",
        ctx.table.name, ctx.table.schema
    ));
    code.push_str(&format!("    public class {}\n    {{\n", class));

    let properties: Vec<String> = ctx
        .fields
        .iter()
        .map(|field| generate_property(field, class))
        .collect();
    code.push_str(&properties.join("\n"));

    code.push_str("    }\n}\n");
    code
}

/// C# property name for a column; members may not be named like their class
fn property_name(column_name: &str, class: &str) -> String {
    let property = column_name.to_upper_camel_case();
    if property == class {
        format!("{}{}", property, CLASH_SUFFIX)
    } else {
        property
    }
}

fn generate_property(field: &Field<'_>, class: &str) -> String {
    let column = field.column;
    let property = property_name(&column.name, class);
    let mut code = String::new();

    if column.is_primary_key {
        code.push_str("        [Key]\n");
    }
    if column.is_identity {
        code.push_str("        [DatabaseGenerated(DatabaseGeneratedOption.Identity)]\n");
    }
    if !column.nullable && !column.is_primary_key {
        code.push_str("        [Required]\n");
    }
    if let (TargetType::String, Some(max)) = (field.target.inner_type(), column.max_length) {
        code.push_str(&format!("        [MaxLength({})]\n", max));
    }
    if property != column.name {
        code.push_str(&format!("        [Column(\"{}\")]\n", column.name));
    }

    let initializer = match &field.target {
        TargetType::String if !column.nullable => " = string.Empty;",
        TargetType::Bytes if !column.nullable => " = Array.Empty<byte>();",
        _ => "",
    };
    code.push_str(&format!(
        "        public {} {} {{ get; set; }}{}\n",
        field.target, property, initializer
    ));

    code
}
