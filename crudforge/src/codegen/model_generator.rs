//! Model generator - one TypeScript interface per table

use tracing::debug;

use super::context::TemplateContext;

/// Generate the model interface
pub fn generate_model(ctx: &TemplateContext<'_>) -> String {
    let class = &ctx.naming.singular_pascal;
    debug!("Generating model {}", class);

    let mut code = String::new();
    code.push_str(&format!("export interface {} {{\n", class));

    for field in &ctx.fields {
        let optional = if field.is_optional() { "?" } else { "" };
        code.push_str(&format!(
            "  {}{}: {};\n",
            field.property,
            optional,
            field.wire.ts_type()
        ));
    }

    code.push_str("}\n");
    code
}
