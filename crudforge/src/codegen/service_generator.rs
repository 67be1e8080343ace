//! Service generator - in-memory data-access service over a BehaviorSubject

use tracing::debug;

use super::context::TemplateContext;

/// Generate the data-access service
pub fn generate_service(ctx: &TemplateContext<'_>) -> String {
    let class = ctx.naming.singular_pascal.as_str();
    let plural = ctx.naming.plural_pascal();
    let service = ctx.naming.service_class();
    let file_stem = ctx.naming.singular_camel.as_str();
    let items = ctx.naming.plural_camel.as_str();
    let key = ctx.key_property.as_str();
    let key_type = ctx.key_type;
    debug!("Generating service {}", service);

    let mut code = String::new();

    code.push_str(&format!(
        r#"import {{ Injectable }} from '@angular/core';
import {{ BehaviorSubject, Observable }} from 'rxjs';
import {{ {class} }} from '../models/{file_stem}.model';

@Injectable({{
  providedIn: 'root'
}})
export class {service} {{
  private {items}: {class}[] = [];
  private {items}Subject = new BehaviorSubject<{class}[]>([]);
  private nextId = 1;

  get{plural}(): Observable<{class}[]> {{
    return this.{items}Subject.asObservable();
  }}

  get{class}ById(id: {key_type}): {class} | undefined {{
    return this.{items}.find(item => item.{key} === id);
  }}

  add{class}(item: Omit<{class}, '{key}'>): boolean {{
    try {{
      const created = {{
        ...item,
        {key}: this.nextId++
      }} as {class};

      this.{items}.push(created);
      this.{items}Subject.next([...this.{items}]);
      return true;
    }} catch (error) {{
      console.error('Error adding {file_stem}:', error);
      return false;
    }}
  }}

  update{class}(id: {key_type}, updates: Partial<{class}>): boolean {{
    const index = this.{items}.findIndex(item => item.{key} === id);
    if (index === -1) {{
      return false;
    }}
    this.{items}[index] = {{ ...this.{items}[index], ...updates }};
    this.{items}Subject.next([...this.{items}]);
    return true;
  }}

  delete{class}(id: {key_type}): boolean {{
    const index = this.{items}.findIndex(item => item.{key} === id);
    if (index === -1) {{
      return false;
    }}
    this.{items}.splice(index, 1);
    this.{items}Subject.next([...this.{items}]);
    return true;
  }}

  search{plural}(searchTerm: string): {class}[] {{
    if (!searchTerm.trim()) {{
      return this.{items};
    }}

    const term = searchTerm.toLowerCase();
    return this.{items}.filter(item => {{
"#
    ));

    code.push_str(&generate_search_predicate(ctx));

    code.push_str(
        r#"    });
  }

  getCategories(): string[] {
    return [];
  }
}
"#,
    );

    code
}

/// OR of case-insensitive substring matches over every string column.
///
/// Tables without string columns match everything.
fn generate_search_predicate(ctx: &TemplateContext<'_>) -> String {
    let searchable: Vec<_> = ctx.searchable_fields().collect();
    if searchable.is_empty() {
        return "      return true;\n".to_string();
    }

    let mut code = String::from("      return (\n");
    for (i, field) in searchable.iter().enumerate() {
        let connector = if i + 1 < searchable.len() { " ||" } else { "" };
        code.push_str(&format!(
            "        (item.{}?.toLowerCase().includes(term) ?? false){}\n",
            field.property, connector
        ));
    }
    code.push_str("      );\n");
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::context::fixtures;
    use crate::codegen::NamingBundle;
    use crate::schema::{Column, Table};

    fn render(table: &Table) -> String {
        let naming = NamingBundle::derive(&table.name).unwrap();
        generate_service(&TemplateContext::new(table, &naming))
    }

    #[test]
    fn test_service_shape() {
        let service = render(&fixtures::order_items());
        assert!(service.contains("import { OrderItem } from '../models/orderItem.model';"));
        assert!(service.contains("export class OrderItemService {"));
        assert!(service.contains("getOrderItems(): Observable<OrderItem[]>"));
        assert!(service.contains("getOrderItemById(id: number): OrderItem | undefined"));
        assert!(service.contains("addOrderItem(item: Omit<OrderItem, 'id'>): boolean"));
        assert!(service.contains("id: this.nextId++"));
        assert!(service.contains("searchOrderItems(searchTerm: string): OrderItem[]"));
    }

    #[test]
    fn test_search_uses_string_columns() {
        let mut table = fixtures::order_items();
        table.columns.push(Column::new("Description", "nvarchar"));
        let service = render(&table);
        assert!(service.contains("(item.sku?.toLowerCase().includes(term) ?? false) ||\n"));
        assert!(service.contains("(item.description?.toLowerCase().includes(term) ?? false)\n"));
        assert!(!service.contains("item.quantity?.toLowerCase()"));
    }

    #[test]
    fn test_search_without_string_columns_matches_all() {
        let mut id = Column::new("Id", "int");
        id.is_primary_key = true;
        let table = Table {
            schema: "dbo".into(),
            name: "Counters".into(),
            columns: vec![id, Column::new("Value", "bigint")],
        };
        let service = render(&table);
        assert!(service.contains("      return true;\n"));
    }

    #[test]
    fn test_rendering_is_stable() {
        let table = fixtures::order_items();
        assert_eq!(render(&table), render(&table));
    }
}
