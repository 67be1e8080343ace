//! List view generator - sortable, searchable, paginated table

use tracing::debug;

use super::context::{Field, TemplateContext};
use super::type_resolver::WireType;

/// Column-name fragments that switch numeric cells to currency formatting
const CURRENCY_HINTS: [&str; 3] = ["price", "amount", "cost"];

/// Generate the list component logic
pub fn generate_list_component(ctx: &TemplateContext<'_>) -> String {
    let class = ctx.naming.singular_pascal.as_str();
    let plural = ctx.naming.plural_pascal();
    let component = ctx.naming.list_class();
    let service = ctx.naming.service_class();
    let file_stem = ctx.naming.singular_camel.as_str();
    let folder = ctx.naming.list_component();
    let items = ctx.naming.plural_camel.as_str();
    let route = ctx.naming.plural_kebab.as_str();
    let key = ctx.key_property.as_str();
    let display = ctx.naming.display_name.to_lowercase();
    debug!("Generating list component {}", component);

    format!(
        r#"import {{ Component, OnInit, OnDestroy }} from '@angular/core';
import {{ CommonModule }} from '@angular/common';
import {{ FormsModule }} from '@angular/forms';
import {{ Router }} from '@angular/router';
import {{ Subscription }} from 'rxjs';
import {{ {service} }} from '../../services/{file_stem}.service';
import {{ {class} }} from '../../models/{file_stem}.model';
import {{ Header }} from '../header/header';
import {{ Sidebar }} from '../sidebar/sidebar';
import {{ Footer }} from '../footer/footer';

@Component({{
  selector: 'app-{route}-list',
  standalone: true,
  imports: [CommonModule, FormsModule, Header, Sidebar, Footer],
  templateUrl: './{folder}.html',
  styleUrl: './{folder}.css'
}})
export class {component} implements OnInit, OnDestroy {{
  {items}: {class}[] = [];
  filtered{plural}: {class}[] = [];
  searchTerm: string = '';
  selectedCategory: string = '';
  categories: string[] = [];

  currentPage: number = 1;
  itemsPerPage: number = 10;
  totalItems: number = 0;

  sortField: keyof {class} = '{key}';
  sortDirection: 'asc' | 'desc' = 'asc';

  private subscription: Subscription = new Subscription();

  constructor(
    private {file_stem}Service: {service},
    private router: Router
  ) {{}}

  ngOnInit(): void {{
    this.load{plural}();
    this.loadCategories();
  }}

  ngOnDestroy(): void {{
    this.subscription.unsubscribe();
  }}

  load{plural}(): void {{
    this.subscription.add(
      this.{file_stem}Service.get{plural}().subscribe({items} => {{
        this.{items} = {items};
        this.applyFiltersAndSort();
      }})
    );
  }}

  loadCategories(): void {{
    this.categories = ['All', ...this.{file_stem}Service.getCategories()];
  }}

  applyFiltersAndSort(): void {{
    let filtered = [...this.{items}];

    if (this.searchTerm.trim()) {{
      filtered = [...this.{file_stem}Service.search{plural}(this.searchTerm)];
    }}

    // Missing values sort last in both directions
    filtered.sort((a, b) => {{
      const aValue = a[this.sortField];
      const bValue = b[this.sortField];

      if (aValue == null && bValue == null) {{
        return 0;
      }}
      if (aValue == null) {{
        return 1;
      }}
      if (bValue == null) {{
        return -1;
      }}

      let comparison = 0;
      if (aValue < bValue) comparison = -1;
      else if (aValue > bValue) comparison = 1;

      return this.sortDirection === 'desc' ? -comparison : comparison;
    }});

    this.filtered{plural} = filtered;
    this.totalItems = filtered.length;
    this.currentPage = 1;
  }}

  onSearch(): void {{
    this.applyFiltersAndSort();
  }}

  onCategoryChange(): void {{
    this.applyFiltersAndSort();
  }}

  sortBy(field: keyof {class}): void {{
    if (this.sortField === field) {{
      this.sortDirection = this.sortDirection === 'asc' ? 'desc' : 'asc';
    }} else {{
      this.sortField = field;
      this.sortDirection = 'asc';
    }}
    this.applyFiltersAndSort();
  }}

  getSortIcon(field: keyof {class}): string {{
    if (this.sortField !== field) return '↕️';
    return this.sortDirection === 'asc' ? '↑' : '↓';
  }}

  getPaginated{plural}(): {class}[] {{
    const startIndex = (this.currentPage - 1) * this.itemsPerPage;
    return this.filtered{plural}.slice(startIndex, startIndex + this.itemsPerPage);
  }}

  getTotalPages(): number {{
    return Math.ceil(this.totalItems / this.itemsPerPage);
  }}

  goToPage(page: number): void {{
    if (page >= 1 && page <= this.getTotalPages()) {{
      this.currentPage = page;
    }}
  }}

  previousPage(): void {{
    if (this.currentPage > 1) {{
      this.currentPage--;
    }}
  }}

  nextPage(): void {{
    if (this.currentPage < this.getTotalPages()) {{
      this.currentPage++;
    }}
  }}

  add{class}(): void {{
    this.router.navigate(['/{route}/new']);
  }}

  edit{class}(item: {class}): void {{
    this.router.navigate(['/{route}/edit', item.{key}]);
  }}

  delete{class}(item: {class}): void {{
    if (confirm('Are you sure you want to delete this {display}?')) {{
      if (!this.{file_stem}Service.delete{class}(item.{key})) {{
        alert('Failed to delete {display}');
      }}
    }}
  }}

  getStartIndex(): number {{
    return this.totalItems === 0 ? 0 : (this.currentPage - 1) * this.itemsPerPage + 1;
  }}

  getEndIndex(): number {{
    return Math.min(this.currentPage * this.itemsPerPage, this.totalItems);
  }}

  // -1 marks an ellipsis
  getVisiblePages(): number[] {{
    const totalPages = this.getTotalPages();
    const visiblePages: number[] = [];

    if (totalPages <= 7) {{
      for (let i = 1; i <= totalPages; i++) {{
        visiblePages.push(i);
      }}
    }} else if (this.currentPage <= 4) {{
      for (let i = 1; i <= 5; i++) {{
        visiblePages.push(i);
      }}
      visiblePages.push(-1);
      visiblePages.push(totalPages);
    }} else if (this.currentPage >= totalPages - 3) {{
      visiblePages.push(1);
      visiblePages.push(-1);
      for (let i = totalPages - 4; i <= totalPages; i++) {{
        visiblePages.push(i);
      }}
    }} else {{
      visiblePages.push(1);
      visiblePages.push(-1);
      for (let i = this.currentPage - 1; i <= this.currentPage + 1; i++) {{
        visiblePages.push(i);
      }}
      visiblePages.push(-1);
      visiblePages.push(totalPages);
    }}

    return visiblePages;
  }}

  onPageSizeChange(): void {{
    this.itemsPerPage = +this.itemsPerPage;
    this.applyFiltersAndSort();
  }}

  formatCurrency(amount: number | null | undefined): string {{
    if (amount == null) {{
      return '';
    }}
    return new Intl.NumberFormat('en-US', {{
      style: 'currency',
      currency: 'USD'
    }}).format(amount);
  }}
}}
"#
    )
}

/// Generate the list component markup
pub fn generate_list_html(ctx: &TemplateContext<'_>) -> String {
    let class = ctx.naming.singular_pascal.as_str();
    let plural = ctx.naming.plural_pascal();
    let title = ctx.naming.display_name.as_str();
    let plural_title = ctx.naming.plural_display_name();
    let plural_lower = plural_title.to_lowercase();
    debug!("Generating list markup for {}", class);

    let mut code = String::new();

    code.push_str(&format!(
        r#"<div class="page-layout">
  <app-header></app-header>

  <div class="content-wrapper">
    <app-sidebar></app-sidebar>

    <main class="main-content">
      <div class="list-container">
        <div class="header-section">
          <h1>{title} Management</h1>
          <button type="button" class="btn btn-primary" (click)="add{class}()">
            <span class="icon">+</span>
            Add New {title}
          </button>
        </div>

        <div class="filter-section">
          <div class="search-bar">
            <input
              type="text"
              class="search-input"
              placeholder="Search {plural_lower}..."
              [(ngModel)]="searchTerm"
              (input)="onSearch()">
          </div>

          <div class="filter-controls">
            <select
              class="filter-select"
              [(ngModel)]="selectedCategory"
              (change)="onCategoryChange()">
              <option value="">All Categories</option>
              <option *ngFor="let category of categories" [value]="category">{{{{ category }}}}</option>
            </select>
          </div>
        </div>

        <div class="table-container">
          <table class="data-table">
            <thead>
              <tr>
"#
    ));

    for field in ctx.display_fields() {
        code.push_str(&format!(
            "                <th class=\"sortable-header\" (click)=\"sortBy('{}')\">\n",
            field.property
        ));
        code.push_str(&format!("                  {}\n", field.label));
        code.push_str(&format!(
            "                  <span class=\"sort-icon\">{{{{ getSortIcon('{}') }}}}</span>\n",
            field.property
        ));
        code.push_str("                </th>\n");
    }

    code.push_str(&format!(
        r#"                <th class="actions-column">Actions</th>
              </tr>
            </thead>
            <tbody>
              <tr *ngFor="let item of getPaginated{plural}()" class="table-row">
"#
    ));

    for field in ctx.display_fields() {
        code.push_str(&format!("                <td>{}</td>\n", cell_content(field, "item")));
    }

    code.push_str(&format!(
        r#"                <td class="actions-cell">
                  <button
                    type="button"
                    class="btn btn-outline btn-sm"
                    (click)="edit{class}(item)">
                    Edit
                  </button>
                  <button
                    type="button"
                    class="btn btn-danger btn-sm"
                    (click)="delete{class}(item)">
                    Delete
                  </button>
                </td>
              </tr>
            </tbody>
          </table>

          <div class="empty-state" *ngIf="filtered{plural}.length === 0">
            <div class="empty-icon">📋</div>
            <h3>No {plural_title} Found</h3>
            <p>{{{{ searchTerm ? 'No {plural_lower} match your search criteria.' : 'No {plural_lower} available. Add one to get started.' }}}}</p>
          </div>
        </div>

        <div class="pagination-section" *ngIf="totalItems > 0">
          <div class="pagination-info">
            <span>Showing {{{{ getStartIndex() }}}} to {{{{ getEndIndex() }}}} of {{{{ totalItems }}}} entries</span>
            <div class="page-size-selector">
              <label>Show:</label>
              <select [(ngModel)]="itemsPerPage" (change)="onPageSizeChange()">
                <option value="10">10</option>
                <option value="25">25</option>
                <option value="50">50</option>
                <option value="100">100</option>
              </select>
              <span>per page</span>
            </div>
          </div>

          <div class="pagination-controls">
            <button
              type="button"
              class="btn btn-outline btn-sm"
              [disabled]="currentPage === 1"
              (click)="previousPage()">
              Previous
            </button>

            <div class="page-numbers">
              <button
                *ngFor="let page of getVisiblePages()"
                type="button"
                class="btn btn-outline btn-sm"
                [class.active]="page === currentPage"
                [disabled]="page === -1"
                (click)="page !== -1 && goToPage(page)">
                {{{{ page === -1 ? '...' : page }}}}
              </button>
            </div>

            <button
              type="button"
              class="btn btn-outline btn-sm"
              [disabled]="currentPage === getTotalPages()"
              (click)="nextPage()">
              Next
            </button>
          </div>
        </div>
      </div>
    </main>
  </div>

  <app-footer></app-footer>
</div>
"#
    ));

    code
}

/// True for numeric columns whose name suggests money
pub fn is_currency(field: &Field<'_>) -> bool {
    let name = field.lower_name();
    field.wire == WireType::Number && CURRENCY_HINTS.iter().any(|hint| name.contains(hint))
}

/// Cell body for one column, formatted by wire type
fn cell_content(field: &Field<'_>, item: &str) -> String {
    let value = format!("{}.{}", item, field.property);
    match field.wire {
        WireType::Number if is_currency(field) => format!("{{{{ formatCurrency({}) }}}}", value),
        WireType::Date => format!("{{{{ {} | date:'short' }}}}", value),
        WireType::Boolean => format!(
            "<span class=\"status-badge\" [class.status-active]=\"{0}\">{{{{ {0} ? 'Yes' : 'No' }}}}</span>",
            value
        ),
        _ => format!("{{{{ {} }}}}", value),
    }
}
