//! Form generator - reactive create/edit form

use tracing::debug;

use super::context::{Field, TemplateContext};
use super::type_resolver::{TargetType, WireType};

/// Input widget for a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Email,
    Password,
    Tel,
    Url,
    TextArea,
    Select,
    Number,
    Checkbox,
    Date,
    Time,
    DateTimeLocal,
    Text,
}

impl InputKind {
    /// Pick the widget for a field.
    ///
    /// Name heuristics win over the wire type, in this order: email,
    /// password, phone, url, long text, pick list.
    pub fn for_field(field: &Field<'_>) -> Self {
        let name = field.lower_name();
        let has = |fragments: &[&str]| fragments.iter().any(|f| name.contains(f));

        if has(&["email"]) {
            return InputKind::Email;
        }
        if has(&["password"]) {
            return InputKind::Password;
        }
        if has(&["phone", "tel"]) {
            return InputKind::Tel;
        }
        if has(&["url", "website"]) {
            return InputKind::Url;
        }
        if has(&["description", "comment", "note"]) {
            return InputKind::TextArea;
        }
        if has(&["category", "status", "type"]) {
            return InputKind::Select;
        }

        match field.wire {
            WireType::Number => InputKind::Number,
            WireType::Boolean => InputKind::Checkbox,
            WireType::Date => match field.target.inner_type() {
                TargetType::Date => InputKind::Date,
                TargetType::Time => InputKind::Time,
                _ => InputKind::DateTimeLocal,
            },
            WireType::String => InputKind::Text,
        }
    }

    /// `type` attribute for `<input>` widgets
    pub fn html_type(&self) -> &'static str {
        match self {
            InputKind::Email => "email",
            InputKind::Password => "password",
            InputKind::Tel => "tel",
            InputKind::Url => "url",
            InputKind::TextArea => "textarea",
            InputKind::Select => "select",
            InputKind::Number => "number",
            InputKind::Checkbox => "checkbox",
            InputKind::Date => "date",
            InputKind::Time => "time",
            InputKind::DateTimeLocal => "datetime-local",
            InputKind::Text => "text",
        }
    }
}

/// Generate the form component logic
pub fn generate_form_component(ctx: &TemplateContext<'_>) -> String {
    let class = ctx.naming.singular_pascal.as_str();
    let component = ctx.naming.form_class();
    let service = ctx.naming.service_class();
    let file_stem = ctx.naming.singular_camel.as_str();
    let folder = ctx.naming.form_component();
    let route = ctx.naming.plural_kebab.as_str();
    let key_type = ctx.key_type;
    let display = ctx.naming.display_name.as_str();
    let display_lower = display.to_lowercase();
    let id_param = if key_type == "number" {
        "+params['id']"
    } else {
        "params['id']"
    };
    debug!("Generating form component {}", component);

    let mut code = String::new();

    code.push_str(&format!(
        r#"import {{ Component, OnInit }} from '@angular/core';
import {{ CommonModule }} from '@angular/common';
import {{ ReactiveFormsModule, FormBuilder, FormGroup, Validators }} from '@angular/forms';
import {{ Router, ActivatedRoute }} from '@angular/router';
import {{ {service} }} from '../../services/{file_stem}.service';
import {{ Header }} from '../header/header';
import {{ Sidebar }} from '../sidebar/sidebar';
import {{ Footer }} from '../footer/footer';

@Component({{
  selector: 'app-{route}-form',
  standalone: true,
  imports: [CommonModule, ReactiveFormsModule, Header, Sidebar, Footer],
  templateUrl: './{folder}.html',
  styleUrl: './{folder}.css'
}})
export class {component} implements OnInit {{
  {file_stem}Form: FormGroup;
  isEditMode = false;
  {file_stem}Id: {key_type} | null = null;
  isSubmitting = false;

  constructor(
    private fb: FormBuilder,
    private {file_stem}Service: {service},
    private router: Router,
    private route: ActivatedRoute
  ) {{
    this.{file_stem}Form = this.createForm();
  }}

  ngOnInit(): void {{
    this.route.params.subscribe(params => {{
      if (params['id']) {{
        this.isEditMode = true;
        this.{file_stem}Id = {id_param};
        this.load{class}();
      }}
    }});
  }}

  private createForm(): FormGroup {{
    return this.fb.group({{
"#
    ));

    code.push_str(&generate_form_controls(ctx));

    code.push_str(&format!(
        r#"    }});
  }}

  load{class}(): void {{
    if (this.{file_stem}Id != null) {{
      const existing = this.{file_stem}Service.get{class}ById(this.{file_stem}Id);
      if (existing) {{
        this.{file_stem}Form.patchValue(existing);
      }} else {{
        alert('{display} not found');
        this.router.navigate(['/{route}']);
      }}
    }}
  }}

  onSubmit(): void {{
    if (this.{file_stem}Form.invalid) {{
      this.markFormGroupTouched();
      return;
    }}

    this.isSubmitting = true;
    const formValue = this.{file_stem}Form.value;

    if (this.isEditMode && this.{file_stem}Id != null) {{
      if (this.{file_stem}Service.update{class}(this.{file_stem}Id, formValue)) {{
        this.router.navigate(['/{route}']);
      }} else {{
        alert('Failed to update {display_lower}');
      }}
    }} else {{
      if (this.{file_stem}Service.add{class}(formValue)) {{
        this.router.navigate(['/{route}']);
      }} else {{
        alert('Failed to create {display_lower}');
      }}
    }}
    this.isSubmitting = false;
  }}

  private markFormGroupTouched(): void {{
    Object.keys(this.{file_stem}Form.controls).forEach(key => {{
      this.{file_stem}Form.get(key)?.markAsTouched();
    }});
  }}

  onCancel(): void {{
    this.router.navigate(['/{route}']);
  }}

  getFieldError(fieldName: string): string {{
    const field = this.{file_stem}Form.get(fieldName);
    if (field?.errors && field.touched) {{
      if (field.errors['required']) {{
        return `${{fieldName}} is required`;
      }}
      if (field.errors['email']) {{
        return 'Please enter a valid email address';
      }}
      if (field.errors['min']) {{
        return `Minimum value is ${{field.errors['min'].min}}`;
      }}
      if (field.errors['maxlength']) {{
        return `Maximum length is ${{field.errors['maxlength'].requiredLength}}`;
      }}
    }}
    return '';
  }}
}}
"#
    ));

    code
}

/// One `fb.group` entry per editable column
fn generate_form_controls(ctx: &TemplateContext<'_>) -> String {
    let fields: Vec<_> = ctx.editable_fields().collect();
    let mut code = String::new();

    for (i, field) in fields.iter().enumerate() {
        let comma = if i + 1 < fields.len() { "," } else { "" };
        let validators = validators_for(field);
        let validators = if validators.is_empty() {
            String::new()
        } else {
            format!(", [{}]", validators.join(", "))
        };
        code.push_str(&format!(
            "      {}: [{}{}]{}\n",
            field.property,
            field.wire.default_literal(),
            validators,
            comma
        ));
    }

    code
}

/// Validators: required, bounded length, email format, non-negative numbers
pub fn validators_for(field: &Field<'_>) -> Vec<String> {
    let mut validators = Vec::new();

    if field.is_required() {
        validators.push("Validators.required".to_string());
    }

    if field.wire == WireType::String {
        if let Some(max) = field.column.max_length {
            validators.push(format!("Validators.maxLength({})", max));
        }
        if field.lower_name().contains("email") {
            validators.push("Validators.email".to_string());
        }
    }

    if field.wire == WireType::Number {
        validators.push("Validators.min(0)".to_string());
    }

    validators
}

/// Generate the form component markup
pub fn generate_form_html(ctx: &TemplateContext<'_>) -> String {
    let file_stem = ctx.naming.singular_camel.as_str();
    let display = ctx.naming.display_name.as_str();
    debug!("Generating form markup for {}", ctx.naming.singular_pascal);

    let mut code = String::new();

    code.push_str(&format!(
        r#"<div class="page-layout">
  <app-header></app-header>

  <div class="content-wrapper">
    <app-sidebar></app-sidebar>

    <main class="main-content">
      <div class="form-container">
        <div class="header-section">
          <h1>{{{{ isEditMode ? 'Edit' : 'Add New' }}}} {display}</h1>
        </div>

        <form [formGroup]="{file_stem}Form" (ngSubmit)="onSubmit()" class="entity-form">
          <div class="form-grid">
"#
    ));

    for field in ctx.editable_fields() {
        code.push_str(&generate_form_field(field));
    }

    code.push_str(&format!(
        r#"          </div>

          <div class="form-actions">
            <button
              type="button"
              class="btn btn-secondary"
              (click)="onCancel()"
              [disabled]="isSubmitting">
              Cancel
            </button>
            <button
              type="submit"
              class="btn btn-primary"
              [disabled]="{file_stem}Form.invalid || isSubmitting">
              {{{{ isSubmitting ? 'Saving...' : (isEditMode ? 'Update' : 'Create') }}}} {display}
            </button>
          </div>
        </form>
      </div>
    </main>
  </div>

  <app-footer></app-footer>
</div>
"#
    ));

    code
}

fn generate_form_field(field: &Field<'_>) -> String {
    let property = field.property.as_str();
    let label = field.label.as_str();
    let placeholder = label.to_lowercase();
    let required = if field.is_required() { " *" } else { "" };

    let mut code = String::new();
    code.push_str("            <div class=\"form-group\">\n");
    code.push_str(&format!(
        "              <label for=\"{property}\" class=\"form-label\">\n                {label}{required}\n              </label>\n"
    ));

    match InputKind::for_field(field) {
        InputKind::TextArea => {
            code.push_str(&format!(
                r#"              <textarea
                id="{property}"
                formControlName="{property}"
                class="form-input"
                placeholder="Enter {placeholder}"
                rows="3"></textarea>
"#
            ));
        }
        InputKind::Select => {
            code.push_str(&format!(
                r#"              <select
                id="{property}"
                formControlName="{property}"
                class="form-input">
                <option value="">Select {label}</option>
              </select>
"#
            ));
        }
        kind => {
            let html_type = kind.html_type();
            code.push_str(&format!(
                r#"              <input
                type="{html_type}"
                id="{property}"
                formControlName="{property}"
                class="form-input"
                placeholder="Enter {placeholder}">
"#
            ));
        }
    }

    code.push_str(&format!(
        "              <div class=\"field-error\" *ngIf=\"getFieldError('{property}')\">\n                {{{{ getFieldError('{property}') }}}}\n              </div>\n"
    ));
    code.push_str("            </div>\n\n");
    code
}
