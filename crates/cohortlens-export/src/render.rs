use tera::{Context, Tera};

use cohortlens_core::models::export::ExportBundle;

use crate::error::ExportError;

const REPORT_TEMPLATE_NAME: &str = "report.md";

const REPORT_TEMPLATE: &str = r#"# Cohort Summary: Patient {{ selected_patient_id }}

Generated {{ timestamp }}

## Patient Summary

{{ patient_summary }}

## Population Summary

{{ population_summary }}

---

## Prompts

### Patient system prompt

{{ system_prompt }}

### Patient user prompt

```
{{ user_prompt }}
```

### Population system prompt

{{ population_system_prompt }}

### Population user prompt

```
{{ population_user_prompt }}
```
"#;

/// Render the built-in Markdown report for a bundle.
pub fn render_report(bundle: &ExportBundle) -> Result<String, ExportError> {
    render_template(REPORT_TEMPLATE_NAME, REPORT_TEMPLATE, bundle)
}

/// Render a Tera template with the bundle's fields as context variables.
///
/// Autoescaping is off: the output is Markdown, not HTML.
pub fn render_template(
    template_name: &str,
    template_content: &str,
    bundle: &ExportBundle,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let value = serde_json::to_value(bundle)?;
    let context =
        Context::from_value(value).map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tera.render(template_name, &context)?;
    Ok(rendered)
}
