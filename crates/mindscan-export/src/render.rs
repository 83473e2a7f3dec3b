use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use crate::error::ExportError;
use crate::report::ScreeningReport;

pub const DEFAULT_TEMPLATE_NAME: &str = "screening_report.md";

/// Built-in Markdown report layout. Lines follow the subset understood by
/// [`crate::docx::generate_docx`].
pub const DEFAULT_TEMPLATE: &str = r#"# {{ title }}

**Instrument:** {{ instrument_name }} ({{ instrument_id }})
**Generated:** {{ generated_at }}
{% if immediate_action_required %}
> IMMEDIATE ACTION REQUIRED: this screening indicates possible risk of harm. Contact emergency services or a crisis line now.
{% endif %}
## Summary

- **Total score:** {{ total_score }} / {{ max_possible_score }} ({{ percent_of_max }}%)
- **Severity:** {{ severity_label }}
- **Risk level:** {{ risk_level }}
{% if flags %}
## Risk Flags
{% for flag in flags %}
{% if flag.crisis %}> {{ flag.message }} ({{ flag.severity }}){% else %}- {{ flag.message }} ({{ flag.severity }}){% endif %}
{%- endfor %}
{% endif %}
## Domain Scores
{% for d in domain_scores %}
- **{{ d.domain }}:** {{ d.score }}
{%- endfor %}

## Interpretation

{{ narrative }}

## Recommendations
{% for r in recommendations %}
{{ loop.index }}. {{ r }}
{%- endfor %}

## Next Steps
{% for s in next_steps %}
{{ loop.index }}. {{ s }}
{%- endfor %}
{% if emergency_contacts %}
## Emergency Contacts
{% for c in emergency_contacts %}
- **{{ c.name }}:** {{ c.number }} ({{ c.availability }})
{%- endfor %}
{% endif %}
---

{{ disclaimer }}
"#;

/// Render a Tera template against any serializable context value.
///
/// The `template_content` is the raw template string (Jinja2 syntax).
pub fn render_template<T: Serialize>(
    template_name: &str,
    template_content: &str,
    value: &T,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let value = serde_json::to_value(value)?;
    let context = Context::from_value(value)
        .map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tera.render(template_name, &context)?;
    debug!(template = template_name, bytes = rendered.len(), "template rendered");
    Ok(rendered)
}

/// Render a report with the caller's template, or the built-in one.
pub fn render_report(report: &ScreeningReport, template: Option<&str>) -> Result<String, ExportError> {
    match template {
        Some(content) => render_template("custom_report.md", content, report),
        None => render_template(DEFAULT_TEMPLATE_NAME, DEFAULT_TEMPLATE, report),
    }
}
