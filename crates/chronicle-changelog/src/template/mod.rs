//! Changelog templates
//!
//! Templates are handlebars, rendered in strict mode with escaping off since
//! the output is markdown. Only the `each`, `if` and `unless` block helpers
//! are available. Paths resolve against the current item; `../name` reaches
//! the enclosing one and `@root.releases` the top of the document.
//!
//! Every path is checked against the scope it appears in when the template
//! is compiled.

mod schema;

use std::fmt;
use std::str::FromStr;

use handlebars::{no_escape, Handlebars, RenderError};
use serde_json::Value;

use chronicle_core::error::TemplateError;

const NAME: &str = "changelog";

/// Markdown layout used when no template is configured
pub const DEFAULT_TEMPLATE: &str = "\
# Changelog
{{#each releases}}

## {{version}}{{#if date}} ({{date}}){{/if}}
{{#each categories}}

### {{label}}

{{#each commits}}
- {{#if scope}}**{{scope}}:** {{/if}}{{subject}} ({{hash}})
{{#if breaking_description}}
  {{breaking_description}}
{{/if}}
{{/each}}
{{/each}}
{{/each}}
";

/// A compiled, validated template
#[derive(Clone)]
pub struct Template {
    registry: Handlebars<'static>,
}

impl Template {
    /// Parse and validate template source
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(no_escape);
        registry
            .register_template_string(NAME, source)
            .map_err(|e| TemplateError::Syntax(e.to_string()))?;

        if let Some(compiled) = registry.get_template(NAME) {
            schema::check(compiled)?;
        }
        Ok(Self { registry })
    }

    /// Render against a document value
    pub fn render(&self, data: &Value) -> Result<String, RenderError> {
        self.registry.render(NAME, data)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template").finish_non_exhaustive()
    }
}

impl FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(source: &str, data: Value) -> String {
        Template::compile(source).unwrap().render(&data).unwrap()
    }

    #[test]
    fn test_default_template_compiles() {
        assert!(Template::compile(DEFAULT_TEMPLATE).is_ok());
    }

    #[test]
    fn test_render_lists_and_optionals() {
        let source = "{{#each releases}}\n## {{version}}{{#if date}} ({{date}}){{/if}}\n{{/each}}\n";
        let data = json!({
            "releases": [
                {"version": "Unreleased", "date": null},
                {"version": "v1.0.0", "date": "2024-01-02"},
            ]
        });

        assert_eq!(render(source, data), "## Unreleased\n## v1.0.0 (2024-01-02)\n");
    }

    #[test]
    fn test_render_else_and_booleans() {
        let source = "{{#each releases}}{{#if unreleased}}*{{else}}-{{/if}}{{commit_count}} {{else}}none{{/each}}";

        let data = json!({
            "releases": [
                {"unreleased": true, "commit_count": 3},
                {"unreleased": false, "commit_count": 0},
            ]
        });
        assert_eq!(render(source, data), "*3 -0 ");
        assert_eq!(render(source, json!({"releases": []})), "none");
    }

    #[test]
    fn test_parent_paths() {
        let source = "{{#each releases}}{{#each categories}}{{#each commits}}{{../../version}}/{{../label}}/{{subject}};{{/each}}{{/each}}{{/each}}";
        let data = json!({
            "releases": [{
                "version": "v2",
                "categories": [{
                    "label": "Fixes",
                    "commits": [{"subject": "a"}, {"subject": "b"}]
                }]
            }]
        });

        assert_eq!(render(source, data), "v2/Fixes/a;v2/Fixes/b;");
    }

    #[test]
    fn test_markdown_is_not_escaped() {
        let source = "{{#each releases}}{{version}}{{/each}}";
        let data = json!({"releases": [{"version": "<v1> & 'co'"}]});
        assert_eq!(render(source, data), "<v1> & 'co'");
    }

    #[test]
    fn test_render_is_deterministic() {
        let template = Template::compile(DEFAULT_TEMPLATE).unwrap();
        let data = json!({"releases": [{"version": "v1", "date": null, "categories": []}]});
        assert_eq!(template.render(&data).unwrap(), template.render(&data).unwrap());
        assert_eq!(template.render(&data).unwrap(), "# Changelog\n\n## v1\n");
    }

    #[test]
    fn test_strict_mode_rejects_missing_fields() {
        let template = Template::compile("{{#each releases}}{{version}}{{/each}}").unwrap();
        assert!(template.render(&json!({"releases": [{}]})).is_err());
    }

    #[test]
    fn test_compile_rejects_unknown_names() {
        let err = "{{#each releases}}{{title}}{{/each}}"
            .parse::<Template>()
            .unwrap_err();
        assert!(err
            .to_string()
            .ends_with("unknown placeholder 'title' in release scope"));
    }

    #[test]
    fn test_compile_rejects_bad_syntax() {
        assert!(matches!(
            Template::compile("{{#each releases}}{{version}}"),
            Err(TemplateError::Syntax(_))
        ));
    }
}
