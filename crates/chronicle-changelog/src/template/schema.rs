//! Names a template may use, per scope
//!
//! Walks a compiled handlebars template and checks every path against the
//! context it will be rendered in, so a typo fails at configuration time
//! instead of halfway through a render.

use handlebars::template::{HelperTemplate, Parameter, Template, TemplateElement};

use chronicle_core::error::TemplateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Document,
    Release,
    Category,
    Commit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Value,
    List(Scope),
}

/// What a path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Field(Field),
    /// `this`: the current list item
    Item,
    /// `@index`, `@first` and `@last`
    Meta,
}

impl Scope {
    fn name(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Release => "release",
            Self::Category => "category",
            Self::Commit => "commit",
        }
    }

    fn field(self, name: &str) -> Option<Field> {
        let field = match (self, name) {
            (Self::Document, "releases") => Field::List(Self::Release),
            (
                Self::Release,
                "version" | "tag" | "date" | "bump" | "next_version" | "unreleased"
                | "commit_count",
            ) => Field::Value,
            (Self::Release, "categories") => Field::List(Self::Category),
            (Self::Category, "label" | "category" | "count") => Field::Value,
            (Self::Category, "commits") => Field::List(Self::Commit),
            (
                Self::Commit,
                "subject" | "raw_subject" | "scope" | "hash" | "full_hash" | "type" | "author"
                | "body" | "breaking" | "breaking_description",
            ) => Field::Value,
            _ => return None,
        };
        Some(field)
    }
}

/// Resolve a path the way handlebars does: against the current context only,
/// with `../` stepping out one `{{#each}}` and `@root.` starting at the top
fn resolve(stack: &[Scope], path: &str) -> Option<Target> {
    if let Some(rest) = path.strip_prefix("@root.") {
        return Scope::Document.field(rest).map(Target::Field);
    }
    if path.starts_with('@') {
        let in_loop = stack.len() > 1;
        return (in_loop && matches!(path, "@index" | "@first" | "@last")).then_some(Target::Meta);
    }

    let mut depth = stack.len();
    let mut rest = path;
    while let Some(outer) = rest.strip_prefix("../") {
        depth = depth.checked_sub(1)?;
        rest = outer;
    }
    let scope = *stack[..depth].last()?;

    let rest = rest
        .strip_prefix("this.")
        .or_else(|| rest.strip_prefix("./"))
        .unwrap_or(rest);
    if rest == "this" || rest == "." {
        return Some(Target::Item);
    }
    scope.field(rest).map(Target::Field)
}

fn unknown(stack: &[Scope], name: &str, line: usize) -> TemplateError {
    let scope = stack.last().copied().unwrap_or(Scope::Document);
    TemplateError::UnknownPlaceholder {
        name: name.to_string(),
        scope: scope.name().to_string(),
        line,
    }
}

fn path_of(param: &Parameter) -> &str {
    param.as_name().unwrap_or_default()
}

/// Check every path against the scope it is used in
pub(crate) fn check(template: &Template) -> Result<(), TemplateError> {
    check_template(template, &mut vec![Scope::Document])
}

fn check_template(template: &Template, stack: &mut Vec<Scope>) -> Result<(), TemplateError> {
    for (index, element) in template.elements.iter().enumerate() {
        let line = template.mapping.get(index).map_or(0, |mapping| mapping.0);

        match element {
            TemplateElement::RawString(_) | TemplateElement::Comment(_) => {}
            TemplateElement::Expression(helper) | TemplateElement::HtmlExpression(helper) => {
                check_expression(helper, stack, line)?
            }
            TemplateElement::HelperBlock(helper) => check_block(helper, stack, line)?,
            _ => return Err(TemplateError::Unsupported { line }),
        }
    }
    Ok(())
}

fn check_expression(
    helper: &HelperTemplate,
    stack: &[Scope],
    line: usize,
) -> Result<(), TemplateError> {
    let name = path_of(&helper.name);
    if !helper.params.is_empty() || !helper.hash.is_empty() {
        return Err(TemplateError::UnknownHelper {
            name: name.to_string(),
            line,
        });
    }

    match resolve(stack, name) {
        Some(Target::Field(Field::Value) | Target::Meta) => Ok(()),
        Some(Target::Field(Field::List(_)) | Target::Item) => Err(TemplateError::NotAValue {
            name: name.to_string(),
            line,
        }),
        None => Err(unknown(stack, name, line)),
    }
}

fn check_block(
    helper: &HelperTemplate,
    stack: &mut Vec<Scope>,
    line: usize,
) -> Result<(), TemplateError> {
    let name = path_of(&helper.name);
    if !matches!(name, "each" | "if" | "unless") {
        return Err(TemplateError::UnknownHelper {
            name: name.to_string(),
            line,
        });
    }

    let [param] = helper.params.as_slice() else {
        return Err(TemplateError::Syntax(format!(
            "line {line}: '{name}' takes exactly one argument"
        )));
    };
    let path = path_of(param);
    let target = resolve(stack, path).ok_or_else(|| unknown(stack, path, line))?;

    match (name, target) {
        ("each", Target::Field(Field::List(scope))) => {
            stack.push(scope);
            let body = check_branch(helper.template.as_ref(), stack);
            stack.pop();
            body?;
        }
        ("each", _) => {
            return Err(TemplateError::NotAList {
                name: path.to_string(),
                line,
            })
        }
        _ => check_branch(helper.template.as_ref(), stack)?,
    }

    // `{{else}}` renders in the enclosing context
    check_branch(helper.inverse.as_ref(), stack)
}

fn check_branch(branch: Option<&Template>, stack: &mut Vec<Scope>) -> Result<(), TemplateError> {
    match branch {
        Some(template) => check_template(template, stack),
        None => Ok(()),
    }
}
