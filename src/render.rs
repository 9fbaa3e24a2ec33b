//! Template rendering for the template policy.
//!
//! Templates are Jinja-compatible and rendered with `minijinja`: `{{ name }}`
//! substitutions, attribute and index access, filters, `{% if %}` and
//! `{% for %}` blocks.
//!
//! # Rendering Rules
//!
//! - Undefined is strict: printing, iterating or testing an unbound value is
//!   an error, never an empty string
//! - `null` renders as nothing
//! - A trailing newline in the template is kept
//!
//! # Example
//!
//! ```
//! use tsync::render::{Renderer, TemplateRenderer};
//! use tsync::manifest::VarMap;
//!
//! let mut vars = VarMap::new();
//! vars.insert("name".into(), serde_json::json!("World"));
//!
//! let out = Renderer::new().render("Hello, {{ name }}!", &vars).unwrap();
//! assert_eq!(out, "Hello, World!");
//! ```

use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use serde_json::Value;

use crate::error::{Result, TsyncError};
use crate::manifest::VarMap;

/// Renders template text with bound variables.
pub trait TemplateRenderer {
    /// Render `template`, failing on the first reference `vars` doesn't bind.
    fn render(&self, template: &str, vars: &VarMap) -> Result<String>;
}

/// Look up a dotted path in `vars`.
///
/// Path segments index into maps by key and into sequences by position.
pub fn lookup<'a>(vars: &'a VarMap, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = vars.get(parts.next()?)?;

    for part in parts {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env.set_formatter(|out, state, value| {
        if value.is_none() {
            return Ok(());
        }
        minijinja::escape_formatter(out, state, value)
    });
    env
}

/// Default Jinja renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for Renderer {
    fn render(&self, template: &str, vars: &VarMap) -> Result<String> {
        let env = environment();
        let tmpl = env.template_from_str(template).map_err(render_error)?;

        tmpl.render(vars).map_err(|err| {
            if err.kind() != ErrorKind::UndefinedError {
                return render_error(err);
            }
            let unbound: Vec<String> = tmpl
                .undeclared_variables(true)
                .into_iter()
                .filter(|name| lookup(vars, name).is_none())
                .collect();
            let name = first_reference(template, &unbound, err.range())
                .or_else(|| err.detail().map(str::to_string))
                .unwrap_or_else(|| "undefined value".to_string());
            TsyncError::UndefinedVariable { name }
        })
    }
}

fn render_error(err: minijinja::Error) -> TsyncError {
    TsyncError::Render {
        message: err.to_string(),
    }
}

/// The unbound name minijinja tripped over.
///
/// Prefers names inside the failing span, then the earliest in the source.
fn first_reference(
    template: &str,
    unbound: &[String],
    span: Option<std::ops::Range<usize>>,
) -> Option<String> {
    let earliest = |text: &str| {
        unbound
            .iter()
            .filter_map(|name| text.find(name.as_str()).map(|pos| (pos, name.len(), name)))
            .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
            .map(|(_, _, name)| name.clone())
    };

    span.and_then(|range| template.get(range))
        .and_then(earliest)
        .or_else(|| earliest(template))
}
