//! Turns [`BuildProperties`] into the source of the generated module.
//!
//! The template uses `{{ name }}` placeholders. Each value is inserted as an
//! escaped Rust string literal, then the whole file goes through `syn` and
//! `prettyplease` so the output is canonically formatted.

use crate::properties::BuildProperties;

pub const TEMPLATE: &str = r#"
//! Build identity metadata. THIS FILE IS AUTO GENERATED by `buildstamp`.
//!
//! It injects build information at compile time, either from a developer's
//! desk or from a CI pipeline. DO NOT HAND EDIT THIS FILE!

/// Build id from the build pipeline (`DEV` if this is a local build).
pub const ID: &str = {{ id }};

/// Build description: nearest tag, commit distance, hash and dirty marker.
pub const DESCRIPTION: &str = {{ description }};

/// Hostname of the machine that ran `buildstamp`.
pub const HOSTNAME: &str = {{ hostname }};

/// Rust toolchain used by `buildstamp`.
pub const RUNTIME: &str = {{ runtime }};

/// Returns all version information, one field per line.
pub fn summary() -> String {
    format!("ID:          {ID}\nDescription: {DESCRIPTION}\nHostname:    {HOSTNAME}\nRuntime:     {RUNTIME}\n")
}
"#;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unknown template field '{0}'")]
    UnknownField(String),
    #[error("unterminated template placeholder at byte {0}")]
    Unterminated(usize),
    #[error("failed to format generated source: {source}")]
    Format {
        #[source]
        source: syn::Error,
        unformatted: String,
    },
}

impl RenderError {
    /// The substituted but unformatted text, when formatting was what failed.
    pub fn unformatted(&self) -> Option<&str> {
        match self {
            RenderError::Format { unformatted, .. } => Some(unformatted.as_str()),
            _ => None,
        }
    }
}

pub fn render(props: &BuildProperties) -> Result<String, RenderError> {
    render_template(TEMPLATE, props)
}

pub fn render_template(template: &str, props: &BuildProperties) -> Result<String, RenderError> {
    let unformatted = substitute(template, |field| {
        let value = match field {
            "id" => &props.id,
            "description" => &props.description,
            "hostname" => &props.hostname,
            "runtime" => &props.runtime,
            _ => return None,
        };
        Some(string_literal(value))
    })?;
    format_source(unformatted)
}

/// Parses and pretty prints `source`, handing the input back on failure.
pub fn format_source(source: String) -> Result<String, RenderError> {
    match syn::parse_file(&source) {
        Ok(file) => Ok(prettyplease::unparse(&file)),
        Err(err) => Err(RenderError::Format {
            source: err,
            unformatted: source,
        }),
    }
}

fn string_literal(value: &str) -> String {
    // Debug output for str is a valid Rust string literal.
    format!("{value:?}")
}

fn substitute<F>(template: &str, lookup: F) -> Result<String, RenderError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let offset = template.len() - rest.len() + start;
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or(RenderError::Unterminated(offset))?;
        let field = after[..end].trim();
        let value = lookup(field).ok_or_else(|| RenderError::UnknownField(field.to_string()))?;
        out.push_str(&value);
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props() -> BuildProperties {
        BuildProperties::new(
            "DEV",
            "v1.2.0-3-gabc1234567\n",
            "buildhost",
            "rustc 1.85.0 (4d91de4e4 2025-02-17)",
        )
    }

    #[test]
    fn renders_constants_for_each_field() {
        let out = render(&props()).unwrap();

        assert!(out.contains(r#"pub const ID: &str = "DEV";"#), "{out}");
        assert!(
            out.contains(r#"pub const DESCRIPTION: &str = "v1.2.0-3-gabc1234567";"#),
            "{out}"
        );
        assert!(out.contains(r#"pub const HOSTNAME: &str = "buildhost";"#), "{out}");
        assert!(
            out.contains(r#"pub const RUNTIME: &str = "rustc 1.85.0 (4d91de4e4 2025-02-17)";"#),
            "{out}"
        );
        assert!(out.contains("pub fn summary() -> String"), "{out}");
        assert!(out.contains("DO NOT HAND EDIT"), "{out}");
    }

    #[test]
    fn rendered_output_is_already_formatted() {
        let out = render(&props()).unwrap();

        let again = format_source(out.clone()).unwrap();

        assert_eq!(out, again);
    }

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(render(&props()).unwrap(), render(&props()).unwrap());
    }

    #[test]
    fn values_are_escaped_as_string_literals() {
        let mut props = props();
        props.description = "v1 \"quoted\" {{ id }}\\path".to_string();

        let out = render(&props).unwrap();
        let file = syn::parse_file(&out).unwrap();

        let description = file
            .items
            .iter()
            .find_map(|item| match item {
                syn::Item::Const(c) if c.ident == "DESCRIPTION" => Some(c.expr.clone()),
                _ => None,
            })
            .unwrap();
        let syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Str(lit),
            ..
        }) = *description
        else {
            panic!("DESCRIPTION is not a string literal");
        };
        assert_eq!(lit.value(), props.description);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = render_template("pub const X: &str = {{ branch }};", &props()).unwrap_err();

        assert!(matches!(err, RenderError::UnknownField(ref f) if f == "branch"));
        assert!(err.unformatted().is_none());
    }

    #[test]
    fn unterminated_placeholder_is_rejected() {
        let err = render_template("pub const X: &str = \"\";\n{{ id", &props()).unwrap_err();

        assert!(matches!(err, RenderError::Unterminated(24)));
    }

    #[test]
    fn format_failure_keeps_unformatted_text() {
        let err = render_template("pub const ID: &str = {{ id }}", &props()).unwrap_err();

        assert!(matches!(err, RenderError::Format { .. }));
        assert_eq!(err.unformatted(), Some(r#"pub const ID: &str = "DEV""#));
    }
}
