//! Snippet generators for each export target.

use serde_json::Value;
use snapdeck_domain::codegen::{CodeSnippet, SnippetTarget};
use snapdeck_domain::request::{ComposedRequest, HttpMethod};

const INDENT: &str = "    ";

/// Generate a snippet for the given request parts.
///
/// Never fails: a body that is not JSON is embedded verbatim.
#[must_use]
pub fn generate_snippet(
    target: SnippetTarget,
    method: HttpMethod,
    url: &str,
    body_text: &str,
) -> CodeSnippet {
    CodeGenerator::new(target).generate(method, url, body_text)
}

/// Body as it appears in a snippet.
enum SnippetBody {
    /// Parsed JSON, re-serialized by each target.
    Json(Value),
    /// Unparseable draft text, kept as typed.
    Raw(String),
}

impl SnippetBody {
    fn from_draft(method: HttpMethod, body_text: &str) -> Option<Self> {
        if !method.carries_body() || body_text.trim().is_empty() {
            return None;
        }
        Some(
            serde_json::from_str(body_text)
                .map_or_else(|_| Self::Raw(body_text.to_string()), Self::Json),
        )
    }

    fn pretty_json(&self) -> String {
        match self {
            Self::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Self::Raw(text) => text.clone(),
        }
    }
}

/// Code generator that produces snippets for one target.
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    target: SnippetTarget,
}

impl CodeGenerator {
    /// Create a generator for `target`.
    #[must_use]
    pub const fn new(target: SnippetTarget) -> Self {
        Self { target }
    }

    /// Generate a snippet for a composed request.
    #[must_use]
    pub fn generate_for(&self, request: &ComposedRequest) -> CodeSnippet {
        self.generate(
            request.method,
            &request.url,
            request.body.as_deref().unwrap_or_default(),
        )
    }

    /// Generate a snippet from method, URL and draft text.
    #[must_use]
    pub fn generate(&self, method: HttpMethod, url: &str, body_text: &str) -> CodeSnippet {
        let body = SnippetBody::from_draft(method, body_text);
        match self.target {
            SnippetTarget::ShellCurl => Self::generate_curl(method, url, body.as_ref()),
            SnippetTarget::ScriptHttpClient => Self::generate_python(method, url, body.as_ref()),
            SnippetTarget::BrowserFetch => Self::generate_fetch(method, url, body.as_ref()),
        }
    }

    fn generate_curl(method: HttpMethod, url: &str, body: Option<&SnippetBody>) -> CodeSnippet {
        let mut parts = vec![format!("curl -X {method} {}", shell_quote(url))];

        if let Some(body) = body {
            parts.push("-H 'Content-Type: application/json'".to_string());
            parts.push(format!("-d {}", shell_quote(&body.pretty_json())));
        }

        CodeSnippet::new(parts.join(" \\\n  "), SnippetTarget::ShellCurl)
    }

    fn generate_python(method: HttpMethod, url: &str, body: Option<&SnippetBody>) -> CodeSnippet {
        let mut code = String::new();
        let method_name = method.as_str().to_lowercase();

        match body {
            Some(SnippetBody::Json(value)) => {
                code.push_str(&format!("payload = {}\n\n", python_literal(value, 0)));
            }
            Some(SnippetBody::Raw(text)) => {
                code.push_str(&format!("data = {}\n\n", quote_string(text)));
            }
            None => {}
        }

        code.push_str(&format!("response = requests.{method_name}(\n"));
        code.push_str(&format!("{INDENT}{},\n", quote_string(url)));
        match body {
            Some(SnippetBody::Json(_)) => code.push_str(&format!("{INDENT}json=payload,\n")),
            Some(SnippetBody::Raw(_)) => {
                code.push_str(&format!(
                    "{INDENT}headers={{\"Content-Type\": \"application/json\"}},\n"
                ));
                code.push_str(&format!("{INDENT}data=data,\n"));
            }
            None => {}
        }
        code.push_str(")\n\n");
        code.push_str("print(response.status_code)\nprint(response.text)");

        CodeSnippet::new(code, SnippetTarget::ScriptHttpClient).with_import("import requests")
    }

    fn generate_fetch(method: HttpMethod, url: &str, body: Option<&SnippetBody>) -> CodeSnippet {
        let mut code = String::new();

        code.push_str(&format!("const response = await fetch({}, {{\n", quote_string(url)));
        code.push_str(&format!("  method: '{method}',\n"));

        if let Some(body) = body {
            code.push_str("  headers: {\n    'Content-Type': 'application/json',\n  },\n");
            match body {
                SnippetBody::Json(_) => {
                    let json = indent_continuation(&body.pretty_json(), "  ");
                    code.push_str(&format!("  body: JSON.stringify({json}),\n"));
                }
                SnippetBody::Raw(text) => {
                    code.push_str(&format!("  body: {},\n", quote_string(text)));
                }
            }
        }

        code.push_str("});\n\n");
        code.push_str("const data = await response.json();\nconsole.log(data);");

        CodeSnippet::new(code, SnippetTarget::BrowserFetch)
    }
}

/// Wraps `text` in single quotes, escaping embedded quotes as `'\''`.
fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "'\\''"))
}

/// Double-quoted string literal valid in both Python and JavaScript.
fn quote_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{text}\""))
}

/// Indents every line after the first.
fn indent_continuation(text: &str, indent: &str) -> String {
    text.replace('\n', &format!("\n{indent}"))
}

/// Renders JSON as a Python literal, using `True`, `False` and `None`.
#[must_use]
pub fn python_literal(value: &Value, depth: usize) -> String {
    let pad = INDENT.repeat(depth + 1);
    let close = INDENT.repeat(depth);
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote_string(s),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Array(items) => {
            let inner: Vec<_> = items
                .iter()
                .map(|item| format!("{pad}{}", python_literal(item, depth + 1)))
                .collect();
            format!("[\n{},\n{close}]", inner.join(",\n"))
        }
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Object(map) => {
            let inner: Vec<_> = map
                .iter()
                .map(|(key, item)| {
                    format!("{pad}{}: {}", quote_string(key), python_literal(item, depth + 1))
                })
                .collect();
            format!("{{\n{},\n{close}}}", inner.join(",\n"))
        }
    }
}
