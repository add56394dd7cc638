//! The bundled SourceModel Provider: a lightweight annotation-aware
//! scanner for Java source trees.
//!
//! The scanner is deliberately shallow. It does not build a syntax tree;
//! it strips comments and walks declarations line by line, which is
//! enough to recover the class-level facts the mapper needs: type
//! declarations with their annotations, `extends`/`implements` clauses,
//! and annotated fields. One declaration per line is assumed, which
//! holds for the formatting conventions of the code this tool targets.
//!
//! Simple type names are qualified through the file's import table and
//! fall back to the current package, so interface names and field types
//! land in the same namespace and can be matched by exact string
//! comparison during resolution.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use cdvue_schemas::{AnnotationUse, ClassDescriptor, FieldDescriptor};
use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::ExtractError;
use crate::SourceModel;

/// Matches a type declaration: modifiers, keyword, name, optional
/// `extends` and `implements` clauses, optional trailing brace.
static TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^((?:(?:public|protected|private|abstract|final|static|strictfp)\s+)*)
        (class|interface|enum)\s+([A-Za-z_]\w*)
        (?:\s+extends\s+([\w.]+))?
        (?:\s+implements\s+([\w.\s,]+?))?
        \s*\{?\s*$",
    )
    .expect("type declaration regex")
});

/// Matches a field declaration: modifiers, type (possibly generic or
/// array), name, optional initializer, terminating semicolon.
static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^((?:(?:public|protected|private|static|final|transient|volatile)\s+)*)
        ([A-Za-z_][\w.]*(?:<[^;=]*>)?(?:\s*\[\s*\])*)
        \s+(\w+)\s*(?:=[^;]*)?;$",
    )
    .expect("field declaration regex")
});

/// Matches one annotation use at the start of a line fragment.
static ANNOTATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@([A-Za-z_][\w.]*)\s*(?:\(([^)]*)\))?").expect("annotation regex")
});

/// A directory tree of `.java` files acting as the SourceModel
/// Provider.
#[derive(Debug)]
pub struct JavaSourceTree {
    root: PathBuf,
}

impl JavaSourceTree {
    /// Creates a provider rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root of the scanned tree.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceModel for JavaSourceTree {
    /// Yields every class descriptor reachable under the root.
    ///
    /// An untraversable root aborts with a scan error. Individual files
    /// that cannot be read or parsed are logged and skipped so one bad
    /// file does not lose the rest of the tree.
    fn classes(&self) -> Result<Vec<ClassDescriptor>, ExtractError> {
        // Surface missing/unreadable roots as a scan failure up front;
        // WalkDir would otherwise report it as a skippable entry.
        fs::metadata(&self.root).map_err(|e| ExtractError::scan(&self.root, e))?;

        let mut classes = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file()
                || entry.path().extension().map_or(true, |ext| ext != "java")
            {
                continue;
            }
            let text = match fs::read_to_string(entry.path()) {
                Ok(text) => text,
                Err(e) => {
                    warn!(
                        file = %entry.path().display(),
                        error = %e,
                        "skipping unreadable file"
                    );
                    continue;
                }
            };
            let parsed = parse_source(&text);
            if parsed.is_empty() {
                debug!(file = %entry.path().display(), "no type declarations");
            }
            classes.extend(parsed);
        }
        Ok(classes)
    }
}

/// Parses all top-level type declarations in one source file.
pub(crate) fn parse_source(text: &str) -> Vec<ClassDescriptor> {
    let text = strip_comments(text);
    let mut package = String::new();
    let mut imports: HashMap<String, String> = HashMap::new();
    let mut pending: Vec<AnnotationUse> = Vec::new();
    let mut classes: Vec<ClassDescriptor> = Vec::new();
    let mut current: Option<ClassDescriptor> = None;
    let mut depth: usize = 0;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if depth == 0 {
            if let Some(rest) = line.strip_prefix("package ") {
                package = rest.trim_end_matches(';').trim().to_string();
                continue;
            }
            if let Some(rest) = line.strip_prefix("import ") {
                record_import(rest, &mut imports);
                continue;
            }
        }

        let rest = collect_annotations(line, &mut pending);
        if !rest.is_empty() {
            if depth == 0 {
                if let Some(decl) =
                    parse_type_decl(rest, &package, &imports, &pending)
                {
                    current = Some(decl);
                }
                pending.clear();
            } else if depth == 1 {
                // Directly inside the type body: field declarations.
                // Deeper levels are method bodies and inner types.
                if let Some(class) = current.as_mut() {
                    if let Some(field) =
                        parse_field_decl(rest, &package, &imports, &pending)
                    {
                        class.fields.push(field);
                    }
                }
                pending.clear();
            } else {
                pending.clear();
            }
        }

        depth = depth
            .saturating_add(line.matches('{').count())
            .saturating_sub(line.matches('}').count());
        if depth == 0 {
            if let Some(class) = current.take() {
                classes.push(class);
            }
        }
    }
    // Flush a type left open by an unbalanced file.
    if let Some(class) = current.take() {
        classes.push(class);
    }
    classes
}

/// Consumes leading annotation uses from a line, returning the rest.
fn collect_annotations<'a>(
    mut line: &'a str,
    pending: &mut Vec<AnnotationUse>,
) -> &'a str {
    while let Some(caps) = ANNOTATION_RE.captures(line) {
        let name = caps[1].to_string();
        let properties = caps
            .get(2)
            .map(|args| parse_annotation_props(args.as_str()))
            .unwrap_or_default();
        pending.push(AnnotationUse { name, properties });
        line = line[caps[0].len()..].trim_start();
    }
    line
}

/// Parses `k = v, ...` annotation arguments. A bare argument is the
/// implicit `value` property.
fn parse_annotation_props(args: &str) -> Vec<(String, String)> {
    args.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((key, value)) => {
                (key.trim().to_string(), value.trim().to_string())
            }
            None => ("value".to_string(), part.to_string()),
        })
        .collect()
}

/// Records a single-type import in the short-name table. Wildcard and
/// static imports cannot be resolved to one name and are ignored.
fn record_import(rest: &str, imports: &mut HashMap<String, String>) {
    let qualified = rest.trim_end_matches(';').trim();
    if qualified.starts_with("static ") || qualified.ends_with(".*") {
        return;
    }
    if let Some((_, short)) = qualified.rsplit_once('.') {
        imports.insert(short.to_string(), qualified.to_string());
    }
}

/// Qualifies a simple type name through the import table, falling back
/// to the current package. Already-qualified names pass through.
fn qualify(name: &str, package: &str, imports: &HashMap<String, String>) -> String {
    const PRIMITIVES: &[&str] = &[
        "boolean", "byte", "char", "double", "float", "int", "long", "short",
        "void",
    ];
    if name.contains('.') || PRIMITIVES.contains(&name) {
        return name.to_string();
    }
    if let Some(qualified) = imports.get(name) {
        return qualified.clone();
    }
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

fn parse_type_decl(
    line: &str,
    package: &str,
    imports: &HashMap<String, String>,
    pending: &[AnnotationUse],
) -> Option<ClassDescriptor> {
    let caps = TYPE_RE.captures(line)?;
    let short_name = caps[3].to_string();
    let qualified_name = if package.is_empty() {
        short_name.clone()
    } else {
        format!("{package}.{short_name}")
    };
    let interfaces = caps
        .get(5)
        .map(|list| {
            list.as_str()
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(|name| qualify(name, package, imports))
                .collect()
        })
        .unwrap_or_default();
    Some(ClassDescriptor {
        qualified_name,
        short_name,
        is_interface: &caps[2] == "interface",
        is_abstract: caps[1].contains("abstract"),
        annotations: pending.to_vec(),
        fields: Vec::new(),
        interfaces,
        superclass: caps.get(4).map(|s| qualify(s.as_str(), package, imports)),
    })
}

fn parse_field_decl(
    line: &str,
    package: &str,
    imports: &HashMap<String, String>,
    pending: &[AnnotationUse],
) -> Option<FieldDescriptor> {
    let caps = FIELD_RE.captures(line)?;
    // The declared type with generics and array brackets removed; the
    // base type is what resolution matches against.
    let declared = &caps[2];
    let base = declared
        .split('<')
        .next()
        .unwrap_or(declared)
        .replace(['[', ']'], " ");
    let base = base.trim();
    Some(FieldDescriptor {
        type_name: qualify(base, package, imports),
        annotations: pending.to_vec(),
    })
}

/// Removes `//` and `/* */` comments while preserving line structure
/// and leaving string and char literals intact.
fn strip_comments(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                let quote = c;
                out.push(c);
                while let Some(n) = chars.next() {
                    out.push(n);
                    if n == '\\' {
                        if let Some(escaped) = chars.next() {
                            out.push(escaped);
                        }
                    } else if n == quote {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                for n in chars.by_ref() {
                    if n == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for n in chars.by_ref() {
                    if n == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn single(text: &str) -> ClassDescriptor {
        let mut classes = parse_source(text);
        assert_eq!(classes.len(), 1, "expected one class in: {text}");
        classes.remove(0)
    }

    #[test]
    fn parses_plain_class() {
        let class = single(
            "package org.onlab.demo;\n\
             public class Foo {\n\
             }\n",
        );
        assert_eq!(class.qualified_name, "org.onlab.demo.Foo");
        assert_eq!(class.short_name, "Foo");
        assert!(!class.is_interface);
        assert!(!class.is_abstract);
        assert!(class.annotations.is_empty());
        assert_eq!(class.superclass, None);
    }

    #[test]
    fn parses_interface_and_abstract_flags() {
        let iface = single("package p;\npublic interface Svc {\n}\n");
        assert!(iface.is_interface);

        let abs = single("package p;\npublic abstract class Base {\n}\n");
        assert!(abs.is_abstract);
    }

    #[test]
    fn parses_extends_and_implements() {
        let class = single(
            "package p;\n\
             import q.Other;\n\
             public class Foo extends Base implements Svc, Other {\n\
             }\n",
        );
        assert_eq!(class.superclass.as_deref(), Some("p.Base"));
        assert_eq!(class.interfaces, vec!["p.Svc", "q.Other"]);
    }

    #[test]
    fn parses_class_annotations_with_properties() {
        let class = single(
            "package p;\n\
             @Component(immediate = true)\n\
             @Service(value = Svc.class)\n\
             public class Foo implements Svc {\n\
             }\n",
        );
        assert_eq!(class.annotations.len(), 2);
        assert_eq!(class.annotations[0].name, "Component");
        assert_eq!(
            class.annotations[0].properties,
            vec![("immediate".to_string(), "true".to_string())]
        );
        assert_eq!(class.annotations[1].value(), Some("Svc.class"));
    }

    #[test]
    fn bare_annotation_argument_is_implicit_value() {
        let class = single(
            "package p;\n\
             @Service(Svc.class)\n\
             public class Foo {\n\
             }\n",
        );
        assert_eq!(class.annotations[0].value(), Some("Svc.class"));
    }

    #[test]
    fn parses_annotated_fields() {
        let class = single(
            "package p;\n\
             import q.RemoteSvc;\n\
             @Component\n\
             public class Foo {\n\
             \x20   @Reference\n\
             \x20   protected RemoteSvc remote;\n\
             \x20   private int counter = 0;\n\
             }\n",
        );
        assert_eq!(class.fields.len(), 2);
        assert_eq!(class.fields[0].type_name, "q.RemoteSvc");
        assert!(class.fields[0].has_marker("Reference"));
        assert_eq!(class.fields[1].type_name, "int");
        assert!(class.fields[1].annotations.is_empty());
    }

    #[test]
    fn annotation_on_same_line_as_field() {
        let class = single(
            "package p;\n\
             public class Foo {\n\
             \x20   @Reference protected Svc svc;\n\
             }\n",
        );
        assert_eq!(class.fields.len(), 1);
        assert!(class.fields[0].has_marker("Reference"));
    }

    #[test]
    fn method_bodies_do_not_produce_fields() {
        let class = single(
            "package p;\n\
             public class Foo {\n\
             \x20   private Svc svc;\n\
             \x20   public void run() {\n\
             \x20       int local = 1;\n\
             \x20       Svc other = lookup();\n\
             \x20   }\n\
             \x20   public abstract Svc find();\n\
             }\n",
        );
        assert_eq!(class.fields.len(), 1);
        assert_eq!(class.fields[0].type_name, "p.Svc");
    }

    #[test]
    fn generic_and_array_field_types_use_base_type() {
        let class = single(
            "package p;\n\
             public class Foo {\n\
             \x20   private Map<String, Svc> cache;\n\
             \x20   private Svc[] pool;\n\
             }\n",
        );
        assert_eq!(class.fields[0].type_name, "p.Map");
        assert_eq!(class.fields[1].type_name, "p.Svc");
    }

    #[test]
    fn comments_and_literals_are_ignored() {
        let class = single(
            "package p;\n\
             // @Component in a line comment\n\
             /* @Service(value = X.class) in a block\n\
                spanning lines */\n\
             public class Foo {\n\
             \x20   private String note = \"@Reference not real\"; // trailing\n\
             }\n",
        );
        assert!(class.annotations.is_empty());
        assert!(class.fields[0].annotations.is_empty());
    }

    #[test]
    fn wildcard_and_static_imports_are_ignored() {
        let class = single(
            "package p;\n\
             import java.util.*;\n\
             import static java.util.Objects.equals;\n\
             public class Foo implements List {\n\
             }\n",
        );
        // Unresolvable imports fall back to package qualification.
        assert_eq!(class.interfaces, vec!["p.List"]);
    }

    #[test]
    fn multiple_top_level_types_in_one_file() {
        let classes = parse_source(
            "package p;\n\
             public class Foo {\n\
             }\n\
             class Helper {\n\
             }\n",
        );
        let names: Vec<_> =
            classes.iter().map(|c| c.short_name.as_str()).collect();
        assert_eq!(names, vec!["Foo", "Helper"]);
    }

    #[test]
    fn default_package_uses_bare_names() {
        let class = single("public class Foo extends Base {\n}\n");
        assert_eq!(class.qualified_name, "Foo");
        assert_eq!(class.superclass.as_deref(), Some("Base"));
    }
}
