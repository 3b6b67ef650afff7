//! Text encoder and atomic file writer.

use super::{IndexView, Value};
use crate::error::{Error, Result};
use std::io::Write;
use std::path::Path;

const INDENT: &str = "  ";

/// Encode `value` as JSON text terminated by a single newline.
///
/// Compact mode inserts no whitespace. Pretty mode writes each object member
/// on its own line indented two spaces per nesting level, uses ` : ` between
/// key and value, and renders arrays inline as `[ a, b ]` (or `[ ]`).
pub fn encode(value: &Value, pretty: bool) -> Result<String> {
    let mut encoder = Encoder {
        out: String::new(),
        pretty,
        depth: 0,
    };
    encoder.value(value)?;
    encoder.out.push('\n');
    Ok(encoder.out)
}

/// Encode `value` and write it to `path`.
///
/// The text is encoded completely before anything touches the disk and is
/// then written through a temporary file in the same directory that replaces
/// `path` on success, so a failed write never leaves a truncated file behind.
///
/// The file gets the same default mode as a freshly created file (`0666`
/// less the umask) rather than the owner-only mode of temporary files.
pub fn write_file(path: &Path, value: &Value, pretty: bool) -> Result<()> {
    let text = encode(value, pretty)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = temp_builder()
        .tempfile_in(dir)
        .map_err(|e| Error::io("failed to write", path, e))?;
    tmp.write_all(text.as_bytes())
        .map_err(|e| Error::io("failed to write", path, e))?;
    tmp.persist(path)
        .map_err(|e| Error::io("failed to write", path, e.error))?;
    Ok(())
}

#[cfg(unix)]
fn temp_builder() -> tempfile::Builder<'static, 'static> {
    use std::os::unix::fs::PermissionsExt;
    // The mode is passed to open(2), so the process umask still applies.
    let mut builder = tempfile::Builder::new();
    builder.permissions(std::fs::Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn temp_builder() -> tempfile::Builder<'static, 'static> {
    tempfile::Builder::new()
}

struct Encoder {
    out: String,
    pretty: bool,
    depth: usize,
}

impl Encoder {
    fn value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Text(s) => self.string(s),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Int(n) => self.out.push_str(&n.to_string()),
            Value::Float(f) => {
                if !f.is_finite() {
                    return Err(Error::Encode(format!("non-finite number {f}")));
                }
                self.out.push_str(&format!("{f:?}"));
            }
            Value::Symbol(tag) => self.string(tag),
            Value::Sequence(items) => self.array(items)?,
            Value::Mapping(entries) => {
                self.object(entries.iter().map(|(k, v)| (k.as_str(), v)))?
            }
            Value::Record(fields) => self.object(fields.iter().map(|(k, v)| (*k, v)))?,
            Value::Index(view) => self.index(view)?,
        }
        Ok(())
    }

    fn object<'a>(&mut self, members: impl Iterator<Item = (&'a str, &'a Value)>) -> Result<()> {
        self.out.push('{');
        self.depth += 1;
        let mut first = true;
        for (key, value) in members {
            if !first {
                self.out.push(',');
            }
            self.newline_indent();
            self.string(key);
            self.out.push_str(if self.pretty { " : " } else { ":" });
            self.value(value)?;
            first = false;
        }
        self.depth -= 1;
        if !first {
            self.newline_indent();
        }
        self.out.push('}');
        Ok(())
    }

    fn array(&mut self, items: &[Value]) -> Result<()> {
        self.out.push('[');
        if self.pretty {
            self.out.push(' ');
        }
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(if self.pretty { ", " } else { "," });
            }
            self.value(item)?;
        }
        if self.pretty && !items.is_empty() {
            self.out.push(' ');
        }
        self.out.push(']');
        Ok(())
    }

    fn index(&mut self, view: &IndexView) -> Result<()> {
        let files = Value::Sequence(view.files.clone());
        let subdirectories = Value::Sequence(view.subdirectories.clone());
        let mut members: Vec<(&str, &Value)> = Vec::with_capacity(3);
        if let Some(package) = &view.package {
            members.push(("package", package.as_ref()));
        }
        members.push(("files", &files));
        members.push(("subdirectories", &subdirectories));
        self.object(members.into_iter())
    }

    fn newline_indent(&mut self) {
        if self.pretty {
            self.out.push('\n');
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
        }
    }

    fn string(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            match c {
                '\\' => self.out.push_str("\\\\"),
                '"' => self.out.push_str("\\\""),
                '\u{08}' => self.out.push_str("\\b"),
                '\u{0C}' => self.out.push_str("\\f"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                c if (c as u32) < 0x20 => self.out.push_str(&format!("\\u{:04X}", c as u32)),
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn sample() -> Value {
        Value::Record(vec![
            ("name", text("a")),
            ("list", Value::Sequence(vec![Value::Int(1), Value::Int(2)])),
            ("empty", Value::Sequence(vec![])),
            ("obj", Value::Mapping(vec![])),
            ("flag", Value::Bool(false)),
            ("none", Value::Null),
        ])
    }

    #[test]
    fn compact_has_no_whitespace() {
        assert_eq!(
            encode(&sample(), false).unwrap(),
            "{\"name\":\"a\",\"list\":[1,2],\"empty\":[],\"obj\":{},\"flag\":false,\"none\":null}\n"
        );
    }

    #[test]
    fn pretty_objects_multiline_arrays_inline() {
        let expected = "{\n  \"name\" : \"a\",\n  \"list\" : [ 1, 2 ],\n  \"empty\" : [ ],\n  \"obj\" : {},\n  \"flag\" : false,\n  \"none\" : null\n}\n";
        assert_eq!(encode(&sample(), true).unwrap(), expected);
    }

    #[test]
    fn pretty_records_inside_arrays_indent_by_object_depth() {
        let value = Value::Record(vec![(
            "items",
            Value::Sequence(vec![
                Value::Record(vec![("x", Value::Int(1))]),
                Value::Record(vec![("x", Value::Int(2))]),
            ]),
        )]);
        let expected =
            "{\n  \"items\" : [ {\n    \"x\" : 1\n  }, {\n    \"x\" : 2\n  } ]\n}\n";
        assert_eq!(encode(&value, true).unwrap(), expected);
    }

    #[test]
    fn escapes_control_characters() {
        let out = encode(&text("a\"b\\c\nd\te\u{7}f\u{8}\u{c}\r"), false).unwrap();
        assert_eq!(out, "\"a\\\"b\\\\c\\nd\\te\\u0007f\\b\\f\\r\"\n");
    }

    #[test]
    fn control_escape_uses_uppercase_hex() {
        assert_eq!(encode(&text("\u{1b}"), false).unwrap(), "\"\\u001B\"\n");
    }

    #[test]
    fn non_ascii_passes_through() {
        assert_eq!(encode(&text("héllo ☃"), false).unwrap(), "\"héllo ☃\"\n");
    }

    #[test]
    fn symbols_and_numbers() {
        let value = Value::Sequence(vec![
            Value::Symbol("class"),
            Value::Int(-3),
            Value::Float(1.0),
            Value::Float(0.25),
            Value::Bool(true),
        ]);
        assert_eq!(
            encode(&value, false).unwrap(),
            "[\"class\",-3,1.0,0.25,true]\n"
        );
    }

    #[test]
    fn non_finite_float_is_an_encoding_error() {
        let err = encode(&Value::Float(f64::NAN), false).unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
    }

    #[test]
    fn index_view_omits_missing_package() {
        let view = Value::Index(IndexView {
            package: None,
            files: vec![],
            subdirectories: vec![Value::Record(vec![
                ("name", text("com")),
                ("path", text("com")),
            ])],
        });
        assert_eq!(
            encode(&view, false).unwrap(),
            "{\"files\":[],\"subdirectories\":[{\"name\":\"com\",\"path\":\"com\"}]}\n"
        );
    }

    #[test]
    fn index_view_puts_package_first() {
        let view = Value::Index(IndexView {
            package: Some(Box::new(Value::Record(vec![("name", text("p"))]))),
            files: vec![],
            subdirectories: vec![],
        });
        assert_eq!(
            encode(&view, true).unwrap(),
            "{\n  \"package\" : {\n    \"name\" : \"p\"\n  },\n  \"files\" : [ ],\n  \"subdirectories\" : [ ]\n}\n"
        );
    }

    #[test]
    fn write_file_replaces_existing_content() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "stale").unwrap();
        write_file(&path, &text("fresh"), false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\"fresh\"\n");
    }

    #[cfg(unix)]
    #[test]
    fn write_file_uses_default_file_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::TempDir::new().unwrap();
        let plain = dir.path().join("plain.txt");
        std::fs::write(&plain, "").unwrap();
        let path = dir.path().join("out.json");
        write_file(&path, &text("x"), false).unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&path), mode(&plain));
    }

    #[test]
    fn write_file_leaves_nothing_on_encode_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        assert!(write_file(&path, &Value::Float(f64::INFINITY), false).is_err());
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
