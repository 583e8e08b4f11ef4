//! Package, import and class declaration rewrites (stages 1 to 5)

use crate::document::RecordingDocument;
use crate::error::{RecordingError, RecordingResult};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static INFERRED_RESOURCES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.inferHtmlResources\(\)|\.resources?\(http").expect("Valid regex pattern")
});

static PACKAGE_DECLARATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*package .*").expect("Valid regex pattern"));

static SIMULATION_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^class (.*) extends Simulation\b").expect("Valid regex pattern")
});

/// Refuse recordings made with HTML resource inference turned on
pub fn reject_inferred_resources(doc: &RecordingDocument) -> RecordingResult<()> {
    if INFERRED_RESOURCES.is_match(doc.as_str()) {
        return Err(RecordingError::InferredResources);
    }
    Ok(())
}

/// Move the simulation into `package`
pub fn rename_package(doc: &mut RecordingDocument, package: &str) {
    let declaration = format!("package {}", package);
    doc.replacen(&PACKAGE_DECLARATION, 1, |_: &Captures| declaration.clone());
}

/// Add `imports` right after the `package` line
pub fn insert_imports(doc: &mut RecordingDocument, package: &str, imports: &[String]) {
    let declaration = format!("package {}", package);
    doc.map_lines(|line| {
        if line.trim_end_matches(['\r', '\n']).ends_with(&declaration) {
            let mut out = line.to_string();
            for import in imports {
                out.push_str(import);
                out.push('\n');
            }
            out
        } else {
            line.to_string()
        }
    });
}

/// Comment out an import the runner does not provide
pub fn comment_out_import(doc: &mut RecordingDocument, import: &str) -> RecordingResult<()> {
    let source = format!(r"(?m)^[ \t]*({})", regex::escape(import));
    let pattern = Regex::new(&source).map_err(|err| RecordingError::InvalidPattern {
        pattern: source.clone(),
        source: err,
    })?;
    doc.replace_all(&pattern, |caps: &Captures| format!("// {}", &caps[1]));
    Ok(())
}

/// Make the simulation extend `base_class` instead of `Simulation`
pub fn replace_base_class(doc: &mut RecordingDocument, base_class: &str) {
    doc.replace_all(&SIMULATION_CLASS, |caps: &Captures| {
        format!("class {} extends {}", &caps[1], base_class)
    });
}
