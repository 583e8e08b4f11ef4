//! Node identity parameterization (stage 15)

use crate::document::RecordingDocument;

/// Replace every literal `certname` with the feeder placeholder
pub fn parameterize_node(
    doc: &mut RecordingDocument,
    report_body: &mut String,
    certname: &str,
    placeholder: &str,
) {
    if certname.is_empty() {
        return;
    }
    let text = doc.as_str().replace(certname, placeholder);
    doc.set_text(text);
    *report_body = report_body.replace(certname, placeholder);
}
