//! Built-in document packages with fixed template-file lists.
//!
//! Selecting one of these packages fills the template selector locally and
//! skips the listing request; any other folder name is resolved through the
//! backend's list-templates endpoint.

/// Package identifier for the GSOP 2028 document set.
pub const GSOP_2028: &str = "GSOP_2028";
/// Package identifier for the GSOP 2003 document set.
pub const GSOP_2003: &str = "GSOP_2003";

const GSOP_2028_FILES: [&str; 5] = [
    "Best Practice 2032 \u{201c}Template for IT Infrastructure Service Specification\u{201d}.docx",
    "Best Practice 2062 \u{201c}Template for IT Infrastructure Service Qualification Report\u{201d}.docx",
    "Template 3 - Additional Service Document.docx",
    "Template 4 - Process Flow Template.docx",
    "Template 5 - Quality Assurance Document.docx",
];

const GSOP_2003_FILES: [&str; 4] = [
    "GSOP 2003 Template 1.docx",
    "GSOP 2003 Template 2.docx",
    "GSOP 2003 Template 3.docx",
    "GSOP 2003 Template 4.docx",
];

/// Returns the fixed, ordered template-file list for a built-in package.
pub fn builtin_template_files(package: &str) -> Option<&'static [&'static str]> {
    match package {
        GSOP_2028 => Some(&GSOP_2028_FILES),
        GSOP_2003 => Some(&GSOP_2003_FILES),
        _ => None,
    }
}

/// True when the package has a built-in template-file list.
pub fn is_builtin_package(package: &str) -> bool {
    builtin_template_files(package).is_some()
}
