//! Facts derived from the current document path.

/// The print view inlines every chapter into one page, so per-section
/// tracking and a page-scoped discussion make no sense there.
pub fn is_print_view(path: &str) -> bool {
    path.ends_with("/print.html")
}

/// Normalize a document path into the term that names its discussion.
///
/// A trailing `index.md` or `.md` is dropped, then a trailing slash; the
/// empty remainder (the book root) maps to `index`.
pub fn discussion_term(path: &str) -> String {
    let term = path
        .strip_suffix("index.md")
        .or_else(|| path.strip_suffix(".md"))
        .unwrap_or(path);
    let term = term.strip_suffix('/').unwrap_or(term);
    if term.is_empty() {
        "index".to_string()
    } else {
        term.to_string()
    }
}
