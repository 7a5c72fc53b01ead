use crate::error::{FlistError, Result};

/// Canonicalises a path for the wire: strips leading `./`, collapses
/// consecutive `/`, and rejects any `..` component. The leading path
/// component (the transfer root's own name) is preserved.
pub fn canonicalize(path: &str) -> Result<String> {
    let mut out = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => continue,
            ".." => return Err(FlistError::PathUnsafe(path.to_string())),
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return Err(FlistError::EmptyPath);
    }
    Ok(out.join("/"))
}
