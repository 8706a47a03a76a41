//! Write the rendered catalog to disk.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::catalog::CatalogState;
use crate::error::AppError;
use crate::io::html::render_catalog_document;

/// Write the filtered catalog as a standalone HTML page.
pub fn write_catalog_html(path: &Path, state: &CatalogState) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create HTML file '{}': {e}", path.display())))?;

    file.write_all(render_catalog_document(state).as_bytes())
        .map_err(|e| AppError::usage(format!("Failed to write HTML file '{}': {e}", path.display())))?;

    tracing::info!(path = %path.display(), products = state.filtered().len(), "wrote catalog html");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogData;

    #[test]
    fn writes_document() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("index.html");
        let state = CatalogState::new(CatalogData::default());
        write_catalog_html(&path, &state).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("<!DOCTYPE html>"));
        assert!(text.contains(r#"id="no-results" style="display: block""#));
    }

    #[test]
    fn unwritable_path_is_usage_error() {
        let state = CatalogState::new(CatalogData::default());
        let err = write_catalog_html(Path::new("/nonexistent/dir/index.html"), &state).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
