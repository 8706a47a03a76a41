//! Interactive data directory picker.
//!
//! Used when neither `--data`, `$PRECIOS_DATA` nor `./data` points at a data
//! set. The picker searches the current directory tree for directories that
//! contain a product list file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::data::source::PRODUCTS_FILE;
use crate::error::AppError;

/// Default directory recursion depth when looking for data directories.
const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Prompt the user to select a data directory from the current directory tree.
///
/// Accepts a number from the list or an explicit path; `q` cancels.
pub fn prompt_for_data_dir() -> Result<PathBuf, AppError> {
    let dirs = discover_data_dirs();
    if dirs.is_empty() {
        return Err(AppError::usage(format!(
            "No data directory found (looked for {PRODUCTS_FILE}). Provide one with `precios --data <dir|url>`."
        )));
    }

    println!("Found {} data director{}:", dirs.len(), if dirs.len() == 1 { "y" } else { "ies" });
    for (idx, path) in dirs.iter().enumerate() {
        println!("{:>3}) {}", idx + 1, pretty_path(path));
    }

    loop {
        print!("Select a directory by number (1-{}) or type a path (q to quit): ", dirs.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::usage(format!("Failed to write prompt: {e}")))?;

        let mut input = String::new();
        let bytes = io::stdin()
            .read_line(&mut input)
            .map_err(|e| AppError::usage(format!("Failed to read input: {e}")))?;

        if bytes == 0 {
            return Err(AppError::usage(
                "No input received. Provide a data directory with `precios --data <dir>`.",
            ));
        }

        let input = input.trim();
        if input.eq_ignore_ascii_case("q") {
            return Err(AppError::usage("Canceled."));
        }

        if let Ok(choice) = input.parse::<usize>() {
            if (1..=dirs.len()).contains(&choice) {
                return validate_data_dir(&dirs[choice - 1]);
            }
            println!("Invalid choice: {choice}. Enter a number between 1 and {}.", dirs.len());
            continue;
        }

        match validate_data_dir(Path::new(input)) {
            Ok(path) => return Ok(path),
            Err(err) => println!("{err}"),
        }
    }
}

/// Check that `path` is a directory holding a product list.
pub fn validate_data_dir(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::usage(format!(
            "Data directory not found: {}",
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(AppError::usage(format!(
            "Expected a directory, got a file: {}",
            path.display()
        )));
    }
    if !path.join(PRODUCTS_FILE).is_file() {
        return Err(AppError::usage(format!(
            "{} has no {PRODUCTS_FILE}",
            path.display()
        )));
    }

    Ok(path.to_path_buf())
}

/// Discover data directories under the current directory (deterministic order).
pub fn discover_data_dirs() -> Vec<PathBuf> {
    find_data_dirs(Path::new("."), DEFAULT_SEARCH_DEPTH)
}

fn find_data_dirs(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut out = Vec::new();
    find_data_dirs_inner(root, 0, max_depth, &mut out);
    out.sort_by(|a, b| pretty_path(a).cmp(&pretty_path(b)));
    out
}

fn find_data_dirs_inner(dir: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }

    if dir.join(PRODUCTS_FILE).is_file() {
        out.push(dir.to_path_buf());
    }

    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let path = entry.path();
        if file_type.is_dir() && !should_skip_dir(&path) {
            find_data_dirs_inner(&path, depth + 1, max_depth, out);
        }
    }
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules")
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    let shown = stripped.display().to_string();
    if shown.is_empty() { ".".to_string() } else { shown }
}
