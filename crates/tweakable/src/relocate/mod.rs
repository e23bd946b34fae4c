//! Mapping compiler-reported file paths to on-disk watch paths.
//!
//! Builds often run from a different directory than the one the program
//! later runs in, or inside a container with the sources mounted elsewhere.
//! The `(prefix, replace)` pair rewrites the path baked into the binary into
//! one that exists where the program runs.

/// Compute the watch path for `file`.
///
/// `prefix` is stripped from the front of `file` if present, then one
/// leading path separator, whether or not the prefix matched. The result is
/// joined onto `replace`.
/// With both `prefix` and `replace` empty, `file` is returned unchanged.
/// Backslashes are converted to forward slashes on Windows.
///
/// ```
/// use tweakable::relocate;
///
/// assert_eq!(relocate("/build/src/a.cpp", "/build", "/home/me/project"), "/home/me/project/src/a.cpp");
/// assert_eq!(relocate("/build/src/a.cpp", "/build/src/", ""), "a.cpp");
/// assert_eq!(relocate("/src/a.cpp", "", "/home/me"), "/home/me/src/a.cpp");
/// assert_eq!(relocate("src/a.cpp", "", ""), "src/a.cpp");
/// ```
pub fn relocate(file: &str, prefix: &str, replace: &str) -> String {
    let file = from_native_separators(file);
    if prefix.is_empty() && replace.is_empty() {
        return file;
    }

    let rest = file.strip_prefix(prefix).unwrap_or(file.as_str());
    let stripped = rest.strip_prefix('/').unwrap_or(rest);

    if replace.is_empty() {
        stripped.to_owned()
    } else if replace.ends_with('/') {
        format!("{replace}{stripped}")
    } else {
        format!("{replace}/{stripped}")
    }
}

fn from_native_separators(path: &str) -> String {
    if cfg!(windows) {
        path.replace('\\', "/")
    } else {
        path.to_owned()
    }
}

#[cfg(test)]
mod tests;
