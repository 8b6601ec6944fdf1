//! Path normalization.
//!
//! Paths are kept as forward-slash strings rather than `PathBuf`: they are map
//! keys shared with editor tooling, and include literals written on Windows
//! must compare equal to watcher paths reported on the same machine.

/// Converts every backslash to a forward slash.
pub fn to_slash(path: &str) -> String {
    path.replace('\\', "/")
}

/// Returns `true` for `/abs/path` and drive-letter paths such as `C:/work`.
pub fn is_absolute(path: &str) -> bool {
    let path = path.as_bytes();
    if path.first() == Some(&b'/') || path.first() == Some(&b'\\') {
        return true;
    }
    path.len() >= 3
        && path[0].is_ascii_alphabetic()
        && path[1] == b':'
        && (path[2] == b'/' || path[2] == b'\\')
}

/// Returns the directory part of a slash path (everything before the last `/`).
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => ".",
    }
}

/// Lexically resolves `.` and `..` components and collapses repeated slashes.
///
/// The result keeps a leading `/` or drive prefix. `..` never climbs above the
/// root of an absolute path.
pub fn normalize(path: &str) -> String {
    let path = to_slash(path);
    let (prefix, rest) = split_root(&path);
    let mut parts: Vec<&str> = Vec::new();
    for comp in rest.split('/') {
        match comp {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(last) if *last != "..") {
                    parts.pop();
                } else if prefix.is_empty() {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }
    let joined = parts.join("/");
    if prefix.is_empty() && joined.is_empty() {
        ".".to_string()
    } else {
        format!("{prefix}{joined}")
    }
}

fn split_root(path: &str) -> (&str, &str) {
    if path.starts_with('/') {
        (&path[..1], &path[1..])
    } else if is_absolute(path) {
        (&path[..3], &path[3..])
    } else {
        ("", path)
    }
}

/// Resolves `rel_path` relative to the directory containing `cur_file`.
///
/// Absolute `rel_path` values are returned normalized but otherwise unchanged.
pub fn rel2abs(cur_file: &str, rel_path: &str) -> String {
    if is_absolute(rel_path) {
        return normalize(rel_path);
    }
    let base = dirname(&to_slash(cur_file)).to_string();
    normalize(&format!("{base}/{rel_path}"))
}

/// Joins two path fragments with a single `/`.
pub fn join(base: &str, tail: &str) -> String {
    if is_absolute(tail) {
        return normalize(tail);
    }
    normalize(&format!("{}/{}", to_slash(base), to_slash(tail)))
}

/// Returns `true` if `path` equals `dir` or lies underneath it.
///
/// Comparison is by whole path components, so `/prj/src2/a.v` is not under
/// `/prj/src`.
pub fn is_under(path: &str, dir: &str) -> bool {
    let path = normalize(path);
    let dir = normalize(dir);
    if path == dir {
        return true;
    }
    if dir == "/" {
        return path.starts_with('/');
    }
    path.strip_prefix(dir.as_str())
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Returns the lowercase extension without the dot, or an empty string.
pub fn extension(path: &str) -> String {
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rfind('.') {
        Some(idx) if idx > 0 => file[idx + 1..].to_ascii_lowercase(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backslashes_become_slashes() {
        assert_eq!(to_slash(r"C:\prj\src\top.v"), "C:/prj/src/top.v");
    }

    #[test]
    fn absolute_detection() {
        assert!(is_absolute("/prj/top.v"));
        assert!(is_absolute("C:/prj/top.v"));
        assert!(is_absolute(r"d:\prj\top.v"));
        assert!(!is_absolute("inc/defs.vh"));
        assert!(!is_absolute("./defs.vh"));
    }

    #[test]
    fn normalize_dots() {
        assert_eq!(normalize("/prj/src/./inc/../top.v"), "/prj/src/top.v");
        assert_eq!(normalize("/prj//src/"), "/prj/src");
        assert_eq!(normalize("/../x"), "/x");
        assert_eq!(normalize("a/../../b"), "../b");
        assert_eq!(normalize("C:/a/b/../c"), "C:/a/c");
    }

    #[test]
    fn rel2abs_resolves_against_file_dir() {
        assert_eq!(rel2abs("/prj/src/top.v", "leaf.v"), "/prj/src/leaf.v");
        assert_eq!(rel2abs("/prj/src/top.v", "../inc/defs.vh"), "/prj/inc/defs.vh");
        assert_eq!(rel2abs("/prj/src/top.v", "/lib/cells.v"), "/lib/cells.v");
        assert_eq!(rel2abs(r"C:\prj\src\top.v", "sub/leaf.v"), "C:/prj/src/sub/leaf.v");
    }

    #[test]
    fn is_under_matches_whole_components() {
        assert!(is_under("/prj/src/top.v", "/prj/src"));
        assert!(is_under("/prj/src", "/prj/src/"));
        assert!(!is_under("/prj/src2/top.v", "/prj/src"));
        assert!(!is_under("/other/top.v", "/prj"));
    }

    #[test]
    fn extension_is_lowercase() {
        assert_eq!(extension("/prj/TOP.SV"), "sv");
        assert_eq!(extension("/prj/.hidden"), "");
        assert_eq!(extension("/prj.d/Makefile"), "");
    }

    #[test]
    fn join_handles_absolute_tail() {
        assert_eq!(join("/prj", "user/src"), "/prj/user/src");
        assert_eq!(join("/prj", "/opt/ip"), "/opt/ip");
    }
}
