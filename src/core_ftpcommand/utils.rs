use std::path::{Component, Path, PathBuf};

/// Resolves a client-supplied path against the server root and the session's
/// current directory, and checks containment.
///
/// The join is purely lexical (`.` dropped, `..` popped), so targets that do
/// not exist yet still resolve, which STOR needs. Returns `None` when the
/// normalized path escapes the root. The root itself is a valid target.
///
/// Containment is checked component-wise, so a sibling directory whose name
/// merely extends the root's last component (`/srv/ftp` vs `/srv/ftpx`) is
/// rejected.
pub fn resolve_path(root: &Path, current_dir: &str, arg: &str) -> Option<PathBuf> {
    let mut joined = root.to_path_buf();
    joined.push(current_dir);
    // A leading slash in a client argument is collapsed; the path is taken
    // relative to the current directory.
    joined.push(arg.trim_start_matches('/'));

    let resolved = normalize(&joined);
    if resolved.starts_with(root) {
        Some(resolved)
    } else {
        None
    }
}

/// Lexically normalizes a path: drops `.` components and resolves `..`
/// against the preceding component. `..` pops clamp at the filesystem root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Joins the session's relative current directory with a CWD argument and
/// normalizes the result to a relative path string, `"."` when it lands back
/// on the root. Only called after `resolve_path` accepted the target, so the
/// composition cannot escape the root.
pub fn join_relative(current_dir: &str, arg: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    let components = Path::new(current_dir)
        .components()
        .chain(Path::new(arg.trim_start_matches('/')).components());
    for component in components {
        match component {
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
            Component::ParentDir => {
                parts.pop();
            }
            _ => {}
        }
    }

    if parts.is_empty() {
        String::from(".")
    } else {
        parts.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "/srv/ftp";

    #[test]
    fn plain_segment_resolves_under_root() {
        let resolved = resolve_path(Path::new(ROOT), ".", "docs").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/ftp/docs"));
    }

    #[test]
    fn current_dir_participates_in_the_join() {
        let resolved = resolve_path(Path::new(ROOT), "sub/inner", "file.txt").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/ftp/sub/inner/file.txt"));
    }

    #[test]
    fn root_itself_is_a_valid_target() {
        let resolved = resolve_path(Path::new(ROOT), ".", ".").unwrap();
        assert_eq!(resolved, PathBuf::from(ROOT));
    }

    #[test]
    fn dotdot_back_to_root_is_accepted() {
        let resolved = resolve_path(Path::new(ROOT), "sub", "..").unwrap();
        assert_eq!(resolved, PathBuf::from(ROOT));
    }

    #[test]
    fn dotdot_above_root_is_rejected() {
        assert!(resolve_path(Path::new(ROOT), ".", "..").is_none());
        assert!(resolve_path(Path::new(ROOT), ".", "../../etc/passwd").is_none());
        assert!(resolve_path(Path::new(ROOT), "sub", "../../../etc").is_none());
    }

    #[test]
    fn deep_traversal_clamps_at_filesystem_root_and_is_rejected() {
        assert!(resolve_path(Path::new(ROOT), ".", "../../../../../../../etc").is_none());
    }

    #[test]
    fn interior_dotdot_that_stays_inside_is_accepted() {
        let resolved = resolve_path(Path::new(ROOT), ".", "a/../b").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/ftp/b"));
    }

    #[test]
    fn absolute_argument_is_taken_relative_to_current_dir() {
        let resolved = resolve_path(Path::new(ROOT), ".", "/docs").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/ftp/docs"));
        let resolved = resolve_path(Path::new(ROOT), "sub", "/docs").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/ftp/sub/docs"));
    }

    #[test]
    fn sibling_directory_sharing_the_root_prefix_is_rejected() {
        assert!(resolve_path(Path::new(ROOT), ".", "../ftpx").is_none());
        assert!(resolve_path(Path::new(ROOT), ".", "../ftpx/file.txt").is_none());
    }

    #[test]
    fn join_relative_composes_and_normalizes() {
        assert_eq!(join_relative(".", "sub"), "sub");
        assert_eq!(join_relative("sub", "inner"), "sub/inner");
        assert_eq!(join_relative("sub/inner", ".."), "sub");
        assert_eq!(join_relative("sub", ".."), ".");
        assert_eq!(join_relative(".", "a/../b"), "b");
        assert_eq!(join_relative(".", "/docs"), "docs");
        assert_eq!(join_relative(".", ""), ".");
    }
}
