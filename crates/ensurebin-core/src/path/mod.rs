//! Component-based path helpers
//!
//! Everything here is lexical: no filesystem access, no symlink resolution.
//! `Path::is_absolute()` differs between Unix and Windows for rooted paths
//! such as `/tmp`, so checks go through components instead.

use std::path::{Component, Path, PathBuf};

/// Check if path is absolute OR rooted (cross-platform)
///
/// ```rust
/// use std::path::Path;
/// use ensurebin_core::path::has_absolute_or_rooted_component;
///
/// assert!(has_absolute_or_rooted_component(Path::new("/tmp")));
/// assert!(!has_absolute_or_rooted_component(Path::new("lib/bin")));
/// ```
pub fn has_absolute_or_rooted_component(path: &Path) -> bool {
    if path.is_absolute() {
        return true;
    }

    path.components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
}

/// Removes `.` components and folds `..` into the preceding component
///
/// A `..` that would climb above the root is dropped; a leading `..` on a
/// relative path is kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    parts.iter().collect()
}

/// Path of `target` expressed relative to the directory `base`
///
/// Both paths are normalized first. When they share no root (different
/// Windows drives, or one side relative and the other absolute) `target` is
/// returned unchanged, which still resolves correctly with `base.join(..)`.
///
/// ```rust
/// use std::path::{Path, PathBuf};
/// use ensurebin_core::path::relative_path;
///
/// assert_eq!(
///     relative_path(Path::new("/pkg/lib"), Path::new("/pkg/lib/bin/tool")),
///     PathBuf::from("bin/tool")
/// );
/// assert_eq!(
///     relative_path(Path::new("/pkg/lib"), Path::new("/pkg/vendor/tool")),
///     PathBuf::from("../vendor/tool")
/// );
/// ```
pub fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base = normalize_lexically(base);
    let target = normalize_lexically(target);

    let base_parts: Vec<Component> = base.components().collect();
    let target_parts: Vec<Component> = target.components().collect();

    let same_root = match (base_parts.first(), target_parts.first()) {
        (Some(a), Some(b)) => {
            matches!(a, Component::RootDir | Component::Prefix(_)) && a == b
        }
        _ => false,
    };
    if !same_root {
        return target;
    }

    let common = base_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &target_parts[common..] {
        relative.push(part.as_os_str());
    }
    relative
}
