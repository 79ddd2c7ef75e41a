use std::path::{Component, Path, PathBuf};

/// Makes `path` absolute against the working directory without touching the
/// filesystem, resolving `.` and `..` lexically.
pub fn lexical_absolute(path: &Path) -> PathBuf {
    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(current_dir) => current_dir.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    normalize_path(&absolute_path)
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pop past the root
                if !components.is_empty()
                    && !matches!(
                        components.last(),
                        Some(Component::RootDir | Component::Prefix(_))
                    )
                {
                    components.pop();
                }
            }
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

pub trait PathExt {
    /// Final component of the path, or the whole path when it has none (`/`, `..`).
    fn base_name(&self) -> String;
    fn absolute_display(&self) -> String;
}

impl PathExt for Path {
    fn base_name(&self) -> String {
        match self.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.to_string_lossy().into_owned(),
        }
    }

    fn absolute_display(&self) -> String {
        lexical_absolute(self).display().to_string()
    }
}
