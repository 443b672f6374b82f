//! Content source over local checkouts laid out as `<root>/<owner>/<repo>/`.

use crate::ingest::source::{
    ContentSource, FetchError, FetchResult, RepoRef, STATUS_NOT_FOUND,
};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const STATUS_IO_ERROR: u16 = 500;

/// README file names tried, compared case-insensitively.
const README_NAMES: &[&str] = &[
    "README.md",
    "README",
    "README.markdown",
    "README.rst",
    "README.txt",
];

const SKIPPED_DIRS: &[&str] = &[".git", "node_modules", "target"];

/// File extension to language name.
const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("c", "C"),
    ("h", "C"),
    ("cc", "C++"),
    ("cpp", "C++"),
    ("hpp", "C++"),
    ("cs", "C#"),
    ("css", "CSS"),
    ("dart", "Dart"),
    ("ex", "Elixir"),
    ("exs", "Elixir"),
    ("go", "Go"),
    ("html", "HTML"),
    ("java", "Java"),
    ("js", "JavaScript"),
    ("jsx", "JavaScript"),
    ("mjs", "JavaScript"),
    ("kt", "Kotlin"),
    ("lua", "Lua"),
    ("php", "PHP"),
    ("py", "Python"),
    ("rb", "Ruby"),
    ("rs", "Rust"),
    ("scala", "Scala"),
    ("sh", "Shell"),
    ("bash", "Shell"),
    ("sql", "SQL"),
    ("swift", "Swift"),
    ("ts", "TypeScript"),
    ("tsx", "TypeScript"),
];

/// Reads repositories from a directory tree instead of a hosting API.
#[derive(Debug, Clone)]
pub struct DirectoryContentSource {
    root: PathBuf,
}

impl DirectoryContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn repo_dir(&self, repo: &RepoRef) -> PathBuf {
        self.root.join(&repo.owner).join(&repo.repo)
    }
}

impl ContentSource for DirectoryContentSource {
    fn list_repos(&self, org: &str) -> FetchResult<Vec<RepoRef>> {
        let org_dir = self.root.join(org);
        let entries = std::fs::read_dir(&org_dir).map_err(|err| io_error(&org_dir, err))?;

        let mut repos = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| io_error(&org_dir, err))?;
            let is_dir = entry
                .file_type()
                .map_err(|err| io_error(&entry.path(), err))?
                .is_dir();
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_dir && !name.starts_with('.') {
                repos.push(RepoRef::new(org, name));
            }
        }
        repos.sort();
        Ok(repos)
    }

    fn fetch_readme(&self, repo: &RepoRef) -> FetchResult<String> {
        let dir = self.repo_dir(repo);
        let entries = std::fs::read_dir(&dir).map_err(|err| io_error(&dir, err))?;

        let mut files: BTreeMap<String, PathBuf> = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|err| io_error(&dir, err))?;
            let kind = entry
                .file_type()
                .map_err(|err| io_error(&entry.path(), err))?;
            if kind.is_file() {
                let name = entry.file_name().to_string_lossy().to_lowercase();
                files.insert(name, entry.path());
            }
        }

        README_NAMES
            .iter()
            .find_map(|name| files.get(&name.to_lowercase()))
            .ok_or_else(|| FetchError::not_found(format!("no README in {repo}")))
            .and_then(|path| read_text(path))
    }

    fn fetch_file(&self, repo: &RepoRef, path: &str) -> FetchResult<String> {
        let relative = path.trim_start_matches('/');
        read_text(&self.repo_dir(repo).join(relative))
    }

    fn fetch_languages(&self, repo: &RepoRef) -> FetchResult<BTreeMap<String, u64>> {
        let dir = self.repo_dir(repo);
        if !dir.is_dir() {
            return Err(FetchError::not_found(format!("no checkout for {repo}")));
        }

        let mut languages = BTreeMap::new();
        let walker = WalkDir::new(&dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !(entry.file_type().is_dir()
                        && entry
                            .file_name()
                            .to_str()
                            .is_some_and(|name| SKIPPED_DIRS.contains(&name)))
            });

        for entry in walker {
            let entry = entry.map_err(|err| {
                FetchError::new(STATUS_IO_ERROR, format!("walk failed in {repo}: {err}"))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(language) = language_for(entry.path()) else {
                continue;
            };
            let bytes = entry
                .metadata()
                .map_err(|err| {
                    FetchError::new(STATUS_IO_ERROR, format!("metadata failed in {repo}: {err}"))
                })?
                .len();
            *languages.entry(language.to_string()).or_insert(0) += bytes;
        }
        Ok(languages)
    }
}

fn language_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_string_lossy().to_lowercase();
    LANGUAGE_EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, language)| *language)
}

fn read_text(path: &Path) -> FetchResult<String> {
    if path.is_dir() {
        return Err(FetchError::not_found(format!("{} is a directory", path.display())));
    }
    let bytes = std::fs::read(path).map_err(|err| io_error(path, err))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn io_error(path: &Path, err: std::io::Error) -> FetchError {
    let status = if err.kind() == ErrorKind::NotFound {
        STATUS_NOT_FOUND
    } else {
        STATUS_IO_ERROR
    };
    FetchError::new(status, format!("{}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::DirectoryContentSource;
    use crate::ingest::source::{ContentSource, RepoRef};
    use std::fs;

    fn write(root: &std::path::Path, relative: &str, body: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn lists_repository_directories_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "acme/web/README.md", "# web");
        write(dir.path(), "acme/api/README.md", "# api");
        write(dir.path(), "acme/.cache/x", "");
        write(dir.path(), "acme/notes.txt", "");

        let source = DirectoryContentSource::new(dir.path());
        let repos = source.list_repos("acme").unwrap();
        assert_eq!(repos, vec![RepoRef::new("acme", "api"), RepoRef::new("acme", "web")]);
    }

    #[test]
    fn readme_lookup_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "acme/api/readme.MD", "hello");

        let source = DirectoryContentSource::new(dir.path());
        let readme = source.fetch_readme(&RepoRef::new("acme", "api")).unwrap();
        assert_eq!(readme, "hello");
    }

    #[test]
    fn missing_files_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("acme/api")).unwrap();

        let source = DirectoryContentSource::new(dir.path());
        let repo = RepoRef::new("acme", "api");
        assert!(source.fetch_readme(&repo).unwrap_err().is_not_found());
        assert!(source
            .fetch_file(&repo, ".github/CODEOWNERS")
            .unwrap_err()
            .is_not_found());
        assert!(source.list_repos("nobody").unwrap_err().is_not_found());
    }

    #[test]
    fn languages_count_bytes_and_skip_vendor_dirs() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "acme/api/src/main.rs", "fn main() {}");
        write(dir.path(), "acme/api/src/lib.RS", "pub fn x() {}");
        write(dir.path(), "acme/api/scripts/run.sh", "echo");
        write(dir.path(), "acme/api/target/debug/gen.rs", "ignored ignored");
        write(dir.path(), "acme/api/node_modules/dep/index.js", "ignored");
        write(dir.path(), "acme/api/LICENSE", "MIT");

        let source = DirectoryContentSource::new(dir.path());
        let languages = source.fetch_languages(&RepoRef::new("acme", "api")).unwrap();
        assert_eq!(languages.len(), 2);
        assert_eq!(languages["Rust"], 12 + 13);
        assert_eq!(languages["Shell"], 4);
    }

    #[test]
    fn readme_named_directory_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("acme/api/README.md")).unwrap();
        write(dir.path(), "acme/api/readme.txt", "plain");

        let source = DirectoryContentSource::new(dir.path());
        let readme = source.fetch_readme(&RepoRef::new("acme", "api")).unwrap();
        assert_eq!(readme, "plain");
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_checkout_is_an_error_not_absence() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "acme/api/README.md", "hello");
        let repo_dir = dir.path().join("acme/api");
        fs::set_permissions(&repo_dir, fs::Permissions::from_mode(0o000)).unwrap();
        let readable = fs::read_dir(&repo_dir).is_ok();

        let source = DirectoryContentSource::new(dir.path());
        let result = source.fetch_readme(&RepoRef::new("acme", "api"));
        fs::set_permissions(&repo_dir, fs::Permissions::from_mode(0o755)).unwrap();

        // Privileged users bypass directory permissions.
        if readable {
            assert_eq!(result.unwrap(), "hello");
            return;
        }
        let err = result.unwrap_err();
        assert!(!err.is_not_found());
        assert_eq!(err.status, super::STATUS_IO_ERROR);
    }
}
