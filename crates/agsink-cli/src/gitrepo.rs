use agsink_core::RepoResolver;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

/// Resolves a working directory to its "owner/repo" slug by walking up to
/// the enclosing `.git/config` and reading the origin remote. Lookups are
/// memoized per process; the mapper already calls at most once per batch,
/// the cache covers repeated CLI-internal calls.
#[derive(Default)]
pub struct GitRepoResolver {
    cache: RefCell<HashMap<String, Option<String>>>,
}

impl GitRepoResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(cwd: &str) -> Option<String> {
        let mut dir = Path::new(cwd);
        loop {
            let config = dir.join(".git").join("config");
            if config.is_file() {
                let text = std::fs::read_to_string(&config).ok()?;
                return origin_url(&text).and_then(repo_slug);
            }
            dir = dir.parent()?;
        }
    }
}

impl RepoResolver for GitRepoResolver {
    fn resolve(&self, cwd: &str) -> Option<String> {
        self.cache
            .borrow_mut()
            .entry(cwd.to_string())
            .or_insert_with(|| Self::lookup(cwd))
            .clone()
    }
}

/// First `url = ...` inside the `[remote "origin"]` section.
fn origin_url(config: &str) -> Option<&str> {
    let mut in_origin = false;
    for line in config.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            in_origin = trimmed == r#"[remote "origin"]"#;
        } else if in_origin
            && let Some(rest) = trimmed.strip_prefix("url")
        {
            return Some(rest.trim_start_matches([' ', '=']).trim());
        }
    }
    None
}

/// "https://github.com/acme/tool.git" or "git@github.com:acme/tool.git"
/// both reduce to "acme/tool".
fn repo_slug(url: &str) -> Option<String> {
    let trimmed = url.trim_end_matches('/').trim_end_matches(".git");
    let mut parts = trimmed.rsplit(['/', ':']);
    let repo = parts.next()?;
    let owner = parts.next()?;
    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some(format!("{owner}/{repo}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"[core]
	repositoryformatversion = 0
[remote "origin"]
	url = git@github.com:acme/tool.git
	fetch = +refs/heads/*:refs/remotes/origin/*
[remote "fork"]
	url = git@github.com:other/tool.git
"#;

    #[test]
    fn origin_wins_over_other_remotes() {
        assert_eq!(origin_url(CONFIG), Some("git@github.com:acme/tool.git"));
    }

    #[test]
    fn resolves_from_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let git = dir.path().join(".git");
        std::fs::create_dir_all(&git).unwrap();
        std::fs::write(git.join("config"), CONFIG).unwrap();
        let nested = dir.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();

        let resolver = GitRepoResolver::new();
        assert_eq!(
            resolver.resolve(nested.to_str().unwrap()).as_deref(),
            Some("acme/tool")
        );
        // Memoized
        assert_eq!(
            resolver.resolve(nested.to_str().unwrap()).as_deref(),
            Some("acme/tool")
        );
    }

    #[test]
    fn non_repo_directory_resolves_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = GitRepoResolver::new();
        assert_eq!(resolver.resolve(dir.path().to_str().unwrap()), None);
    }
}
