//! Repositories that artifacts are fetched from.

use std::fmt;

use compact_str::CompactString;

/// A named source of published artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepositoryReference {
    JCenter,
    MavenCentral,
    Google,
    /// The Maven repository on the local machine, usually `~/.m2/repository`.
    MavenLocal,
    /// Any other Maven repository, identified by its base URL.
    Maven { url: CompactString },
}

impl RepositoryReference {
    /// Looks up one of the well-known repository aliases.
    pub fn from_alias(alias: &str) -> Option<RepositoryReference> {
        let repo = match alias {
            "jcenter" => RepositoryReference::JCenter,
            "mavenCentral" => RepositoryReference::MavenCentral,
            "google" => RepositoryReference::Google,
            "mavenLocal" => RepositoryReference::MavenLocal,
            _ => return None,
        };
        Some(repo)
    }

    /// Name this repository is declared with.
    pub fn alias(&self) -> &'static str {
        match self {
            RepositoryReference::JCenter => "jcenter",
            RepositoryReference::MavenCentral => "mavenCentral",
            RepositoryReference::Google => "google",
            RepositoryReference::MavenLocal => "mavenLocal",
            RepositoryReference::Maven { .. } => "maven",
        }
    }

    /// Base URL artifacts are fetched from, `None` for local repositories.
    pub fn base_url(&self) -> Option<&str> {
        match self {
            RepositoryReference::JCenter => Some("https://jcenter.bintray.com/"),
            RepositoryReference::MavenCentral => Some("https://repo.maven.apache.org/maven2/"),
            RepositoryReference::Google => Some("https://dl.google.com/dl/android/maven2/"),
            RepositoryReference::MavenLocal => None,
            RepositoryReference::Maven { url } => Some(url),
        }
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryReference::Maven { url } => write!(f, "maven({url})"),
            other => f.write_str(other.alias()),
        }
    }
}

/// Repositories of a build file.
///
/// Declaring a repository twice is a no-op, the position of the first declaration is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositorySet {
    inner: Vec<RepositoryReference>,
}

impl RepositorySet {
    /// Inserts a repository, returns `false` if it was already present.
    pub fn insert(&mut self, repository: RepositoryReference) -> bool {
        if self.contains(&repository) {
            return false;
        }
        self.inner.push(repository);
        true
    }

    pub fn contains(&self, repository: &RepositoryReference) -> bool {
        self.inner.contains(repository)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RepositoryReference> {
        self.inner.iter()
    }

    /// Base URLs of every remote repository, in declaration order.
    pub fn base_urls(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().filter_map(|repo| repo.base_url())
    }
}

impl<'a> IntoIterator for &'a RepositorySet {
    type Item = &'a RepositoryReference;
    type IntoIter = std::slice::Iter<'a, RepositoryReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_semantics() {
        let mut set = RepositorySet::default();
        assert!(set.insert(RepositoryReference::JCenter));
        assert!(set.insert(RepositoryReference::MavenCentral));
        assert!(!set.insert(RepositoryReference::JCenter));

        let url = RepositoryReference::Maven {
            url: "https://repo.example.com/releases".into(),
        };
        assert!(set.insert(url.clone()));
        assert!(!set.insert(url));

        let aliases: Vec<_> = set.iter().map(|r| r.alias()).collect();
        assert_eq!(aliases, ["jcenter", "mavenCentral", "maven"]);
    }

    #[test]
    fn base_urls_skip_local() {
        let mut set = RepositorySet::default();
        set.insert(RepositoryReference::MavenLocal);
        set.insert(RepositoryReference::MavenCentral);

        let urls: Vec<_> = set.base_urls().collect();
        assert_eq!(urls, ["https://repo.maven.apache.org/maven2/"]);
    }

    #[test]
    fn aliases_round_trip() {
        for alias in ["jcenter", "mavenCentral", "google", "mavenLocal"] {
            let repo = RepositoryReference::from_alias(alias).unwrap();
            assert_eq!(repo.alias(), alias);
        }
        assert_eq!(RepositoryReference::from_alias("maven"), None);
        assert_eq!(RepositoryReference::from_alias("ivy"), None);
    }
}
