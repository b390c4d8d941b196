//! Dependency declarations.

use std::fmt;

use compact_str::CompactString;

/// The classpath a dependency is added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    /// Compile and runtime classpath of the main sources.
    Implementation,
    /// Compile and runtime classpath of the test sources.
    TestImplementation,
    /// Only the runtime classpath of the tests.
    TestRuntimeOnly,
}

impl Scope {
    pub const ALL: &'static [Scope] = &[
        Scope::Implementation,
        Scope::TestImplementation,
        Scope::TestRuntimeOnly,
    ];

    /// Name of this scope as written in a build file.
    pub const fn name(&self) -> &'static str {
        match self {
            Scope::Implementation => "implementation",
            Scope::TestImplementation => "testImplementation",
            Scope::TestRuntimeOnly => "testRuntimeOnly",
        }
    }

    pub fn from_name(name: &str) -> Option<Scope> {
        Scope::ALL.iter().copied().find(|scope| scope.name() == name)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coordinates of a published artifact, `group:artifact:version[:classifier]`.
///
/// The version is kept as an opaque token, see [`Coordinate::semver`] for a best effort
/// interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    group: CompactString,
    artifact: CompactString,
    version: CompactString,
    classifier: Option<CompactString>,
}

impl Coordinate {
    /// Parses a coordinate, returns `None` if any segment is missing or empty.
    pub fn parse(raw: &str) -> Option<Coordinate> {
        let mut segments = raw.split(':');
        let mut next = || {
            segments
                .next()
                .filter(|segment| !segment.is_empty())
                .map(CompactString::from)
        };

        let group = next()?;
        let artifact = next()?;
        let version = next()?;
        let classifier = match segments.next() {
            None => None,
            Some("") => return None,
            Some(classifier) => Some(CompactString::from(classifier)),
        };
        if segments.next().is_some() {
            return None;
        }

        Some(Coordinate {
            group,
            artifact,
            version,
            classifier,
        })
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    /// Interprets the version as a semantic version.
    ///
    /// Returns `None` for versions that don't follow semver, e.g. `1.0` or `2.12`, which are
    /// still perfectly valid versions as far as the build file is concerned.
    pub fn semver(&self) -> Option<semver::Version> {
        semver::Version::parse(&self.version).ok()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        Ok(())
    }
}

/// A single `scope("group:artifact:version")` entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyDeclaration {
    scope: Scope,
    coordinate: Coordinate,
}

impl DependencyDeclaration {
    pub fn new(scope: Scope, coordinate: Coordinate) -> Self {
        DependencyDeclaration { scope, coordinate }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    pub fn group(&self) -> &str {
        self.coordinate.group()
    }

    pub fn artifact(&self) -> &str {
        self.coordinate.artifact()
    }

    pub fn version(&self) -> &str {
        self.coordinate.version()
    }
}

impl fmt::Display for DependencyDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(\"{}\")", self.scope, self.coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_coordinates() {
        let coord = Coordinate::parse("org.scalatest:scalatest_2.12:3.2.0-M3").unwrap();
        assert_eq!(coord.group(), "org.scalatest");
        assert_eq!(coord.artifact(), "scalatest_2.12");
        assert_eq!(coord.version(), "3.2.0-M3");
        assert_eq!(coord.classifier(), None);

        let coord = Coordinate::parse("org.lwjgl:lwjgl:3.3.1:natives-linux").unwrap();
        assert_eq!(coord.classifier(), Some("natives-linux"));
        assert_eq!(coord.to_string(), "org.lwjgl:lwjgl:3.3.1:natives-linux");
    }

    #[test]
    fn reject_malformed_coordinates() {
        for raw in [
            "",
            "org.scala-lang",
            "org.scala-lang:scala-library",
            "org.scala-lang::2.12.8",
            ":scala-library:2.12.8",
            "org.scala-lang:scala-library:",
            "a:b:c:",
            "a:b:c:d:e",
        ] {
            assert_eq!(Coordinate::parse(raw), None, "{raw}");
        }
    }

    #[test]
    fn versions_are_opaque() {
        let semver = Coordinate::parse("org.junit.platform:junit-platform-engine:1.6.0").unwrap();
        assert_eq!(semver.semver(), Some(semver::Version::new(1, 6, 0)));

        let milestone = Coordinate::parse("org.scalatest:scalatest_2.12:3.2.0-M3").unwrap();
        let version = milestone.semver().unwrap();
        assert_eq!(version.pre.as_str(), "M3");

        let loose = Coordinate::parse("com.example:thing:1.0").unwrap();
        assert_eq!(loose.version(), "1.0");
        assert_eq!(loose.semver(), None);
    }

    #[test]
    fn scope_names() {
        for scope in Scope::ALL {
            assert_eq!(Scope::from_name(scope.name()), Some(*scope));
        }
        assert_eq!(Scope::from_name("compileOnly"), None);
    }
}
