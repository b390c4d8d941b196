use bf_types::Value;
use smallvec::smallvec;

use crate::{Entry, EntryKind, File, ParseErrorKind, Parser, Position, parse};

static SCALATEST_BUILD: &str = r#"
plugins {
    java
    scala
}

repositories {
    jcenter()
    mavenCentral()
}

dependencies {
    implementation("org.scala-lang:scala-library:2.12.8")

    testImplementation("org.scalatest:scalatest_2.12:3.2.0-M3")
    testRuntimeOnly("org.junit.platform:junit-platform-engine:1.6.0")
    testRuntimeOnly("org.junit.platform:junit-platform-launcher:1.6.0")
    testRuntimeOnly("co.helmethair:scalatest-junit-runner:0.1.11")
}

tasks {
    test{
        useJUnitPlatform {
            includeEngines("scalatest")
            testLogging {
                events("passed", "skipped", "failed")
            }
        }
    }
}
"#;

/// Finds the block named `name` within `entries`.
fn block<'a>(entries: &'a [Entry], name: &str) -> &'a [Entry] {
    entries
        .iter()
        .find_map(|entry| match &entry.kind {
            EntryKind::Block { name: n, entries } if n == name => Some(&entries[..]),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no block named {name}"))
}

fn kinds(entries: &[Entry]) -> Vec<EntryKind> {
    entries.iter().map(|entry| entry.kind.clone()).collect()
}

#[test]
fn smoketest_scalatest_build() {
    let file = parse(SCALATEST_BUILD).unwrap();
    let names: Vec<_> = file.entries.iter().map(|e| e.name()).collect();
    assert_eq!(names, ["plugins", "repositories", "dependencies", "tasks"]);

    assert_eq!(
        kinds(block(&file.entries, "plugins")),
        vec![
            EntryKind::Identifier("java".into()),
            EntryKind::Identifier("scala".into()),
        ]
    );
    assert_eq!(
        kinds(block(&file.entries, "repositories")),
        vec![
            EntryKind::Call {
                name: "jcenter".into(),
                args: smallvec![],
            },
            EntryKind::Call {
                name: "mavenCentral".into(),
                args: smallvec![],
            },
        ]
    );
    assert_eq!(block(&file.entries, "dependencies").len(), 5);

    let test = block(block(&file.entries, "tasks"), "test");
    let junit = block(test, "useJUnitPlatform");
    assert_eq!(
        junit[0].kind,
        EntryKind::Call {
            name: "includeEngines".into(),
            args: smallvec![Value::String("scalatest".into())],
        }
    );
    let logging = block(junit, "testLogging");
    let EntryKind::Call { name, args } = &logging[0].kind else {
        panic!("expected a call, found {:?}", logging[0]);
    };
    assert_eq!(name, "events");
    assert_eq!(args.len(), 3);
}

#[test]
fn entry_positions() {
    let file = parse(SCALATEST_BUILD).unwrap();
    // The source starts with an empty line.
    assert_eq!(file.entries[0].position, Position::new(2, 1));
    let deps = block(&file.entries, "dependencies");
    assert_eq!(deps[0].position, Position::new(13, 5));
    assert_eq!(deps[1].position, Position::new(15, 5));
}

#[test]
fn separators() {
    let one_line = parse("plugins { java; scala }; repositories { jcenter(); mavenCentral() }")
        .unwrap();
    let many_lines = parse("plugins {\n java\n scala\n}\nrepositories {\n jcenter()\n mavenCentral()\n}")
        .unwrap();
    assert_eq!(one_line.to_string(), many_lines.to_string());

    // Stray separators are harmless.
    let file = parse(";;\nplugins { ;java;; }\n;").unwrap();
    assert_eq!(block(&file.entries, "plugins").len(), 1);

    // Two entries on one line need a separator.
    let err = parse("repositories { jcenter() mavenCentral() }").unwrap_err();
    assert!(matches!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            expected: "end of line or ';'",
            ..
        }
    ));
    assert_eq!(err.position, Position::new(1, 26));
}

#[test]
fn multiline_arguments() {
    let file = parse("events(\n  \"passed\",\n  \"failed\"\n)\nfoo(\n)").unwrap();
    assert_eq!(
        kinds(&file.entries),
        vec![
            EntryKind::Call {
                name: "events".into(),
                args: smallvec![
                    Value::String("passed".into()),
                    Value::String("failed".into()),
                ],
            },
            EntryKind::Call {
                name: "foo".into(),
                args: smallvec![],
            },
        ]
    );
}

#[test]
fn assignments_and_values() {
    let file = parse("a = 4\nb = true\nc = FULL\nd = \"x\"\ne(-1, false, `odd name`)").unwrap();
    assert_eq!(
        kinds(&file.entries),
        vec![
            EntryKind::Assignment {
                name: "a".into(),
                value: Value::Integer(4),
            },
            EntryKind::Assignment {
                name: "b".into(),
                value: Value::Boolean(true),
            },
            EntryKind::Assignment {
                name: "c".into(),
                value: Value::Identifier("FULL".into()),
            },
            EntryKind::Assignment {
                name: "d".into(),
                value: Value::String("x".into()),
            },
            EntryKind::Call {
                name: "e".into(),
                args: smallvec![
                    Value::Integer(-1),
                    Value::Boolean(false),
                    Value::Identifier("odd name".into()),
                ],
            },
        ]
    );
}

#[test]
fn unbalanced_braces() {
    let err = parse("plugins {\n    java\n").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::UnclosedBlock {
            name: "plugins".into()
        }
    );
    assert_eq!(err.position, Position::new(1, 1));

    let err = parse("tasks {\n    test {\n        useJUnitPlatform()\n}\n").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::UnclosedBlock {
            name: "tasks".into()
        }
    );

    let err = parse("plugins { java }\n}").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnmatchedClose);
    assert_eq!(err.position, Position::new(2, 1));
}

#[test]
fn malformed_entries() {
    for (source, expected) in [
        ("implementation(\"a:b:c\"", "',' or ')'"),
        ("implementation(\"a:b:c\",)", "a value"),
        ("version =", "a value"),
        ("{ java }", "an identifier"),
        ("\"java\"", "an identifier"),
    ] {
        let err = parse(source).unwrap_err();
        match err.kind {
            ParseErrorKind::UnexpectedToken { expected: e, .. } => {
                assert_eq!(e, expected, "{source}")
            }
            other => panic!("unexpected error {other:?} for {source}"),
        }
    }
}

#[test]
fn nesting_limit() {
    let source = "a { b { c { d {} } } }";
    assert!(Parser::new(source).with_max_depth(4).parse().is_ok());

    let err = Parser::new(source).with_max_depth(3).parse().unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NestingTooDeep { limit: 3 });

    // Deep enough to blow the stack without the limit.
    let deep = "a {".repeat(100_000);
    let err = parse(&deep).unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::NestingTooDeep {
            limit: crate::DEFAULT_MAX_DEPTH
        }
    );

    // Huge limits are capped instead of recursing until the stack runs out.
    let err = Parser::new(&deep)
        .with_max_depth(usize::MAX)
        .parse()
        .unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::NestingTooDeep {
            limit: crate::MAX_DEPTH_LIMIT
        }
    );
}

#[test]
fn error_display() {
    let err = parse("plugins {\n    java @\n}").unwrap_err();
    assert_eq!(err.to_string(), "2:10: unexpected character '@'");
}

#[test]
fn canonical_print() {
    let file = parse(
        "plugins { java; `java-library` }\nrepositories { jcenter(); maven(\"https://x/\") }\nversion = \"1.0\"\ntasks { test {} }",
    )
    .unwrap();
    let expected = r#"plugins {
    java
    `java-library`
}

repositories {
    jcenter()
    maven("https://x/")
}

version = "1.0"

tasks {
    test {}
}
"#;
    assert_eq!(file.to_string(), expected);
}

#[test]
fn print_then_parse_is_stable() {
    let sources = [
        SCALATEST_BUILD,
        "a = \"quote \\\" backslash \\\\ newline \\n tab \\t dollar $\"",
        "x(1, -2, true, NAME, \"s\")\ny\nz {}",
        "",
    ];
    for source in sources {
        let first = parse(source).unwrap();
        let printed = first.to_string();
        let second = parse(&printed).unwrap();
        assert_eq!(strip_positions(&first), strip_positions(&second), "{source}");
        assert_eq!(printed, second.to_string());
    }
}

fn strip_positions(file: &File) -> Vec<EntryKind> {
    fn strip(entry: &Entry) -> EntryKind {
        match &entry.kind {
            EntryKind::Block { name, entries } => EntryKind::Block {
                name: name.clone(),
                entries: entries
                    .iter()
                    .map(|e| Entry::synthesized(strip(e)))
                    .collect(),
            },
            other => other.clone(),
        }
    }
    file.entries.iter().map(strip).collect()
}
