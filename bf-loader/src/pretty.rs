//! Tree rendering of a [`BuildConfig`], used by `bf dump`.

use std::borrow::Cow;
use std::fmt;

use bf_types::{BuildConfig, Scope, TaskOption, TaskOverride, TestEngineConfig};

/// A node in the printable tree of a [`BuildConfig`].
#[derive(Debug, Clone)]
pub struct PrettyNode {
    label: String,
    children: Vec<PrettyNode>,
}

impl PrettyNode {
    fn leaf(label: impl Into<String>) -> Self {
        PrettyNode {
            label: label.into(),
            children: Vec::new(),
        }
    }

    fn branch(label: impl Into<String>, children: Vec<PrettyNode>) -> Self {
        PrettyNode {
            label: label.into(),
            children,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn children(&self) -> &[PrettyNode] {
        &self.children[..]
    }

    /// Builds the tree for `config`, titled `title`.
    pub fn from_config(title: impl Into<String>, config: &BuildConfig) -> Self {
        let plugins = config
            .plugins()
            .iter()
            .map(|plugin| PrettyNode::leaf(plugin.id()))
            .collect();

        let repositories = config
            .repositories()
            .iter()
            .map(|repo| match repo.base_url() {
                Some(url) => PrettyNode::leaf(format!("{} ({url})", repo.alias())),
                None => PrettyNode::leaf(repo.alias()),
            })
            .collect();

        let dependencies = Scope::ALL
            .iter()
            .filter_map(|scope| {
                let deps: Vec<_> = config
                    .dependencies_in(*scope)
                    .map(|dep| PrettyNode::leaf(dep.coordinate().to_string()))
                    .collect();
                (!deps.is_empty()).then(|| PrettyNode::branch(scope.name(), deps))
            })
            .collect();

        let tasks = config.tasks().values().map(task).collect();

        PrettyNode::branch(
            title,
            vec![
                PrettyNode::branch("plugins", plugins),
                PrettyNode::branch("repositories", repositories),
                PrettyNode::branch("dependencies", dependencies),
                PrettyNode::branch("tasks", tasks),
            ],
        )
    }
}

fn task(task: &TaskOverride) -> PrettyNode {
    let mut children = Vec::new();
    if let Some(engine) = task.test_engine() {
        children.push(test_engine(engine));
    }
    if !task.options().is_empty() {
        let options = task.options().iter().map(option).collect();
        children.push(PrettyNode::branch("options", options));
    }
    PrettyNode::branch(task.name(), children)
}

fn test_engine(engine: &TestEngineConfig) -> PrettyNode {
    fn join<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
        items
            .into_iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    let mut children = vec![PrettyNode::leaf(format!(
        "junit platform: {}",
        engine.junit_platform
    ))];
    let sets = [
        ("include engines", &engine.include_engines),
        ("exclude engines", &engine.exclude_engines),
        ("include tags", &engine.include_tags),
        ("exclude tags", &engine.exclude_tags),
    ];
    for (label, set) in sets {
        if !set.is_empty() {
            children.push(PrettyNode::leaf(format!("{label}: {}", join(set))));
        }
    }
    if !engine.events.is_empty() {
        children.push(PrettyNode::leaf(format!(
            "logged events: {}",
            join(&engine.events)
        )));
    }
    PrettyNode::branch("test engine", children)
}

fn option(option: &TaskOption) -> PrettyNode {
    match option {
        TaskOption::Flag(name) => PrettyNode::leaf(format!("{name}()")),
        TaskOption::Call { name, args } => {
            let args: Vec<_> = args.iter().map(|arg| arg.to_string()).collect();
            PrettyNode::leaf(format!("{name}({})", args.join(", ")))
        }
        TaskOption::Block { name, options } => {
            let children = options.iter().map(self::option).collect();
            PrettyNode::branch(name.as_str(), children)
        }
        TaskOption::Assign { name, value } => PrettyNode::leaf(format!("{name} = {value}")),
    }
}

impl ptree::TreeItem for PrettyNode {
    type Child = PrettyNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<[Self::Child]> {
        Cow::Borrowed(&self.children[..])
    }
}

impl fmt::Display for PrettyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        ptree::write_tree(self, &mut buf).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf[..]))
    }
}
