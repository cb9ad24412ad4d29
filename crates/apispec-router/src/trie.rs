use std::collections::{BTreeMap, HashMap};

/// Endpoint routing trie keyed by path segments.
#[derive(Debug, Default)]
pub struct Router {
    root: Node,
}

#[derive(Debug, Default)]
struct Node {
    /// Literal segments below this node.
    literals: HashMap<String, Node>,
    /// `{name}` segment below this node. A node holds at most one.
    param: Option<Box<ParamNode>>,
    /// Endpoints terminating here, keyed by uppercase method.
    endpoints: BTreeMap<String, RouteEntry>,
}

#[derive(Debug)]
struct ParamNode {
    name: String,
    node: Node,
}

/// What a registered (template, method) pair resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Index of the endpoint in the owning registry.
    pub endpoint_index: usize,
    /// The path template the endpoint was registered under.
    pub template: String,
}

/// Outcome of resolving a request.
#[derive(Debug, PartialEq, Eq)]
pub enum RouteMatch {
    /// The path and method both matched a registered endpoint.
    Found {
        entry: RouteEntry,
        params: Vec<(String, String)>,
    },
    /// The path matched but the endpoint does not accept the method.
    MethodNotAllowed { allowed: Vec<String> },
    /// No registered template matches the path.
    NotFound,
}

enum TemplateSegment<'a> {
    Literal(&'a str),
    Param(&'a str),
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `method` on a path template such as `/users/{id}/orders`.
    ///
    /// The method is stored uppercase. Registering the same pair twice keeps
    /// the latest entry.
    pub fn insert(&mut self, template: &str, method: &str, entry: RouteEntry) {
        let mut node = &mut self.root;
        for segment in template_segments(template) {
            node = match segment {
                TemplateSegment::Literal(literal) => {
                    node.literals.entry(literal.to_string()).or_default()
                }
                TemplateSegment::Param(name) => {
                    let param = node.param.get_or_insert_with(|| {
                        Box::new(ParamNode {
                            name: name.to_string(),
                            node: Node::default(),
                        })
                    });
                    &mut param.node
                }
            };
        }
        node.endpoints.insert(method.to_ascii_uppercase(), entry);
    }

    /// Resolve a concrete request path and method.
    pub fn lookup(&self, path: &str, method: &str) -> RouteMatch {
        let normalized = normalize_path(path);
        let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

        let mut params = Vec::new();
        let Some(node) = resolve(&self.root, &segments, &mut params) else {
            return RouteMatch::NotFound;
        };

        match node.endpoints.get(&method.to_ascii_uppercase()) {
            Some(entry) => RouteMatch::Found {
                entry: entry.clone(),
                params,
            },
            None if node.endpoints.is_empty() => RouteMatch::NotFound,
            // BTreeMap keys are already sorted.
            None => RouteMatch::MethodNotAllowed {
                allowed: node.endpoints.keys().cloned().collect(),
            },
        }
    }

    /// Methods registered on the endpoint serving `path`, if any.
    pub fn allowed_methods(&self, path: &str) -> Vec<String> {
        let normalized = normalize_path(path);
        let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Vec::new();
        resolve(&self.root, &segments, &mut params)
            .map(|node| node.endpoints.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// Walk the trie depth-first. Literal children are tried before the
/// parameter child, and a failed parameter branch is backtracked.
fn resolve<'a>(
    node: &'a Node,
    segments: &[&str],
    params: &mut Vec<(String, String)>,
) -> Option<&'a Node> {
    let Some((head, rest)) = segments.split_first() else {
        return Some(node);
    };

    if let Some(found) = node
        .literals
        .get(*head)
        .and_then(|child| resolve(child, rest, params))
    {
        return Some(found);
    }

    let param = node.param.as_ref()?;
    let mark = params.len();
    params.push((param.name.clone(), (*head).to_string()));
    match resolve(&param.node, rest, params) {
        Some(found) => Some(found),
        None => {
            params.truncate(mark);
            None
        }
    }
}

fn template_segments(template: &str) -> impl Iterator<Item = TemplateSegment<'_>> {
    template.split('/').filter(|s| !s.is_empty()).map(|s| {
        match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => TemplateSegment::Param(name),
            None => TemplateSegment::Literal(s),
        }
    })
}

/// Collapse repeated slashes and drop a trailing slash. The root stays `/`.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        normalized.push('/');
        normalized.push_str(segment);
    }
    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}
