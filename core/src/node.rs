//! Builder nodes: accumulated path plus per-branch header state.
//!
//! # Design
//! A `Node` is an immutable value. Extending the path, adding a header or
//! attaching request headers returns a new node; the receiver is left as
//! it was. Two siblings built from the same parent therefore never see each
//! other's headers.
//!
//! `resolve` is the dynamic entry point. It decides between a verb, the
//! `header` setter and a path segment purely from the alias table, so a
//! resource named like a verb alias (`fetch`, `remove`, ...) is only
//! reachable through the explicit `path` / `call` methods.
//!
//! The explicit `get`/`put`/`post`/`delete` methods always dispatch their
//! own verb. Only `resolve` and `verb` consult the alias table, so remapping
//! a canonical name in `methodAliases` affects the dynamic path alone.
//!
//! Children of the root start with an empty header overlay: headers set on
//! the root apply to requests dispatched from the root itself, while every
//! top-level branch begins from the configured defaults.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::action::Action;
use crate::config::Config;
use crate::http::{Headers, HttpMethod};
use crate::path;

/// Result of resolving a member name on a node.
#[derive(Debug, Clone)]
pub enum Access {
    /// The name is a verb or an alias of one.
    Verb(Action),
    /// The reserved `header` name.
    Header(HeaderSetter),
    /// Any other name: a child node with the name appended to the path.
    Segment(Node),
}

impl Access {
    pub fn into_action(self) -> Option<Action> {
        match self {
            Access::Verb(action) => Some(action),
            _ => None,
        }
    }

    pub fn into_node(self) -> Option<Node> {
        match self {
            Access::Segment(node) => Some(node),
            _ => None,
        }
    }

    pub fn into_header_setter(self) -> Option<HeaderSetter> {
        match self {
            Access::Header(setter) => Some(setter),
            _ => None,
        }
    }
}

/// Returned for the `header` name; applies one header to the node.
#[derive(Debug, Clone)]
pub struct HeaderSetter {
    node: Node,
}

impl HeaderSetter {
    pub fn set(self, name: impl Into<String>, value: impl Into<String>) -> Node {
        self.node.header(name, value)
    }
}

/// Accumulated path and header state for one branch of the API.
#[derive(Debug, Clone)]
pub struct Node {
    config: Arc<Config>,
    path: String,
    overlay: Headers,
    request_headers: Option<Headers>,
    root: bool,
}

impl Node {
    pub(crate) fn root(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            path: String::new(),
            overlay: Headers::new(),
            request_headers: None,
            root: true,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Accumulated path relative to the base; empty at the root.
    pub fn pathname(&self) -> &str {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Headers set on this branch with `header`.
    pub fn overlay(&self) -> &Headers {
        &self.overlay
    }

    /// Append one segment.
    pub fn path(&self, segment: impl fmt::Display) -> Node {
        self.call(segment, std::iter::empty::<&str>())
    }

    /// Append `name` followed by each of `args`, all stringified.
    pub fn call<I>(&self, name: impl fmt::Display, args: I) -> Node
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let mut segments = vec![self.path.clone(), name.to_string()];
        segments.extend(args.into_iter().map(|arg| arg.to_string()));
        let path = path::join(&segments);

        let overlay = if self.root {
            Headers::new()
        } else {
            self.overlay.clone()
        };
        trace!(parent = %self.path, path = %path, "extended path");

        Node {
            config: Arc::clone(&self.config),
            path,
            overlay,
            request_headers: None,
            root: false,
        }
    }

    /// Resolve a member name: verb, `header` setter or path segment.
    pub fn resolve(&self, name: &str) -> Access {
        self.resolve_with(name, std::iter::empty::<&str>())
    }

    /// Like `resolve`, with call arguments appended when the name turns
    /// out to be a path segment. Arguments are ignored for verbs and for
    /// `header`.
    pub fn resolve_with<I>(&self, name: &str, args: I) -> Access
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        if let Some(method) = self.config.resolve_method(name) {
            return Access::Verb(self.action(method));
        }
        if name == "header" {
            return Access::Header(HeaderSetter { node: self.clone() });
        }
        Access::Segment(self.call(name, args))
    }

    /// A copy of this node with `name: value` added to its overlay. The
    /// header applies to this node and everything built from the copy.
    pub fn header(&self, name: impl Into<String>, value: impl Into<String>) -> Node {
        let mut node = self.clone();
        node.overlay.insert(name, value);
        node
    }

    /// A copy of this node carrying headers that apply to requests
    /// dispatched from it only; children do not inherit them.
    pub fn request_headers<I, K, V>(&self, headers: I) -> Node
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut node = self.clone();
        node.request_headers = Some(headers.into_iter().collect());
        node
    }

    /// Bind this node to `method`.
    pub fn action(&self, method: HttpMethod) -> Action {
        let mut headers = self.config.headers().clone();
        headers.merge(&self.overlay);
        if let Some(request_headers) = &self.request_headers {
            headers.merge(request_headers);
        }
        let url = self.config.resolve_url(&self.path);
        Action::new(method, self.path.clone(), url, headers)
    }

    /// Bind this node to the verb `name` maps to, through the alias table.
    pub fn verb(&self, name: &str) -> Option<Action> {
        self.config.resolve_method(name).map(|method| self.action(method))
    }

    /// Canonical GET. Like `put`, `post` and `delete`, this bypasses the
    /// alias table even when `methodAliases` remaps `get`; use `verb` or
    /// `resolve` for alias-aware dispatch.
    pub fn get(&self) -> Action {
        self.action(HttpMethod::Get)
    }

    pub fn put(&self) -> Action {
        self.action(HttpMethod::Put)
    }

    pub fn post(&self) -> Action {
        self.action(HttpMethod::Post)
    }

    pub fn delete(&self) -> Action {
        self.action(HttpMethod::Delete)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.config.resolve_url(&self.path) {
            Ok(url) => write!(f, "{url}"),
            Err(_) => write!(f, "{}/{}", self.config.base(), self.path),
        }
    }
}
