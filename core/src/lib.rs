//! Fluent REST client builder.
//!
//! # Overview
//! A request is described by chaining path accessors that mirror the URL
//! and finished with a verb:
//!
//! ```no_run
//! use restproxy::{create, Options, UreqTransport};
//!
//! let api = create("http://api.test", Options::new())?;
//! let response = api
//!     .call("users", [123])
//!     .header("X-Trace", "abc")
//!     .get()
//!     .end(&UreqTransport::new())?;
//! println!("{}", response.body);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Design
//! - `Node` is an immutable path + header overlay; every accessor returns a
//!   new node, so branches never share mutable state.
//! - `Node::resolve` is the dynamic entry point: a name that is (or aliases
//!   to) `get`/`put`/`post`/`delete` yields an `Action`, `header` yields a
//!   setter, anything else a path segment.
//! - `Action` is the pending request. `build` returns plain data, `end` and
//!   `end_with` dispatch through a `Transport`. All I/O lives behind that
//!   trait; `UreqTransport` is the default.

pub mod action;
pub mod config;
pub mod error;
pub mod http;
pub mod node;
pub mod path;
pub mod transport;

pub use action::Action;
pub use config::{Config, Options, DEFAULT_HEADERS, DEFAULT_METHOD_ALIASES};
pub use error::{ConfigurationError, TransportError};
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse};
pub use node::{Access, HeaderSetter, Node};
pub use transport::{Transport, UreqTransport};

/// Build the root node for `base`.
pub fn create(base: &str, options: Options) -> Result<Node, ConfigurationError> {
    Config::new(base, options).map(Node::root)
}

/// Build the root node from a JSON document
/// `{ "base": "...", "methodAliases": { ... }, "headers": { ... } }`.
pub fn create_from_value(value: &serde_json::Value) -> Result<Node, ConfigurationError> {
    Config::from_value(value).map(Node::root)
}

/// Chain path segments onto a node, mirroring the URL.
///
/// `chain!(api, users(42), posts)` is `api.call("users", [42]).path("posts")`.
/// Every identifier becomes a segment, including verb aliases; finish with
/// an explicit verb method.
#[macro_export]
macro_rules! chain {
    ($node:expr $(, $segment:ident $(( $($arg:expr),* ))? )*) => {{
        let node: $crate::Node = ::std::clone::Clone::clone(&$node);
        $(
            let node = node.call(stringify!($segment), {
                #[allow(unused_mut)]
                let mut args: ::std::vec::Vec<::std::string::String> = ::std::vec::Vec::new();
                $($( args.push(::std::string::ToString::to_string(&$arg)); )*)?
                args
            });
        )*
        node
    }};
}
