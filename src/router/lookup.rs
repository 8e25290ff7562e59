//! Request matching: depth-first search with backtracking over an explicit
//! frame stack.
//!
//! Alternatives are pushed in reverse priority (catch-all, param, static) so
//! the static branch is always explored first and a param or catch-all branch
//! is only tried once everything more specific below the same node failed.
//! Captures are recorded as byte ranges into the request path and are only
//! turned into owned values once a result is chosen.

// Hot path: no allocations here for the common case.
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;

use super::core::MAX_INLINE_PARAMS;
use super::node::{Endpoint, Endpoints, Node, NodeKind};

/// A parameter captured as a byte range of the searched path.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Capture<'r> {
    pub name: &'r Arc<str>,
    pub start: usize,
    pub end: usize,
}

pub(crate) type CaptureVec<'r> = SmallVec<[Capture<'r>; MAX_INLINE_PARAMS]>;

/// Raw outcome of one trie walk.
pub(crate) enum Search<'r, H> {
    Matched {
        endpoint: &'r Endpoint<H>,
        endpoints: &'r Endpoints<H>,
        captures: CaptureVec<'r>,
    },
    MethodNotAllowed {
        endpoints: &'r Endpoints<H>,
        captures: CaptureVec<'r>,
    },
    NotFound,
}

struct Frame<'r, H> {
    node: &'r Node<H>,
    pos: usize,
    captures: usize,
}

/// Walk the trie rooted at `root` for `path`.
///
/// A node that consumes the whole path but has no binding for `method` is
/// remembered and the search keeps backtracking; only if no other branch
/// serves the method is the remembered node reported as `MethodNotAllowed`.
pub(crate) fn search<'r, H>(
    root: &'r Node<H>,
    path: &str,
    method: Option<&Method>,
    case_sensitive: bool,
) -> Search<'r, H> {
    let bytes = path.as_bytes();
    let mut captures: CaptureVec<'r> = SmallVec::new();
    let mut stack: SmallVec<[Frame<'r, H>; 16]> = SmallVec::new();
    let mut not_allowed: Option<(&'r Endpoints<H>, CaptureVec<'r>)> = None;

    stack.push(Frame {
        node: root,
        pos: 0,
        captures: 0,
    });

    while let Some(frame) = stack.pop() {
        captures.truncate(frame.captures);
        let node = frame.node;
        let mut pos = frame.pos;

        match node.kind {
            NodeKind::Static => {
                if !prefix_matches(&bytes[pos..], &node.prefix, case_sensitive) {
                    continue;
                }
                pos += node.prefix.len();
            }
            NodeKind::Param => {
                let end = bytes[pos..]
                    .iter()
                    .position(|&b| b == b'/')
                    .map_or(bytes.len(), |offset| pos + offset);
                if end == pos {
                    continue;
                }
                if let Some(name) = node.param_name.as_ref() {
                    captures.push(Capture {
                        name,
                        start: pos,
                        end,
                    });
                }
                pos = end;
            }
            NodeKind::CatchAll => {
                if let Some(name) = node.param_name.as_ref() {
                    captures.push(Capture {
                        name,
                        start: pos,
                        end: bytes.len(),
                    });
                }
                pos = bytes.len();
            }
        }

        if pos == bytes.len() && !node.endpoints.is_empty() {
            match node.endpoints.get(method) {
                Some(endpoint) => {
                    return Search::Matched {
                        endpoint,
                        endpoints: &node.endpoints,
                        captures,
                    };
                }
                None => {
                    if not_allowed.is_none() {
                        not_allowed = Some((&node.endpoints, captures.clone()));
                    }
                }
            }
        }

        let depth = captures.len();
        if let Some(any) = node.any_child.as_deref() {
            stack.push(Frame {
                node: any,
                pos,
                captures: depth,
            });
        }
        if pos < bytes.len() {
            if let Some(param) = node.param_child.as_deref() {
                stack.push(Frame {
                    node: param,
                    pos,
                    captures: depth,
                });
            }
            let label = if case_sensitive {
                bytes[pos]
            } else {
                bytes[pos].to_ascii_lowercase()
            };
            if let Some(child) = node.static_child(label) {
                stack.push(Frame {
                    node: child,
                    pos,
                    captures: depth,
                });
            }
        }
    }

    match not_allowed {
        Some((endpoints, captures)) => Search::MethodNotAllowed {
            endpoints,
            captures,
        },
        None => Search::NotFound,
    }
}

/// `prefix` is stored lowercased when matching is case-insensitive.
#[inline]
fn prefix_matches(rest: &[u8], prefix: &[u8], case_sensitive: bool) -> bool {
    if rest.len() < prefix.len() {
        return false;
    }
    let head = &rest[..prefix.len()];
    if case_sensitive {
        head == prefix
    } else {
        head.eq_ignore_ascii_case(prefix)
    }
}
