//! Ordered route table.
//!
//! A pattern is a `/`-separated list of segments:
//! - `hello` matches the literal text, character for character;
//! - `:name` matches exactly one non-empty segment and binds it to `name`;
//! - `:name(*)`, only as the last segment, matches the non-empty remainder of
//!   the path, slashes included.
//!
//! Routes are tried in registration order and the first match wins.
use actix_web::http::Method;
use actix_web::web;
use std::borrow::Cow;
use std::collections::HashMap;

const SPLAT_SUFFIX: &str = "(*)";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RoutePatternError {
    #[error("Route pattern `{0}` must start with '/'")]
    MissingLeadingSlash(String),
    #[error("Route pattern `{0}` contains a parameter without a name")]
    EmptyParameterName(String),
    #[error("Route pattern `{0}` has a splat parameter before its last segment")]
    MisplacedSplat(String),
    #[error("Route pattern `{pattern}` binds `{name}` more than once")]
    DuplicateParameter { pattern: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Splat(String),
}

#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<PathPattern, RoutePatternError> {
        let rest = pattern
            .strip_prefix('/')
            .ok_or_else(|| RoutePatternError::MissingLeadingSlash(pattern.to_string()))?;

        let raw_segments: Vec<&str> = rest.split('/').collect();
        let last = raw_segments.len() - 1;
        let mut names: Vec<&str> = Vec::new();
        let mut segments = Vec::with_capacity(raw_segments.len());

        for (position, raw_segment) in raw_segments.into_iter().enumerate() {
            let name = match raw_segment.strip_prefix(':') {
                Some(name) => name,
                None => {
                    segments.push(Segment::Literal(raw_segment.to_string()));
                    continue;
                }
            };

            let (name, is_splat) = match name.strip_suffix(SPLAT_SUFFIX) {
                Some(name) => (name, true),
                None => (name, false),
            };
            if name.is_empty() {
                return Err(RoutePatternError::EmptyParameterName(pattern.to_string()));
            }
            if is_splat && position != last {
                return Err(RoutePatternError::MisplacedSplat(pattern.to_string()));
            }
            if names.contains(&name) {
                return Err(RoutePatternError::DuplicateParameter {
                    pattern: pattern.to_string(),
                    name: name.to_string(),
                });
            }
            names.push(name);

            segments.push(if is_splat {
                Segment::Splat(name.to_string())
            } else {
                Segment::Param(name.to_string())
            });
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn ends_with_splat(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Splat(_)))
    }

    /// Match `path` (without query string), returning the bound parameters.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let mut rest = path.strip_prefix('/')?;
        // A single trailing slash is tolerated, except where a splat would capture it
        // and where it would leave nothing behind (`//`)
        if !self.ends_with_splat() {
            if let Some(stripped) = rest.strip_suffix('/').filter(|r| !r.is_empty()) {
                rest = stripped;
            }
        }

        let mut params = Params::default();
        let mut remaining = Some(rest);
        for segment in &self.segments {
            match segment {
                Segment::Splat(name) => {
                    let captured = remaining.filter(|r| !r.is_empty())?;
                    params.insert(name, decode(captured));
                    return Some(params);
                }
                Segment::Literal(literal) => {
                    let (head, tail) = split_first_segment(remaining?);
                    if head != literal {
                        return None;
                    }
                    remaining = tail;
                }
                Segment::Param(name) => {
                    let (head, tail) = split_first_segment(remaining?);
                    if head.is_empty() {
                        return None;
                    }
                    params.insert(name, decode(head));
                    remaining = tail;
                }
            }
        }

        // Every path segment must have been consumed
        match remaining {
            None => Some(params),
            Some(_) => None,
        }
    }
}

fn split_first_segment(path: &str) -> (&str, Option<&str>) {
    match path.split_once('/') {
        Some((head, tail)) => (head, Some(tail)),
        None => (path, None),
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// Parameters bound by a path pattern, in pattern order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn insert(&mut self, name: &str, value: String) {
        self.0.push((name.to_string(), value));
    }
}

/// Query string parameters, parsed independently of the path.
#[derive(Debug, Default, Clone)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    /// A query string that cannot be decoded yields no parameters.
    /// Repeated keys keep every value, joined with `,` (`aa=1&aa=2` -> `1,2`).
    pub fn parse(query_string: &str) -> QueryParams {
        let pairs = match web::Query::<Vec<(String, String)>>::from_query(query_string) {
            Ok(query) => query.into_inner(),
            Err(_) => return Self::default(),
        };

        let mut params: HashMap<String, String> = HashMap::new();
        for (key, value) in pairs {
            params
                .entry(key)
                .and_modify(|existing| {
                    existing.push(',');
                    existing.push_str(&value);
                })
                .or_insert(value);
        }
        Self(params)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

struct Route<H> {
    method: Method,
    pattern: PathPattern,
    handler: H,
}

#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    pub handler: &'a H,
    pub pattern: &'a PathPattern,
    pub params: Params,
}

pub struct RouteTable<H> {
    routes: Vec<Route<H>>,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, method: Method, pattern: &str, handler: H) -> Result<Self, RoutePatternError> {
        let pattern = PathPattern::parse(pattern)?;
        self.routes.push(Route {
            method,
            pattern,
            handler,
        });
        Ok(self)
    }

    pub fn get(self, pattern: &str, handler: H) -> Result<Self, RoutePatternError> {
        self.route(Method::GET, pattern, handler)
    }

    pub fn post(self, pattern: &str, handler: H) -> Result<Self, RoutePatternError> {
        self.route(Method::POST, pattern, handler)
    }

    pub fn find(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, H>> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                route.pattern.matches(path).map(|params| RouteMatch {
                    handler: &route.handler,
                    pattern: &route.pattern,
                    params,
                })
            })
    }
}
