//! Text patching of the routing file.
//!
//! Route declarations are single lines placed right after a sentinel line:
//!
//! ```text
//! ActionController::Routing::Routes.draw do |map|
//!   map.resources :widgets, member: {move_lower: put, move_higher: put}
//! ```
//!
//! Both operations work on the whole file text and return new text; writing
//! it back is left to the caller.

use std::fmt;
use std::path::{Path, PathBuf};

use hamlet_core::config::DEFAULT_ROUTES_SENTINEL;
use hamlet_core::{HamletError, Result, RouteInsertMode};
use tracing::debug;

/// Member actions added for models ordered by a `position` column.
pub const POSITION_MEMBER_ROUTES: &str = "move_lower: put, move_higher: put";

const DECLARATION_PREFIX: &str = "  map.resources :";

/// One resource declaration: identifier plus optional member actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub resource: String,
    pub member_options: Option<String>,
}

impl RouteEntry {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            member_options: None,
        }
    }

    pub fn with_member_options(mut self, member_options: Option<impl Into<String>>) -> Self {
        self.member_options = member_options
            .map(Into::into)
            .filter(|options: &String| !options.trim().is_empty());
        self
    }

    /// The full line written to the routing file.
    pub fn declaration(&self) -> String {
        format!("{}{}", DECLARATION_PREFIX, self)
    }
}

impl fmt::Display for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.member_options {
            Some(options) => write!(f, "{}, member: {{{}}}", self.resource, options),
            None => write!(f, "{}", self.resource),
        }
    }
}

/// Inserts and removes route declarations after a sentinel line
#[derive(Debug, Clone)]
pub struct RoutePatcher {
    sentinel: String,
    insert_mode: RouteInsertMode,
    path: PathBuf,
}

impl RoutePatcher {
    pub fn new(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
            insert_mode: RouteInsertMode::default(),
            path: PathBuf::from("config/routes.rb"),
        }
    }

    pub fn with_insert_mode(mut self, insert_mode: RouteInsertMode) -> Self {
        self.insert_mode = insert_mode;
        self
    }

    /// Path reported in errors.
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Returns `file_text` with the entry's declaration right after the sentinel.
    pub fn add_route(&self, file_text: &str, entry: &RouteEntry) -> Result<String> {
        let sentinel_end = self.locate_sentinel(file_text)?;
        let declaration = entry.declaration();

        if self.insert_mode == RouteInsertMode::Unique
            && file_text.lines().any(|line| line == declaration)
        {
            debug!(route = %entry, "route already declared, leaving routing file unchanged");
            return Ok(file_text.to_string());
        }

        let mut patched = String::with_capacity(file_text.len() + declaration.len() + 1);
        match sentinel_end {
            LineEnd::Newline(newline) => {
                patched.push_str(&file_text[..=newline]);
                patched.push_str(&declaration);
                patched.push('\n');
                patched.push_str(&file_text[newline + 1..]);
            }
            LineEnd::EndOfText => {
                patched.push_str(file_text);
                patched.push('\n');
                patched.push_str(&declaration);
            }
        }

        Ok(patched)
    }

    /// Removes one declaration exactly as [`RoutePatcher::add_route`] wrote it.
    ///
    /// Returns the text unchanged when there is nothing to remove.
    pub fn remove_route(&self, file_text: &str, entry: &RouteEntry) -> String {
        let declaration = entry.declaration();
        let lines = line_spans(file_text);

        let sentinel_line = lines
            .iter()
            .position(|span| span.content(file_text).contains(&self.sentinel));
        let is_match = |span: &&LineSpan| span.content(file_text) == declaration;

        let target = sentinel_line
            .and_then(|sentinel| lines[sentinel + 1..].iter().find(is_match))
            .or_else(|| lines.iter().find(is_match));

        let Some(span) = target else {
            debug!(route = %entry, "route not declared, nothing to remove");
            return file_text.to_string();
        };

        if span.has_newline {
            format!("{}{}", &file_text[..span.start], &file_text[span.end + 1..])
        } else {
            // Last line without a trailing newline: drop the newline before it.
            let start = span.start.saturating_sub(1);
            file_text[..start].to_string()
        }
    }

    /// Resource declarations currently listed after the sentinel.
    pub fn list_routes(&self, file_text: &str) -> Result<Vec<String>> {
        let sentinel_end = self.locate_sentinel(file_text)?;
        let after = match sentinel_end {
            LineEnd::Newline(newline) => &file_text[newline + 1..],
            LineEnd::EndOfText => "",
        };

        Ok(after
            .lines()
            .filter_map(|line| line.trim_start().strip_prefix("map.resources :"))
            .map(|declaration| declaration.trim_end().to_string())
            .collect())
    }

    fn locate_sentinel(&self, file_text: &str) -> Result<LineEnd> {
        let mut matches = file_text.match_indices(self.sentinel.as_str());
        let Some((start, _)) = matches.next() else {
            return Err(HamletError::SentinelNotFound {
                path: self.path.clone(),
                sentinel: self.sentinel.clone(),
            });
        };

        let extra = matches.count();
        if extra > 0 {
            return Err(HamletError::AmbiguousSentinel {
                path: self.path.clone(),
                sentinel: self.sentinel.clone(),
                count: extra + 1,
            });
        }

        Ok(match file_text[start..].find('\n') {
            Some(offset) => LineEnd::Newline(start + offset),
            None => LineEnd::EndOfText,
        })
    }
}

impl Default for RoutePatcher {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTES_SENTINEL)
    }
}

enum LineEnd {
    Newline(usize),
    EndOfText,
}

/// Byte range of one line, excluding its `\n`.
struct LineSpan {
    start: usize,
    end: usize,
    has_newline: bool,
}

impl LineSpan {
    fn content<'t>(&self, text: &'t str) -> &'t str {
        text[self.start..self.end].trim_end_matches('\r')
    }
}

fn line_spans(text: &str) -> Vec<LineSpan> {
    let mut spans = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices('\n') {
        spans.push(LineSpan {
            start,
            end: idx,
            has_newline: true,
        });
        start = idx + 1;
    }
    if start < text.len() {
        spans.push(LineSpan {
            start,
            end: text.len(),
            has_newline: false,
        });
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTES: &str = "ActionController::Routing::Routes.draw do |map|\n  map.resources :users\n\n  map.root :controller => 'home'\nend\n";

    fn positioned() -> RouteEntry {
        RouteEntry::new("widgets").with_member_options(Some(POSITION_MEMBER_ROUTES))
    }

    #[test]
    fn test_route_entry_display() {
        assert_eq!(RouteEntry::new("widgets").to_string(), "widgets");
        assert_eq!(
            positioned().to_string(),
            "widgets, member: {move_lower: put, move_higher: put}"
        );
        assert_eq!(
            RouteEntry::new("widgets").with_member_options(Some("  ")).member_options,
            None
        );
    }

    #[test]
    fn test_add_route_inserts_after_sentinel() {
        let patcher = RoutePatcher::default();
        let patched = patcher.add_route(ROUTES, &RouteEntry::new("widgets")).unwrap();
        assert_eq!(
            patched,
            "ActionController::Routing::Routes.draw do |map|\n  map.resources :widgets\n  map.resources :users\n\n  map.root :controller => 'home'\nend\n"
        );
    }

    #[test]
    fn test_add_route_with_member_options() {
        let patcher = RoutePatcher::default();
        let patched = patcher.add_route(ROUTES, &positioned()).unwrap();
        assert!(patched.contains(
            "\n  map.resources :widgets, member: {move_lower: put, move_higher: put}\n"
        ));
    }

    #[test]
    fn test_round_trip() {
        let patcher = RoutePatcher::default();
        for entry in [RouteEntry::new("widgets"), positioned(), RouteEntry::new("users")] {
            let added = patcher.add_route(ROUTES, &entry).unwrap();
            assert_eq!(patcher.remove_route(&added, &entry), ROUTES);
        }
    }

    #[test]
    fn test_round_trip_sentinel_on_last_line() {
        let patcher = RoutePatcher::default();
        let text = "# routes\nActionController::Routing::Routes.draw do |map|";
        let entry = RouteEntry::new("widgets");
        let added = patcher.add_route(text, &entry).unwrap();
        assert_eq!(
            added,
            "# routes\nActionController::Routing::Routes.draw do |map|\n  map.resources :widgets"
        );
        assert_eq!(patcher.remove_route(&added, &entry), text);
    }

    #[test]
    fn test_remove_without_member_options_does_not_match() {
        let patcher = RoutePatcher::default();
        let added = patcher.add_route(ROUTES, &positioned()).unwrap();
        let removed = patcher.remove_route(&added, &RouteEntry::new("widgets"));
        assert_eq!(removed, added);
        assert_ne!(removed, ROUTES);
    }

    #[test]
    fn test_remove_missing_route_is_noop() {
        let patcher = RoutePatcher::default();
        assert_eq!(patcher.remove_route(ROUTES, &RouteEntry::new("widgets")), ROUTES);
        assert_eq!(patcher.remove_route("", &RouteEntry::new("widgets")), "");
    }

    #[test]
    fn test_missing_sentinel() {
        let patcher = RoutePatcher::default().with_path("config/routes.rb");
        let result = patcher.add_route("Rails.application.routes.draw do\nend\n", &RouteEntry::new("widgets"));
        match result {
            Err(HamletError::SentinelNotFound { path, sentinel }) => {
                assert_eq!(path, PathBuf::from("config/routes.rb"));
                assert_eq!(sentinel, DEFAULT_ROUTES_SENTINEL);
            }
            other => panic!("expected SentinelNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_sentinel() {
        let patcher = RoutePatcher::default();
        let text = format!("{}{}", ROUTES, ROUTES);
        assert!(matches!(
            patcher.add_route(&text, &RouteEntry::new("widgets")),
            Err(HamletError::AmbiguousSentinel { count: 2, .. })
        ));
    }

    #[test]
    fn test_always_mode_duplicates() {
        let patcher = RoutePatcher::default();
        let entry = RouteEntry::new("widgets");
        let once = patcher.add_route(ROUTES, &entry).unwrap();
        let twice = patcher.add_route(&once, &entry).unwrap();
        assert_eq!(twice.matches("map.resources :widgets\n").count(), 2);

        // Each removal takes one declaration back out.
        let removed = patcher.remove_route(&twice, &entry);
        assert_eq!(removed, once);
    }

    #[test]
    fn test_unique_mode_is_idempotent() {
        let patcher = RoutePatcher::default().with_insert_mode(RouteInsertMode::Unique);
        let entry = RouteEntry::new("widgets");
        let once = patcher.add_route(ROUTES, &entry).unwrap();
        let twice = patcher.add_route(&once, &entry).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_prefers_line_after_sentinel() {
        let patcher = RoutePatcher::default();
        let text = "#  map.resources :widgets\n  map.resources :widgets\nActionController::Routing::Routes.draw do |map|\nend\n";
        let entry = RouteEntry::new("widgets");
        let added = patcher.add_route(text, &entry).unwrap();
        assert_eq!(patcher.remove_route(&added, &entry), text);
    }

    #[test]
    fn test_crlf_line_endings() {
        let patcher = RoutePatcher::default();
        let text = "ActionController::Routing::Routes.draw do |map|\r\nend\r\n";
        let entry = RouteEntry::new("widgets");
        let added = patcher.add_route(text, &entry).unwrap();
        assert_eq!(patcher.remove_route(&added, &entry), text);
    }

    #[test]
    fn test_list_routes() {
        let patcher = RoutePatcher::default();
        let patched = patcher.add_route(ROUTES, &positioned()).unwrap();
        assert_eq!(
            patcher.list_routes(&patched).unwrap(),
            vec![
                "widgets, member: {move_lower: put, move_higher: put}".to_string(),
                "users".to_string()
            ]
        );
    }
}
