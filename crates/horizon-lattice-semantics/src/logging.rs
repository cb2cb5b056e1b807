//! Logging and debugging facilities.
//!
//! This module provides:
//! - Target and span names for filtering this crate's `tracing` output
//! - [`PerfSpan`], a guard wrapped around each frame pass
//! - [`SemanticsTreeDebug`], a textual dump of a [`SemanticsTree`]
//!
//! # Tracing Integration
//!
//! Install any `tracing` subscriber to see logs. Frame passes log counts at
//! `debug`, emitted events at `trace`, and producer errors (duplicate ids) at
//! `warn`.
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_lattice_semantics::diff=trace")
//!     .init();
//! ```

use std::fmt::{self, Write as FmtWrite};

use crate::node::{NodeKey, SemanticsTree};

/// Span names used for tracing.
pub mod span_names {
    /// One full frame pass of the delegate.
    pub const FRAME_PASS: &str = "horizon_lattice_semantics::frame_pass";
    /// One occlusion walk.
    pub const OCCLUSION: &str = "horizon_lattice_semantics::occlusion";
}

/// `tracing` targets, one per component.
pub mod targets {
    /// Tree construction target.
    pub const TREE: &str = "horizon_lattice_semantics::tree";
    /// Occlusion walker target.
    pub const OCCLUSION: &str = "horizon_lattice_semantics::occlusion";
    /// Diff engine and event synthesis target.
    pub const DIFF: &str = "horizon_lattice_semantics::diff";
    /// Structural capture buffers target.
    pub const CAPTURE: &str = "horizon_lattice_semantics::capture";
    /// Delegate lifecycle target.
    pub const DELEGATE: &str = "horizon_lattice_semantics::delegate";
    /// Performance spans target.
    pub const PERF: &str = "horizon_lattice_semantics::perf";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// `|`, `+--` and `` `-- `` branches.
    Ascii,
    /// Box-drawing branches.
    #[default]
    Unicode,
    /// Dashes only, no vertical guides.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// Branch characters.
    pub style: TreeStyle,
    /// Whether to show declared bounds.
    pub show_bounds: bool,
    /// Whether to list each node's property keys.
    pub show_properties: bool,
    /// Deepest level printed; `None` prints everything.
    pub max_depth: Option<usize>,
    /// Spaces per nesting level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_bounds: true,
            show_properties: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_properties: true,
            ..Default::default()
        }
    }

    /// Options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_bounds: false,
            show_properties: false,
            ..Default::default()
        }
    }
}

/// Debug utility for visualizing a semantics tree.
#[derive(Debug, Clone)]
pub struct SemanticsTreeDebug<'a> {
    tree: &'a SemanticsTree,
    options: TreeFormatOptions,
}

impl<'a> SemanticsTreeDebug<'a> {
    /// Create a visualizer with default options.
    pub fn new(tree: &'a SemanticsTree) -> Self {
        Self::with_options(tree, TreeFormatOptions::default())
    }

    /// Create a visualizer with custom options.
    pub fn with_options(tree: &'a SemanticsTree, options: TreeFormatOptions) -> Self {
        Self { tree, options }
    }

    /// Format the whole tree.
    pub fn format_tree(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "Semantics Tree ({} nodes):", self.tree.len());
        match self.tree.root() {
            Some(root) => self.format_subtree_into(root, 0, true, &mut output),
            None => output.push_str("  (empty)\n"),
        }
        output
    }

    /// Format the subtree rooted at `key`.
    pub fn format_subtree(&self, key: NodeKey) -> String {
        let mut output = String::new();
        self.format_subtree_into(key, 0, true, &mut output);
        output
    }

    fn format_subtree_into(&self, key: NodeKey, depth: usize, is_last: bool, output: &mut String) {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return;
        }
        let Some(node) = self.tree.get(key) else {
            return;
        };

        output.push_str(&self.build_prefix(depth, is_last));
        let _ = write!(output, "{}", node.id());

        if let Some(role) = node.properties().role() {
            let _ = write!(output, " <{role:?}>");
        }
        if node.merges_descendants() {
            output.push_str(" (merged)");
        }
        if !node.is_placed() {
            output.push_str(" (not placed)");
        }
        if self.options.show_bounds {
            let b = node.bounds();
            let _ = write!(
                output,
                " [{}, {}, {}x{}]",
                b.left(),
                b.top(),
                b.width(),
                b.height()
            );
        }
        output.push('\n');

        if self.options.show_properties && !node.properties().is_empty() {
            let prop_prefix = self.build_property_prefix(depth);
            for key in node.properties().keys() {
                let _ = writeln!(output, "{prop_prefix}  .{key}");
            }
        }

        let children = self.tree.children(key);
        let child_count = children.len();
        for (i, &child) in children.iter().enumerate() {
            self.format_subtree_into(child, depth + 1, i + 1 == child_count, output);
        }
    }

    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, corner, last) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => (
                "\u{2502}",
                "\u{251c}\u{2500}\u{2500}",
                "\u{2514}\u{2500}\u{2500}",
            ),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            prefix.extend(std::iter::repeat_n(' ', self.options.indent_size));
        }
        prefix.push_str(if is_last { last } else { corner });
        prefix.push(' ');
        prefix
    }

    fn build_property_prefix(&self, depth: usize) -> String {
        let branch = match self.options.style {
            TreeStyle::Ascii => "|",
            TreeStyle::Unicode => "\u{2502}",
            TreeStyle::Compact => "",
        };

        let mut prefix = String::new();
        for _ in 0..depth {
            prefix.push_str(branch);
            prefix.extend(std::iter::repeat_n(' ', self.options.indent_size));
        }
        prefix
    }
}

impl fmt::Display for SemanticsTreeDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_tree())
    }
}

/// A guard that keeps a tracing span entered until dropped.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a new performance span for `operation`.
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::debug_span!(target: targets::PERF, "perf", operation);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::node::SemanticsNode;
    use crate::role::Role;

    fn tree() -> SemanticsTree {
        let (mut tree, root) = SemanticsTree::with_root(
            SemanticsNode::new(1).with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0)),
        );
        tree.push_child(root, SemanticsNode::new(2).with_role(Role::Button).with_text("OK"))
            .unwrap();
        tree.push_child(root, SemanticsNode::new(3).merging_descendants())
            .unwrap();
        tree
    }

    #[test]
    fn test_format_empty() {
        let tree = SemanticsTree::new();
        let output = SemanticsTreeDebug::new(&tree).format_tree();
        assert!(output.contains("(empty)"));
    }

    #[test]
    fn test_format_hierarchy() {
        let tree = tree();
        let output = SemanticsTreeDebug::new(&tree).format_tree();

        assert!(output.contains("3 nodes"));
        assert!(output.contains("#1 [0, 0, 100x100]"));
        assert!(output.contains("#2 <Button>"));
        assert!(output.contains("#3 (merged)"));
    }

    #[test]
    fn test_format_properties() {
        let tree = tree();
        let output =
            SemanticsTreeDebug::with_options(&tree, TreeFormatOptions::detailed()).format_tree();
        assert!(output.contains(".Text"));
        assert!(output.contains(".Role"));
    }

    #[test]
    fn test_format_minimal_hides_bounds() {
        let tree = tree();
        let output =
            SemanticsTreeDebug::with_options(&tree, TreeFormatOptions::minimal()).format_tree();
        assert!(!output.contains("100x100"));
    }

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new("test_operation");
    }
}
