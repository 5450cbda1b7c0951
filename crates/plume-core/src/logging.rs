//! Logging and debugging facilities for Plume.
//!
//! This module provides:
//! - Target names for filtering `tracing` output per subsystem
//! - Debug visualization for element trees
//! - A performance span guard for profiling
//!
//! # Tracing Integration
//!
//! Plume uses the `tracing` crate for instrumentation and never installs a
//! subscriber itself. To see logs, install one in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("plume=debug,plume_style=warn")
//!     .init();
//! ```
//!
//! # Debug Visualization
//!
//! ```ignore
//! use plume_core::logging::ElementTreeDebug;
//!
//! let debug = ElementTreeDebug::new();
//! println!("{}", debug.format_subtree(&tree, root, |w| w.class_name().to_string())?);
//! ```

use std::fmt::Write as FmtWrite;

use crate::tree::{NodeId, Tree, TreeResult};

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Arena tree structure changes.
    pub const TREE: &str = "plume_core::tree";
    /// Message dispatch into widgets.
    pub const DISPATCH: &str = "plume::dispatch";
    /// Input routing, hover and focus.
    pub const INPUT: &str = "plume::input";
    /// Drawing traversal.
    pub const DRAW: &str = "plume::draw";
    /// Skin parsing, writing and application.
    pub const SKIN: &str = "plume_style::skin";
    /// Style replay.
    pub const STYLE: &str = "plume_style::style";
    /// Performance spans.
    pub const PERF: &str = "plume::perf";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show node ids.
    pub show_ids: bool,
    /// Whether to show the label produced for each node's data.
    pub show_labels: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_labels: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for minimal output: names only.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_labels: false,
            ..Default::default()
        }
    }
}

/// Debug utility for visualizing element trees.
#[derive(Debug, Clone, Default)]
pub struct ElementTreeDebug {
    options: TreeFormatOptions,
}

impl ElementTreeDebug {
    /// Create a new debug visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a debug visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format a subtree. `label` describes a node's data, typically its widget type.
    pub fn format_subtree<T>(
        &self,
        tree: &Tree<T>,
        root: NodeId,
        label: impl Fn(&T) -> String,
    ) -> TreeResult<String> {
        let mut output = String::new();
        self.format_subtree_into(tree, root, 0, true, &label, &mut output)?;
        Ok(output)
    }

    fn format_subtree_into<T>(
        &self,
        tree: &Tree<T>,
        id: NodeId,
        depth: usize,
        is_last: bool,
        label: &dyn Fn(&T) -> String,
        output: &mut String,
    ) -> TreeResult<()> {
        if let Some(max) = self.options.max_depth {
            if depth > max {
                return Ok(());
            }
        }

        let name = tree.name(id)?;
        output.push_str(&self.build_prefix(depth, is_last));
        output.push_str(if name.is_empty() { "(unnamed)" } else { name });

        if self.options.show_ids {
            let _ = write!(output, " [{}]", id.as_raw());
        }
        if self.options.show_labels {
            if let Some(data) = tree.get(id) {
                let _ = write!(output, " ({})", label(data));
            }
        }
        output.push('\n');

        let children = tree.children(id)?;
        let child_count = children.len();
        for (i, &child_id) in children.iter().enumerate() {
            self.format_subtree_into(tree, child_id, depth + 1, i + 1 == child_count, label, output)?;
        }
        Ok(())
    }

    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, corner, last) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            for _ in 0..self.options.indent_size {
                prefix.push(' ');
            }
        }
        prefix.push_str(if is_last { last } else { corner });
        prefix.push(' ');
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for tracking the duration of draw passes and skin application.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}
