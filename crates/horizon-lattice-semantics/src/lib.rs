//! Semantics tree diffing and accessibility event synthesis for Horizon Lattice.
//!
//! Widgets describe themselves to assistive technologies as a tree of
//! [`SemanticsNode`]s. Every frame the host rebuilds that tree and hands it
//! to a [`SemanticsDelegate`], which:
//!
//! - **Walks** the tree for reachable, unobstructed nodes and their visible
//!   ("adjusted") bounds
//! - **Diffs** those nodes against the previous frame's snapshots
//! - **Synthesizes** a small, ordered set of [`AccessibilityEvent`]s for the
//!   platform bridge
//! - **Buffers** structural appear/disappear notifications for content
//!   capture consumers
//!
//! The delegate also answers scrollability queries for gesture routing and
//! classifies nodes into platform class labels and capability flags.
//!
//! # Example
//!
//! ```
//! use horizon_lattice_semantics::{
//!     AccessibilityEvent, ContentChangeType, DelegateConfig, Rect, SemanticsDelegate,
//!     SemanticsId, SemanticsNode, SemanticsTree,
//! };
//!
//! fn frame(label: &str) -> SemanticsTree {
//!     let root = SemanticsNode::new(1).with_bounds(Rect::new(0.0, 0.0, 320.0, 240.0));
//!     let (mut tree, root) = SemanticsTree::with_root(root);
//!     let label = SemanticsNode::new(2)
//!         .with_bounds(Rect::new(0.0, 0.0, 320.0, 40.0))
//!         .with_text(label);
//!     tree.push_child(root, label).unwrap();
//!     tree
//! }
//!
//! let mut delegate = SemanticsDelegate::new(DelegateConfig::default());
//! let mut events: Vec<AccessibilityEvent> = Vec::new();
//!
//! delegate.check_for_semantics_changes(&frame("Loading"), &mut events);
//! delegate.check_for_semantics_changes(&frame("Ready"), &mut events);
//!
//! assert_eq!(
//!     events,
//!     vec![AccessibilityEvent::ContentChanged {
//!         node: SemanticsId(2),
//!         change: ContentChangeType::Text,
//!         action_label: None,
//!     }]
//! );
//! ```
//!
//! # Features
//!
//! - `accessibility` (default): AccessKit role and bounds conversions.

pub mod capability;
pub mod capture;
pub mod config;
pub mod delegate;
pub mod diff;
mod error;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod node;
pub mod occlusion;
pub mod property;
pub mod role;
pub mod scroll;
pub mod snapshot;
pub mod synth;

pub use capability::{CapabilityFlags, NodeCapabilities};
pub use capture::{CaptureFlush, StructuralCaptureBuffers};
pub use config::DelegateConfig;
pub use delegate::{NodeInfo, PassSummary, SemanticsDelegate};
pub use error::{SemanticsError, SemanticsResult};
pub use event::{
    AccessibilityEvent, AccessibilityEventSink, ContentChangeType, EventKind, ScrollDelta,
    TextDelta,
};
pub use geometry::{Point, Rect, Size};
pub use node::{NodeKey, SemanticsId, SemanticsNode, SemanticsTree};
pub use occlusion::{AdjustedBoundsNode, VisibleNodes, visible_nodes};
pub use property::{
    ActionDescriptor, ActionKind, Axis, CustomAction, LiveRegionMode, ProgressRange, PropertyKey,
    PropertyMap, PropertyValue, ScrollAxisRange, TextRange, ToggleableState,
};
pub use role::Role;
pub use snapshot::{SemanticsNodeSnapshot, SnapshotStore};

#[cfg(feature = "accessibility")]
pub use accesskit;
