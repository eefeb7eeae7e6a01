// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View tree data model.
//!
//! A *view* is a node in a retained scene graph. Each view has:
//!
//! - An identity ([`ViewId`]): a generational handle that becomes stale when
//!   the view is destroyed.
//! - Topology: an ordered child list and a parent back-link. A view is owned
//!   by at most one parent at a time.
//! - Geometry: [`bounds`](ViewTree::bounds) in parent coordinates, set only by
//!   [`layout`](ViewTree::layout), plus caller-set
//!   [`paddings`](ViewTree::set_paddings) and a
//!   [`scroll offset`](ViewTree::set_scroll_offset) applied to children.
//! - A [`ViewBehavior`] supplying the per-kind hooks (measure, layout,
//!   background drawing, touch handling, lifecycle notifications).
//! - Transient state: the touch-captured child and the running animation.
//! - A weak link to the [`RootController`](crate::root::RootController), set
//!   while the view or an ancestor is attached.
//!
//! Views are stored in struct-of-arrays layout with index-based handles.
//!
//! # Traversal order
//!
//! Render, measure and layout are depth-first in child index order. Root
//! attachment is pre-order (a view adopts the root before its children) and
//! detachment is post-order (children let go first). Touch hit testing walks
//! children in reverse index order, topmost first.

mod behavior;
mod id;
mod layout;
mod render;
mod store;
#[cfg(test)]
mod test_support;
mod touch;
mod traverse;

pub use behavior::{Group, ViewBehavior, ViewCx};
pub use id::{INVALID, ViewId};
pub use layout::MeasureSpec;
pub use render::RenderStats;
pub use store::{ViewTree, Visibility};
pub use touch::Capture;
pub use traverse::Children;
