//! `pbst` is a collection of persistent binary search tree variants: a
//! plain ephemeral baseline, three strategies for retrofitting partial
//! persistence onto it, and one fat-node variant carried all the way to
//! full persistence. All engines are single-threaded, in-memory and
//! implement "everywhere persistence" — in the language of Driscoll,
//! Sarnak, Sleator and Tarjan: every past version of a structure remains
//! fully queryable after later updates.
//!
//! - [`bst`] — the plain ephemeral building block every engine below is
//!   built out of.
//! - [`order_list`] — the order-maintenance list used to compare
//!   versions that aren't plain integers (needed by [`full`]).
//! - [`naive`] — whole-snapshot copy-on-write partial persistence.
//! - [`fatnode`] — partial persistence via per-field version histories.
//! - [`copying`] — partial persistence via bounded node copying
//!   (Driscoll-Sarnak-Sleator-Tarjan), the fastest of the three.
//! - [`full`] — full persistence: any past version may itself be the
//!   base of a new update, not just the latest one.
//! - [`planar`] — a planar point-location structure built on top of
//!   [`fatnode`], included as a worked example of an application that
//!   only ever touches the persistent-BST contract from the outside.

mod error;
mod key;

pub mod bst;
pub mod copying;
pub mod fatnode;
pub mod full;
pub mod order_list;
pub mod planar;

mod naive;

pub use crate::bst::Bst;
pub use crate::copying::Copying;
pub use crate::error::Error;
pub use crate::fatnode::FatTree;
pub use crate::full::FullTree;
pub use crate::key::{natural_order, CmpFn};
pub use crate::naive::Naive;
pub use crate::order_list::{OrderList, VersionHandle};
