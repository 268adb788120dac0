// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conic sections, with a focus on drawing them.
//!
//! A [`ConicSection`] is the zero set of a general quadratic polynomial in
//! two variables, `c0·x² + c1·x·y + c2·y² + c3·x + c4·y + c5 = 0`. This crate
//! classifies such curves ([`ConicKind`]), transforms them, intersects them,
//! finds nearest points on them, fits them to points, and cuts the parts
//! inside a rectangle into rational quadratic Béziers ([`RatQuad`]), which
//! represent conic arcs exactly and convert to the cubic Béziers of
//! [kurbo].
//!
//! # Examples
//!
//! Drawing the part of an ellipse inside a view:
//!
//! ```
//! use conics::{ConicKind, ConicSection};
//! use kurbo::{BezPath, Point, Rect};
//!
//! // x²/4 + y² = 1, rotated and moved.
//! let ellipse = ConicSection::new(0.25, 0.0, 1.0, 0.0, 0.0, -1.0)
//!     .rotate(0.5)
//!     .translate((3.0, 2.0).into());
//! assert_eq!(ellipse.kind(), ConicKind::RealEllipse);
//!
//! let mut arcs = Vec::new();
//! ellipse.clip(Rect::new(0.0, 0.0, 4.0, 4.0), &mut arcs);
//! let mut path = BezPath::new();
//! for arc in &arcs {
//!     let c = arc.to_cubic();
//!     path.move_to(c.p0);
//!     path.curve_to(c.p1, c.p2, c.p3);
//! }
//! assert!(!path.elements().is_empty());
//! ```
//!
//! The nearest point of a conic:
//!
//! ```
//! use conics::ConicSection;
//! use kurbo::Point;
//!
//! let parabola = ConicSection::new(1.0, 0.0, 0.0, 0.0, -1.0, 0.0);
//! let p = parabola.nearest_point(Point::new(0.0, -1.0)).unwrap();
//! assert!(p.to_vec2().hypot() < 1e-9);
//! ```
//!
//! # Tolerances
//!
//! Decisions such as "is this conic degenerate" are made with a single
//! relative tolerance, [`common::EPSILON`], so that scaling a conic's
//! coefficients never changes its kind. Decisions about values that are
//! themselves approximate, such as whether a line touches a conic, use the
//! looser [`common::TANGENCY_EPSILON`].
//!
//! # Features
//!
//! - `std` (enabled by default): Get floating point functions from the standard library.
//! - `libm`: Use floating point implementations from [libm][].
//!   This is useful for `no_std` environments.
//! - `serde`: Implement `serde::Deserialize` and `serde::Serialize` on the value types.
//!
//! At least one of `std` and `libm` is required; `std` overrides `libm`.
//! The crate requires an allocator (it uses [alloc]).
//!
//! [libm]: https://docs.rs/libm

// LINEBENDER LINT SET - lib.rs - v1
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision,
    clippy::bool_to_int_with_if
)]
// The following lints are part of the Linebender standard set,
// but resolving them has been deferred for now.
#![allow(
    clippy::use_self,
    clippy::return_self_not_must_use,
    clippy::cast_possible_truncation,
    clippy::missing_assert_message,
    clippy::missing_panics_doc,
    clippy::exhaustive_enums,
    clippy::match_same_arms,
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason
)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("conics requires either the `std` or `libm` feature");

// Suppress the unused_crate_dependencies lint when both std and libm are specified.
#[cfg(all(feature = "std", feature = "libm"))]
use libm as _;

extern crate alloc;

mod angle;
mod axis;
mod clip;
pub mod common;
mod conic;
mod error;
mod fit;
mod intersect;
mod kind;
mod line;
mod ratquad;

pub use crate::angle::*;
pub use crate::axis::*;
pub use crate::clip::clip;
pub use crate::conic::*;
pub use crate::error::*;
pub use crate::kind::*;
pub use crate::line::*;
pub use crate::ratquad::*;
