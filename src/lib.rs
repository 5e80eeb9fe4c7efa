//! Library to calculate difficulty and performance attributes for
//! osu!standard and [osu!droid].
//!
//! ## Description
//!
//! Both rulesets share the same beatmap format and most of the object
//! preprocessing. osu!standard follows [osu!lazer]'s difficulty and
//! performance calculation. osu!droid builds on top of it with its own skills
//! for tapping, rhythm, visual and reading difficulty, a touch-screen hand
//! simulation, and a retry-time based miss penalty.
//!
//! ## Usage
//!
//! ```
//! use droid_pp::{
//!     droid::{Droid, DroidPerformance},
//!     Beatmap, Difficulty,
//! };
//!
//! # let content = "osu file format v14\n\n[HitObjects]\n100,100,0,1,0\n200,100,500,1,0\n";
//! // Decode the map
//! let map: Beatmap = content.parse().unwrap();
//!
//! // Calculate difficulty attributes
//! let diff_attrs = Difficulty::new()
//!     .mods("HDHR".parse::<droid_pp::GameMods>().unwrap())
//!     .calculate_for_mode::<Droid>(&map);
//!
//! let stars = diff_attrs.stars;
//!
//! // Calculate performance attributes, re-using the difficulty attributes
//! let perf_attrs = DroidPerformance::from(diff_attrs)
//!     .combo(2)
//!     .accuracy(99.2)
//!     .misses(0)
//!     .calculate();
//!
//! println!("Stars: {stars} | PP: {}", perf_attrs.pp());
//! ```
//!
//! ## Features
//!
//! | Flag | Description | Dependencies
//! | - | - | -
//! | `default` | No features |
//! | `decode-logs` | Errors encountered during beatmap decoding are logged through `tracing`. | [`tracing`]
//! | `async_tokio` | Beatmaps can be decoded from `tokio` readers through `Beatmap::parse`. | [`tokio`]
//! | `async_std` | Beatmaps can be decoded from `async-std` readers through `Beatmap::parse`. | [`async-std`]
//!
//! [osu!droid]: https://osudroid.moe
//! [osu!lazer]: https://github.com/ppy/osu
//! [`tracing`]: https://docs.rs/tracing
//! [`tokio`]: https://docs.rs/tokio
//! [`async-std`]: https://docs.rs/async-std

#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::missing_const_for_fn, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::struct_excessive_bools,
    clippy::match_same_arms,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::explicit_iter_loop,
    clippy::similar_names,
    clippy::cast_possible_wrap
)]

#[cfg(all(feature = "async_tokio", feature = "async_std"))]
compile_error!("the features `async_tokio` and `async_std` are mutually exclusive");

#[doc(inline)]
pub use self::{
    any::Difficulty,
    model::{beatmap::Beatmap, mods::GameMods},
};

/// Types shared by both rulesets.
pub mod any;

/// Types for osu!standard calculations.
pub mod osu;

/// Types for osu!droid calculations.
pub mod droid;

/// Types used in and around this crate.
pub mod model;

mod util;
