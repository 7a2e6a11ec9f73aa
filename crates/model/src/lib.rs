//! # KPM Model
//!
//! Data model for key point matching: arguments, key points, match labels and
//! the shared task's CSV / JSON formats.
//!
//! ## Layout on disk
//!
//! ```text
//! data/
//!   arguments_<split>.csv    arg_id,argument,topic,stance
//!   key_points_<split>.csv   key_point_id,key_point,topic,stance
//!   labels_<split>.csv       arg_id,key_point_id,label   (absent for unlabelled splits)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use kpm_model::{load_split, Split, Submission};
//! use std::path::Path;
//!
//! let dev = load_split(Path::new("data"), Split::Dev)?;
//! for (argument, key_point) in dev.candidate_pairs().take(3) {
//!     println!("{} <-> {}", argument.id, key_point.id);
//! }
//! let submission = Submission::from_labels(&dev.labels);
//! submission.save(Path::new("data/out/gold.json"))?;
//! # Ok::<(), kpm_model::DataError>(())
//! ```

mod dataset;
mod error;
mod io;
mod labels;
mod submission;
mod types;

pub use dataset::{Dataset, LabelledDataset};
pub use error::{DataError, Result};
pub use io::{load_arguments, load_key_points, load_labels, load_split, split_exists};
pub use labels::{BestMatch, Labels};
pub use submission::Submission;
pub use types::{Argument, ArgumentId, KeyPoint, KeyPointId, Label, PairId, Split, Stance, Topic};
