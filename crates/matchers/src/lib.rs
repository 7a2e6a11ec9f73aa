//! # KPM Matchers
//!
//! Strategies that score argument / key point pairs in `[0, 1]`.
//!
//! | Matcher | Slug | Trained |
//! |---------|------|---------|
//! | [`AllMatcher`] | `all` | no |
//! | [`NoneMatcher`] | `none` | no |
//! | [`RandomMatcher`] | `random[-seed-N]` | no |
//! | [`TermOverlapMatcher`] | `term-overlap[-options]` | no |
//! | [`RegressionMatcher`] | `regression-{bow,tfidf}[-options]` | yes |
//! | [`SvcMatcher`] | `svc-{bow,tfidf}[-options]` | yes |
//! | [`EnsembleMatcher`] | `ensemble-W-A-W-B...` | if members are |
//! | [`CascadeMatcher`] | `cascade-T-A-B` | if children are |
//!
//! Every matcher implements [`Matcher`]. The caller drives the lifecycle;
//! the cache is only consulted for matchers that need training:
//!
//! ```text
//! prepare ──> load_model(cache/<slug>) ──ok(true)──────────────> predict
//!                    │                                            ▲
//!                    └──ok(false)──> train ──> save_model ────────┘
//! ```

mod baselines;
mod cascade;
mod config;
mod ensemble;
mod error;
mod label_policy;
mod linear;
mod matcher;
mod regression;
mod svc;
mod term_overlap;

#[cfg(test)]
mod test_support;

pub use baselines::{AllMatcher, NoneMatcher, RandomMatcher};
pub use cascade::{CascadeMatcher, DEFAULT_THRESHOLD};
pub use config::{EnsembleMember, MatcherConfig};
pub use ensemble::{EnsembleMatcher, DEFAULT_REGRESSION_WEIGHT, DEFAULT_SVC_WEIGHT};
pub use error::{MatcherError, Result};
pub use label_policy::{training_pairs, LabelPolicy, TrainingPair};
pub use matcher::{is_valid_slug, Matcher};
pub use regression::{RegressionConfig, RegressionMatcher};
pub use svc::{SvcConfig, SvcMatcher};
pub use term_overlap::{TermOverlapConfig, TermOverlapMatcher};
