//! Column layout: distribute frames over columns, then even the columns out.
//!
//! | Step | Function | Effect |
//! |---|---|---|
//! | Column count | [`column_count`] | caller's value, or a roughly square canvas |
//! | Packing | [`pack`] | greedy shortest-column assignment, then shuffles |
//! | Balancing | [`balance`] | crop frames so columns meet the shortest one |
//!
//! Packing and balancing only touch frame *heights*; every frame keeps the
//! run's width.

mod balance;
mod pack;

pub use balance::{Balanced, balance, crop_frame};
pub use pack::{assign_columns, column_count, pack, shuffle_columns};
