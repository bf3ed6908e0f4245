//! Evaluation tests
//!
//! Folding of self-contained expressions: no assignment search involved

mod arrays;
mod calls;
mod operators;
mod strings;
