//! Small text helpers

pub mod text;
