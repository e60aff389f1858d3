//! # Prompt Template Modules
//!
//! This module organizes all prompt templates used throughout the `learnmap`
//! library. It is divided into sub-modules based on the pipeline stage the
//! prompts belong to. Templates use `{placeholder}` markers that call sites
//! fill in with `str::replace`.

pub mod chat;
pub mod images;
pub mod tree;
