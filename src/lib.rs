//! Sentence-level navigation for rendered documents.
//!
//! The library turns a [`page::Page`]'s prose into addressable sentence
//! units and moves a highlight through them under keyboard control. The
//! [`engine::SentenceNavigator`] is the entry point; everything else is
//! either the page model it operates on, the segmentation oracle it asks
//! for sentence boundaries, or the rendering and pointer plumbing that
//! connects it to a terminal.

pub mod engine;
pub mod layout;
pub mod markdown;
pub mod page;
pub mod pointer;
pub mod render;
pub mod segment;
pub mod theme;
pub mod tooltip;
