//! Pipeline stages for folder-to-PDF conversion.
//!
//! Each submodule implements exactly one step, so each is testable on its
//! own.
//!
//! ## Data Flow
//!
//! ```text
//! collect ──▶ decode ──▶ layout ──▶ encode ──▶ render
//! (listing)   (image)    (fit)      (flate)    (pdf-writer + atomic write)
//! ```
//!
//! 1. [`collect`] — list, filter, deduplicate and naturally order the images
//!    of one folder ([`natsort`] provides the comparator)
//! 2. [`decode`]  — decode one image into 8-bit colour and alpha planes
//! 3. [`layout`]  — fit the image into 90 % of the page, centred
//! 4. [`encode`]  — zlib-compress the planes for `/FlateDecode`
//! 5. [`render`]  — emit one page per image and persist the PDF once
//!
//! [`naming`] turns folder names into output file names for the orchestrator.

pub mod collect;
pub mod decode;
pub mod encode;
pub mod layout;
pub mod naming;
pub mod natsort;
pub mod render;
