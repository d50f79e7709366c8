#![doc = "dockit-core: naming, tagging and upload logic for dockit."]

//! This crate holds everything that decides *what* happens to a scanned document:
//! which date it carries, which tags it earns, which storage key it lands under and
//! how its bytes are streamed to an object store. Terminal prompts and the AWS client
//! live in the `dockit` crate.
//!
//! # Usage
//! Build a [`naming::UploadRequest`], turn it into a key with [`naming::build_key`]
//! and hand the key to [`uploader::Uploader`] together with an [`contract::ObjectStore`].

pub mod config;
pub mod contract;
pub mod date;
pub mod naming;
pub mod tagger;
pub mod uploader;
