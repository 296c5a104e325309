//! Media ingestion for the Reel admin panel.
//!
//! Uploads go through [`pipeline::MediaPipeline`]. Images other than GIFs are
//! recompressed and videos get a poster frame extracted on the side. The
//! bytes land in an [`object_store::ObjectStore`] that hands back a stable
//! URL. Every upload is a cancellable task publishing fractional progress on
//! a watch channel.

#![allow(async_fn_in_trait)]

pub mod compress;
pub mod error;
pub mod file;
pub mod object_store;
pub mod pipeline;
pub mod poster;
pub mod progress;

pub use error::{Error, Result};
pub use file::MediaFile;
pub use object_store::{FsObjectStore, ObjectStore};
pub use pipeline::{MediaPipeline, PosterTask, UploadTask, UploadedMedia};
pub use poster::{FfmpegPoster, PosterExtractor};
