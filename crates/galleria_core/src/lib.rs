//! Core data types for the Galleria image gallery.
//!
//! Both producers of a gallery (remote discovery and the local store) hand the
//! view layer the same thing: a sorted sequence of [`ImageRecord`]s. This crate
//! defines that record, the naming rules that give it a stable identity, and the
//! collation that orders a snapshot.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod collation;
mod coordinates;
mod naming;
mod record;
mod size;

pub use collation::{compare_names, is_sorted_descending, sort_records};
pub use coordinates::{SourceCoordinates, SourceCoordinatesBuilder, SourceCoordinatesBuilderError};
pub use naming::{
    ALLOWED_MIME_TYPES, IMAGE_EXTENSIONS, UPLOAD_EXTENSIONS, extension_of, is_image_file,
    is_upload_extension, mime_for_extension, normalize_key,
};
pub use record::{IMAGE_PAYLOAD_MARKER, ImageOrigin, ImageRecord, StrategyKind};
pub use size::format_size;
