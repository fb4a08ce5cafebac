//! PDF object plumbing for the plan pipeline
//!
//! This module handles all PDF-specific operations:
//! - Creating cropped Form XObjects from source pages
//! - Copying pages between documents
//! - Resolving inherited page attributes

mod pages;
mod xobject;

pub use pages::{PageSource, PageWriter};
pub use xobject::{
    copy_object_deep, create_cropped_xobject, get_media_box, get_rotation, inherited_attribute,
};
