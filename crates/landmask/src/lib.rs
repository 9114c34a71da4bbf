//! Landmark dataset preparation.
//!
//! * [`align`]: similarity alignment of 7-point landmarks and face-region masks
//! * [`dataset`]: batch drivers over a dataset directory
//! * [`image`], [`imgproc`] and [`io`]: the image container, resizing and file I/O
//!   they are built on

#[doc(inline)]
pub use landmask_align as align;

#[doc(inline)]
pub use landmask_dataset as dataset;

#[doc(inline)]
pub use landmask_image as image;

#[doc(inline)]
pub use landmask_imgproc as imgproc;

#[doc(inline)]
pub use landmask_io as io;
