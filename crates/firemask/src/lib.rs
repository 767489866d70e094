//! Thermal-imagery ground-truth labeling for fire segmentation.

#[doc(inline)]
pub use firemask_image as image;

#[doc(inline)]
pub use firemask_imgproc as imgproc;

#[doc(inline)]
pub use firemask_io as io;
