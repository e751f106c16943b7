pub mod prelude;

pub mod uploaded_images;
