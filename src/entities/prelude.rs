pub use super::uploaded_images::Entity as UploadedImages;
