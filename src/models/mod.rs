pub mod comment;
pub mod course;
pub mod file;
pub mod user;

pub use comment::{Comment, CommentRequest};
pub use course::{Course, CourseRequest, SubscribeRequest};
pub use file::{FileUpload, UploadedFile};
pub use user::{LoginRequest, RegistrationRequest, Role, User};
