pub mod capabilities;
pub mod forms;
pub mod render;
pub mod search;

pub use capabilities::{Capabilities, DataSource};
pub use forms::{CourseForm, FormError, LoginForm, RegisterForm};
pub use search::SearchBar;
