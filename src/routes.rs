use std::fmt;

/// Client-side screens. Operations that navigate return one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Register,
    Home,
    MyCourses,
    CourseDetails,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Register => "/register",
            Route::Home => "/home",
            Route::MyCourses => "/myCourses",
            Route::CourseDetails => "/courseDetails",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
