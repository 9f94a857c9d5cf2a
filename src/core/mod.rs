pub mod ballistics;
pub mod trajectory;
pub mod window;
