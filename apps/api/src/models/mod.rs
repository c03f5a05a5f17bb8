pub mod guide;
pub mod program;
