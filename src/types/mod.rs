pub mod bar;
pub mod scan;

pub use bar::*;
pub use scan::*;
