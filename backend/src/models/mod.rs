pub mod birth;
pub mod locale;
pub mod time;

pub use birth::*;
pub use locale::*;
pub use time::*;
