pub mod forecast;
pub mod kpi;
pub mod record;

pub use forecast::*;
pub use kpi::*;
pub use record::*;
