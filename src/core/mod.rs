pub mod destination;
pub mod error;
pub mod value;

pub use destination::{Destination, KeyRange, increment};
pub use error::{Result, RouteError};
pub use value::Value;
