pub mod health;
pub use self::health::health;

pub mod pages;
pub use self::pages::{callback, home, login};

pub mod subject;
pub use self::subject::subject;
