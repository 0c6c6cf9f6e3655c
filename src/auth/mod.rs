pub mod claims;
pub mod errors;
pub mod extractors;
pub mod jwt;
pub mod lifecycle;
pub mod password;
pub mod principal;
pub mod refresh;

pub use claims::*;
pub use errors::*;
pub use extractors::*;
pub use jwt::*;
pub use lifecycle::*;
pub use principal::*;
pub use refresh::*;
