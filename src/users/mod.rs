mod service;

pub use service::{Login, Registration, UserService};
