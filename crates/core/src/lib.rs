pub mod capture;
pub mod detection;
pub mod notify;
pub mod pipeline;
pub mod presentation;
pub mod shared;
