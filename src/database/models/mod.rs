pub mod business;
pub mod contact;
pub mod scheduled_call;
pub mod user;
