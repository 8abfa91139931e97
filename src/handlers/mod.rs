// Handler modules, one per role-gated route group.
pub mod admin;
pub mod auth;
pub mod business;
pub mod contact;
pub mod lifecycle;
pub mod schedule;
