//! Task tree core of the organazr to-do app: the task and list model, its
//! cascading mutations, the per-screen filters and the tree flattener.

pub mod config;
pub mod filters;
pub mod flatten;
pub mod models;
pub mod services;
pub mod storage;
pub mod views;
