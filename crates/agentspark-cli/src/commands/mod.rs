pub mod call;
pub mod export;
pub mod interview;
pub mod models;
pub mod projects;
pub mod refine;
pub mod share;
