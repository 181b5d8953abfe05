//! Use-case services over the skills repositories.

pub mod skills_service;
