//! HTTP route handlers, one module per surface.

pub mod admin;
pub mod chat;
pub mod lead;
pub mod pages;
pub mod track;
pub mod webhook;
