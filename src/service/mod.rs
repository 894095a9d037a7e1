#![allow(refining_impl_trait)]

mod service;
pub mod services;

pub mod auth;
pub mod rooms;
pub mod users;

pub(crate) use service::{Args, Service};

pub use crate::services::{Backends, Services};
