//! Event authorization integration tests.
#![cfg(test)]

mod event_auth;
