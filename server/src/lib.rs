//! Kader Server
//!
//! Role and permission backend for the club platform: decides which role may
//! use which module, at which level, for which club.

pub mod admin;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod permissions;
pub mod referrals;
