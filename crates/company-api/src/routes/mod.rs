//! # API Route Modules
//!
//! Route modules for the company platform API surface:
//!
//! - `company` — Company onboarding and profile management. Every endpoint
//!   operates on the authenticated company resolved by the session guard;
//!   no company id ever appears in a path.

pub mod company;
