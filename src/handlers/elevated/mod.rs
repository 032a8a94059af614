// handlers/elevated/mod.rs - Platform operator handlers
//
// `/superadmin/login` is open; everything under `/superadmin/api` requires a
// superadmin access token.

pub mod superadmin;

pub use superadmin::*;
