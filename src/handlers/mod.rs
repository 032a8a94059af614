// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no auth) → Protected (tenant admin token) → Elevated (superadmin token)
pub mod elevated;
pub mod protected;
pub mod public;
