pub mod superadmin;
pub mod tenant;
