pub mod maintenance_import;
pub mod sale_profile;
