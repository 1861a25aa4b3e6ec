/// Constants shared by the terrain sampling library and the pre-processing tool
pub mod coordinate_system;
pub mod render_settings;
pub mod texture;
