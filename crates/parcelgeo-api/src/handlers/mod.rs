mod display;
mod find;
mod health;
mod list;
mod statistics;

pub use display::display_image;
pub use find::find_properties;
pub use health::health_check;
pub use list::list_properties;
pub use statistics::get_statistics;
