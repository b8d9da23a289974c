pub mod menu;

pub use menu::MenuSelection;
