pub mod cars;
pub mod health;
pub mod months;
pub mod price_settings;
