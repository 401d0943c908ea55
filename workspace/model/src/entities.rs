//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the car-cost and household-ledger
//! application here: a singleton price-settings row, the car fleet
//! under evaluation, and the monthly ledger with its child rows.

pub mod car;
pub mod expense;
pub mod financing;
pub mod income;
pub mod loan_adjustment;
pub mod month;
pub mod price_settings;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::car::Entity as Car;
    pub use super::expense::Entity as Expense;
    pub use super::financing::Entity as Financing;
    pub use super::income::Entity as Income;
    pub use super::loan_adjustment::Entity as LoanAdjustment;
    pub use super::month::Entity as Month;
    pub use super::price_settings::Entity as PriceSettings;
}
