pub mod consumption;
pub mod district;
pub mod nutrition;
pub mod price;
pub mod product;
pub mod production;
pub mod stakeholder;
pub mod transaction;
pub mod weather;
