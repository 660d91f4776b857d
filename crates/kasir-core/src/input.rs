//! # Input Payloads
//!
//! Create/update payloads for the catalog, customers and users. Each one
//! knows how to validate itself; repositories only ever see validated input.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::validation::{
    validate_barcode, validate_email, validate_password, validate_price, validate_required,
    validate_stock, ValidationResult,
};

const NAME_MAX: usize = 200;
const TEXT_MAX: usize = 2000;
const IMAGE_MAX: usize = 500;

// =============================================================================
// Users
// =============================================================================

/// Payload for creating a cashier account.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_required("name", &self.name, NAME_MAX)?;
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

/// Payload for updating a cashier account. An absent or blank password
/// keeps the current one.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}

impl UpdateUser {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_required("name", &self.name, NAME_MAX)?;
        validate_email(&self.email)?;
        match self.new_password() {
            Some(password) => validate_password(password),
            None => Ok(()),
        }
    }

    /// The password to set, if one was supplied.
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryInput {
    pub name: String,
    pub description: String,
    pub image: String,
}

impl CategoryInput {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_required("name", &self.name, NAME_MAX)?;
        validate_required("description", &self.description, TEXT_MAX)?;
        validate_required("image", &self.image, IMAGE_MAX)
    }
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductInput {
    pub category_id: i64,
    pub barcode: String,
    pub title: String,
    pub description: String,
    pub buy_price: Money,
    pub sell_price: Money,
    pub stock: i64,
    #[serde(default)]
    pub image: String,
}

impl ProductInput {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_barcode(&self.barcode)?;
        validate_required("title", &self.title, NAME_MAX)?;
        validate_required("description", &self.description, TEXT_MAX)?;
        validate_price("buy_price", self.buy_price)?;
        validate_price("sell_price", self.sell_price)?;
        validate_stock(self.stock)
    }
}

// =============================================================================
// Customers
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerInput {
    pub name: String,
    pub no_telp: String,
    pub address: String,
}

impl CustomerInput {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_required("name", &self.name, NAME_MAX)?;
        validate_required("no_telp", &self.no_telp, 30)?;
        validate_required("address", &self.address, TEXT_MAX)
    }
}
