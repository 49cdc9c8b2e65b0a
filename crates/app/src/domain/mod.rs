//! Tessera Domain Concerns

pub mod campaigns;
pub mod codes;
pub mod redemptions;
pub mod tenants;
pub mod validation;
