//! Command execution for reqcheck.
//!
//! - **query**: list the releases of one repository (`github`, `gitlab`)
//! - **vcpkg**: check the ports of a vcpkg checkout for upgrades

/// Release listing for a single repository.
pub mod query;

/// Upgrade report for the ports of a vcpkg checkout.
pub mod vcpkg;

#[cfg(test)]
mod fixtures;
